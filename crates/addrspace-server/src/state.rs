//! Application state shared across handlers.

use addrspace_store::SharedAddressSpace;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The address space served by this process.
    space: SharedAddressSpace,
}

impl AppState {
    /// Create new application state.
    pub fn new(space: SharedAddressSpace) -> Self {
        Self { space }
    }

    /// Get a reference to the address space.
    pub fn space(&self) -> &SharedAddressSpace {
        &self.space
    }
}
