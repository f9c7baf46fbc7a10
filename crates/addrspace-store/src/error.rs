//! Error types for the address space.

use addrspace_core::{AttributeId, NodeId, StatusCode};
use thiserror::Error;

/// Result type alias for address space operations.
pub type SpaceResult<T> = Result<T, SpaceError>;

/// Errors that can occur while operating on the address space.
///
/// Batch services never return these directly: each failure is converted to
/// its protocol status and placed in the item's result slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// A node with this id is already in the store.
    #[error("node id already exists: {0}")]
    NodeIdExists(NodeId),

    /// No node with this id is in the store.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node exists but does not carry the attribute.
    #[error("attribute {attribute_id} is not defined on node {node_id}")]
    AttributeNotFound {
        node_id: NodeId,
        attribute_id: AttributeId,
    },

    /// The source of a new reference is not in the store.
    #[error("source node does not exist: {0}")]
    SourceNodeInvalid(NodeId),

    /// A thread panicked while holding the address space lock.
    #[error("address space lock poisoned")]
    LockPoisoned,
}

impl SpaceError {
    /// Protocol status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NodeIdExists(_) => StatusCode::BAD_NODE_ID_EXISTS,
            Self::NodeNotFound(_) => StatusCode::BAD_NODE_ID_UNKNOWN,
            Self::AttributeNotFound { .. } => StatusCode::BAD_ATTRIBUTE_ID_INVALID,
            Self::SourceNodeInvalid(_) => StatusCode::BAD_SOURCE_NODE_ID_INVALID,
            Self::LockPoisoned => StatusCode::BAD_INTERNAL_ERROR,
        }
    }
}
