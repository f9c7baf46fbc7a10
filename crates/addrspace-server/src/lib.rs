//! addrspace-server: JSON service surface over the address space
//!
//! This crate provides:
//! - `POST` endpoints for AddNodes, AddReferences, Read, Write and Browse
//! - A health check reporting the node count
//! - Configuration from environment variables
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses
//!
//! Request and result bodies are the typed structures from
//! `addrspace-core`, serialized with serde. Per-item failures are status
//! codes in the result list; only malformed or empty requests and internal
//! failures become HTTP errors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use addrspace_server::{routes, AppState};
//! use addrspace_store::SharedAddressSpace;
//!
//! let app = routes::build_router(AppState::new(SharedAddressSpace::new()));
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

// Re-export dependent crates
pub use addrspace_core;
pub use addrspace_store;
