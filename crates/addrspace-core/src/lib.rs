//! addrspace-core: protocol value types for the address space
//!
//! This crate provides:
//! - Node identifiers with their text form ([`NodeId`])
//! - Attribute ids, node classes and browse directions
//! - Variants, data values, qualified names and localized text
//! - Protocol status codes
//! - Typed request/result structures for AddNodes, AddReferences, Read,
//!   Write and Browse
//!
//! Everything here is plain data. The engine that interprets it lives in
//! `addrspace-store`.

pub mod ids;
pub mod node_id;
pub mod services;
pub mod status;
pub mod types;
pub mod variant;

// Re-export commonly used types at crate root for convenience
pub use node_id::{Identifier, NodeId, NodeIdParseError};
pub use services::{
    AddNodesItem, AddNodesResult, AddReferencesItem, BrowseDescription, BrowseResult,
    NodeAttributes, NodeAttributesMask, ReadValueId, ReferenceDescription, WriteValue,
};
pub use status::StatusCode;
pub use types::{AttributeId, BrowseDirection, NodeClass, UnknownCode};
pub use variant::{DataValue, LocalizedText, QualifiedName, Variant, VariantType};
