//! addrspace-store: the in-memory address space engine
//!
//! This crate provides:
//! - The node store, keyed by NodeId
//! - Per-node attribute tables with optional value producers and change
//!   notifiers
//! - The reference graph and HasSubtype resolution
//! - The query engine: AddNodes, AddReferences, Read, Write and Browse
//!
//! # Architecture
//!
//! [`AddressSpace`] is a plain owned struct. Mutating services take
//! `&mut self`, queries take `&self`. [`SharedAddressSpace`] wraps it in
//! `Arc<RwLock<_>>` for use across threads.
//!
//! # Usage
//!
//! ```rust
//! use addrspace_core::ids::{objects, reference_types};
//! use addrspace_core::{AddNodesItem, BrowseDescription, NodeClass, NodeId, QualifiedName};
//! use addrspace_store::SharedAddressSpace;
//!
//! let space = SharedAddressSpace::new();
//! space.add_nodes(&[
//!     AddNodesItem::new(objects::OBJECTS_FOLDER, QualifiedName::new(0, "Objects"), NodeClass::Object),
//!     AddNodesItem::new(NodeId::string(2, "Pump"), QualifiedName::new(2, "Pump"), NodeClass::Object)
//!         .with_parent(objects::OBJECTS_FOLDER, reference_types::ORGANIZES),
//! ])?;
//!
//! let results = space.browse(&[BrowseDescription::new(objects::OBJECTS_FOLDER)])?;
//! assert_eq!(results[0].references.len(), 1);
//! # Ok::<(), addrspace_store::SpaceError>(())
//! ```

pub mod attribute;
pub mod browse;
pub mod error;
pub mod node;
pub mod node_store;
pub mod reference;
pub mod shared;
pub mod space;
pub mod subtype;

pub use attribute::{AttributeValue, ChangeNotifier, ValueProducer, ValueSource};
pub use browse::TypeFilter;
pub use error::{SpaceError, SpaceResult};
pub use node::NodeData;
pub use node_store::NodeStore;
pub use shared::SharedAddressSpace;
pub use space::AddressSpace;
pub use subtype::subtype_closure;

// Re-export addrspace-core for downstream crates
pub use addrspace_core;
