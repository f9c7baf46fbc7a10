//! The query engine: AddNodes, AddReferences, Read, Write and Browse.
//!
//! [`AddressSpace`] is the only code with mutating access to the node store
//! and the reference graph. Batch services process each item on its own: a
//! failing item gets its status in its result slot and the rest of the batch
//! carries on. Results always mirror the input order.
//!
//! # Usage
//!
//! ```rust
//! use addrspace_core::ids::objects;
//! use addrspace_core::{AddNodesItem, AttributeId, NodeClass, QualifiedName, ReadValueId};
//! use addrspace_store::AddressSpace;
//!
//! let mut space = AddressSpace::new();
//! space.add_nodes(&[AddNodesItem::new(
//!     objects::OBJECTS_FOLDER,
//!     QualifiedName::new(0, "Objects"),
//!     NodeClass::Object,
//! )]);
//!
//! let values = space.read(&[ReadValueId::new(objects::OBJECTS_FOLDER, AttributeId::BrowseName)]);
//! assert!(values[0].is_good());
//! ```

use std::sync::Arc;

use addrspace_core::ids::reference_types;
use addrspace_core::{
    AddNodesItem, AddNodesResult, AddReferencesItem, AttributeId, BrowseDescription,
    BrowseResult, DataValue, NodeClass, NodeId, ReadValueId, StatusCode, WriteValue,
};
use tracing::{debug, warn};

use crate::attribute::{AttributeValue, ChangeNotifier, ValueProducer, specified_attributes};
use crate::browse::browse_node;
use crate::error::{SpaceError, SpaceResult};
use crate::node::NodeData;
use crate::node_store::NodeStore;
use crate::reference::{child_reference, resolved_reference};

/// The in-memory address space.
///
/// Mutating services take `&mut self` and queries take `&self`. Wrap it in
/// [`SharedAddressSpace`](crate::SharedAddressSpace) to share it between
/// threads.
#[derive(Debug, Default)]
pub struct AddressSpace {
    nodes: NodeStore,
}

impl AddressSpace {
    /// Creates an empty address space.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains(node_id)
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&NodeData> {
        self.nodes.get(node_id).ok()
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    // ========================================================================
    // AddNodes
    // ========================================================================

    /// Creates one node per item.
    pub fn add_nodes(&mut self, items: &[AddNodesItem]) -> Vec<AddNodesResult> {
        debug!(count = items.len(), "add_nodes");
        items
            .iter()
            .map(|item| match self.add_node(item) {
                Ok(node_id) => AddNodesResult::added(node_id),
                Err(e) => AddNodesResult::failed(e.status_code()),
            })
            .collect()
    }

    /// Creates a node, links it below its parent and to its type definition.
    ///
    /// A missing or unknown parent is logged and the node is created
    /// unlinked.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NodeIdExists`] if the requested id is taken.
    pub fn add_node(&mut self, item: &AddNodesItem) -> SpaceResult<NodeId> {
        let node_id = item.requested_new_node_id.clone();
        if self.nodes.contains(&node_id) {
            warn!(node_id = %node_id, "add_node: node already exists");
            return Err(SpaceError::NodeIdExists(node_id));
        }

        let mut node = NodeData::new(node_id.clone(), item.browse_name.clone(), item.node_class);
        for (attribute_id, value) in specified_attributes(&item.node_attributes) {
            node.set_attribute(attribute_id, value);
        }
        self.nodes.insert(node)?;

        self.link_to_parent(item);

        if !item.type_definition.is_null() {
            let type_ref = AddReferencesItem::forward(
                node_id.clone(),
                reference_types::HAS_TYPE_DEFINITION,
                item.type_definition.clone(),
                NodeClass::DataType,
            );
            if let Err(e) = self.add_reference(&type_ref) {
                warn!(node_id = %node_id, error = %e, "add_node: type definition not linked");
            }
        }

        Ok(node_id)
    }

    fn link_to_parent(&mut self, item: &AddNodesItem) {
        let node_id = &item.requested_new_node_id;
        if item.parent_node_id.is_null() {
            warn!(node_id = %node_id, "add_node: creating node without parent");
            return;
        }
        match self.nodes.get_mut(&item.parent_node_id) {
            Ok(parent) => parent.push_reference(child_reference(item)),
            Err(_) => warn!(
                node_id = %node_id,
                parent_id = %item.parent_node_id,
                "add_node: requested parent does not exist"
            ),
        }
    }

    // ========================================================================
    // AddReferences
    // ========================================================================

    /// Appends one reference per item to its source node.
    pub fn add_references(&mut self, items: &[AddReferencesItem]) -> Vec<StatusCode> {
        debug!(count = items.len(), "add_references");
        items
            .iter()
            .map(|item| match self.add_reference(item) {
                Ok(()) => StatusCode::GOOD,
                Err(e) => e.status_code(),
            })
            .collect()
    }

    /// Appends a reference to its source node.
    ///
    /// The target does not have to exist. Its BrowseName and DisplayName are
    /// read now; if the target is absent the stored names carry the read
    /// failure status and are never refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::SourceNodeInvalid`] if the source is absent.
    pub fn add_reference(&mut self, item: &AddReferencesItem) -> SpaceResult<()> {
        if !self.nodes.contains(&item.source_node_id) {
            warn!(source_id = %item.source_node_id, "add_reference: source node does not exist");
            return Err(SpaceError::SourceNodeInvalid(item.source_node_id.clone()));
        }

        let browse_name = self.get_attribute_value(&item.target_node_id, AttributeId::BrowseName);
        let display_name =
            self.get_attribute_value(&item.target_node_id, AttributeId::DisplayName);
        let reference = resolved_reference(item, browse_name, display_name);

        self.nodes
            .get_mut(&item.source_node_id)?
            .push_reference(reference);
        Ok(())
    }

    // ========================================================================
    // Read / Write
    // ========================================================================

    /// Reads one data value per item.
    pub fn read(&self, items: &[ReadValueId]) -> Vec<DataValue> {
        debug!(count = items.len(), "read");
        items
            .iter()
            .map(|item| self.get_attribute_value(&item.node_id, item.attribute_id))
            .collect()
    }

    /// Writes one attribute per item.
    pub fn write(&mut self, items: &[WriteValue]) -> Vec<StatusCode> {
        debug!(count = items.len(), "write");
        items
            .iter()
            .map(|item| {
                self.set_attribute_value(&item.node_id, item.attribute_id, item.value.clone())
            })
            .collect()
    }

    /// The value Read reports for one attribute. Failures come back as a
    /// value-less data value carrying the status.
    pub fn get_attribute_value(&self, node_id: &NodeId, attribute_id: AttributeId) -> DataValue {
        match self.attribute(node_id, attribute_id) {
            Ok(attr) => attr.current(),
            Err(e) => DataValue::from_status(e.status_code()),
        }
    }

    /// Overwrites the stored value of one attribute.
    ///
    /// If a change notifier is attached it runs after the value is stored
    /// and its status is returned. The NodeId attribute cannot be written.
    pub fn set_attribute_value(
        &mut self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        value: DataValue,
    ) -> StatusCode {
        let attr = match self.attribute_mut(node_id, attribute_id) {
            Ok(attr) => attr,
            Err(e) => return e.status_code(),
        };
        if attribute_id == AttributeId::NodeId {
            return StatusCode::BAD_NOT_WRITABLE;
        }

        debug!(node_id = %node_id, attribute = %attribute_id, "set attribute value");
        attr.store(value.clone());
        match attr.notifier().cloned() {
            Some(notifier) => notifier.notify(node_id, attribute_id, &value),
            None => StatusCode::GOOD,
        }
    }

    // ========================================================================
    // Browse
    // ========================================================================

    /// Browses one node per description.
    pub fn browse(&self, descriptions: &[BrowseDescription]) -> Vec<BrowseResult> {
        debug!(count = descriptions.len(), "browse");
        descriptions
            .iter()
            .map(|desc| browse_node(&self.nodes, desc))
            .collect()
    }

    // ========================================================================
    // Callbacks
    // ========================================================================

    /// Makes `producer` the source of Read results for one attribute.
    ///
    /// # Errors
    ///
    /// Fails if the node or the attribute does not exist.
    pub fn set_value_producer(
        &mut self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        producer: Arc<dyn ValueProducer>,
    ) -> SpaceResult<()> {
        self.attribute_mut(node_id, attribute_id)?
            .set_producer(producer);
        Ok(())
    }

    /// Attaches a notifier that runs after each successful write.
    ///
    /// # Errors
    ///
    /// Fails if the node or the attribute does not exist.
    pub fn set_change_notifier(
        &mut self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> SpaceResult<()> {
        self.attribute_mut(node_id, attribute_id)?
            .set_notifier(notifier);
        Ok(())
    }

    fn attribute(&self, node_id: &NodeId, attribute_id: AttributeId) -> SpaceResult<&AttributeValue> {
        self.nodes
            .get(node_id)?
            .attribute(attribute_id)
            .ok_or_else(|| SpaceError::AttributeNotFound {
                node_id: node_id.clone(),
                attribute_id,
            })
    }

    fn attribute_mut(
        &mut self,
        node_id: &NodeId,
        attribute_id: AttributeId,
    ) -> SpaceResult<&mut AttributeValue> {
        self.nodes
            .get_mut(node_id)?
            .attribute_mut(attribute_id)
            .ok_or_else(|| SpaceError::AttributeNotFound {
                node_id: node_id.clone(),
                attribute_id,
            })
    }
}
