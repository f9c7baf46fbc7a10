//! A single node: identity, attribute table and outgoing references.

use std::collections::BTreeMap;

use addrspace_core::{
    AttributeId, DataValue, NodeClass, NodeId, QualifiedName, ReferenceDescription, Variant,
};

use crate::attribute::AttributeValue;

/// One node of the address space.
///
/// BrowseName and NodeClass are always present. References are stored only
/// on their source node and are kept in insertion order, which is also the
/// order Browse reports them in.
#[derive(Debug, Clone)]
pub struct NodeData {
    node_id: NodeId,
    attributes: BTreeMap<AttributeId, AttributeValue>,
    references: Vec<ReferenceDescription>,
}

impl NodeData {
    /// Creates a node with its two mandatory attributes.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, node_class: NodeClass) -> Self {
        let mut node = Self {
            node_id,
            attributes: BTreeMap::new(),
            references: Vec::new(),
        };
        node.set_attribute(AttributeId::BrowseName, Variant::QualifiedName(browse_name));
        node.set_attribute(
            AttributeId::NodeClass,
            Variant::Int32(node_class.bits() as i32),
        );
        node
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn attribute(&self, attribute_id: AttributeId) -> Option<&AttributeValue> {
        self.attributes.get(&attribute_id)
    }

    pub fn attribute_mut(&mut self, attribute_id: AttributeId) -> Option<&mut AttributeValue> {
        self.attributes.get_mut(&attribute_id)
    }

    pub fn has_attribute(&self, attribute_id: AttributeId) -> bool {
        self.attributes.contains_key(&attribute_id)
    }

    /// Installs a stored value for `attribute_id`, replacing any previous
    /// slot along with its callbacks.
    pub fn set_attribute(&mut self, attribute_id: AttributeId, value: impl Into<Variant>) {
        self.attributes.insert(
            attribute_id,
            AttributeValue::new(DataValue::new(value.into())),
        );
    }

    /// Attribute ids present on this node, in numeric order.
    pub fn attribute_ids(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.attributes.keys().copied()
    }

    /// Outgoing references in insertion order.
    pub fn references(&self) -> &[ReferenceDescription] {
        &self.references
    }

    pub fn push_reference(&mut self, reference: ReferenceDescription) {
        self.references.push(reference);
    }

    /// The browse name, read from the stored attribute.
    pub fn browse_name(&self) -> Option<&QualifiedName> {
        self.attribute(AttributeId::BrowseName)?
            .stored()
            .value
            .as_qualified_name()
    }

    /// The node class, read from the stored attribute.
    pub fn node_class(&self) -> NodeClass {
        self.attribute(AttributeId::NodeClass)
            .and_then(|attr| attr.stored().value.as_i32())
            .and_then(|code| u32::try_from(code).ok())
            .and_then(|code| NodeClass::try_from(code).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump() -> NodeData {
        NodeData::new(
            NodeId::string(2, "Pump"),
            QualifiedName::new(2, "Pump"),
            NodeClass::Object,
        )
    }

    #[test]
    fn mandatory_attributes() {
        let node = pump();
        assert_eq!(node.browse_name(), Some(&QualifiedName::new(2, "Pump")));
        assert_eq!(node.node_class(), NodeClass::Object);
        assert_eq!(
            node.attribute(AttributeId::NodeClass).map(|a| a.stored().value.clone()),
            Some(Variant::Int32(1))
        );
        assert!(!node.has_attribute(AttributeId::DisplayName));
    }

    #[test]
    fn attribute_ids_are_ordered() {
        let mut node = pump();
        node.set_attribute(AttributeId::Value, 1.5f64);
        node.set_attribute(AttributeId::DisplayName, "Pump");
        let ids: Vec<_> = node.attribute_ids().collect();
        assert_eq!(
            ids,
            vec![
                AttributeId::NodeClass,
                AttributeId::BrowseName,
                AttributeId::DisplayName,
                AttributeId::Value
            ]
        );
    }

    #[test]
    fn references_keep_insertion_order() {
        let mut node = pump();
        for n in [3u32, 1, 2] {
            node.push_reference(ReferenceDescription {
                reference_type_id: NodeId::numeric(0, 47),
                is_forward: true,
                node_id: NodeId::numeric(2, n),
                node_class: NodeClass::Variable,
                browse_name: DataValue::default(),
                display_name: DataValue::default(),
                type_definition: None,
            });
        }
        let targets: Vec<_> = node
            .references()
            .iter()
            .map(|r| r.node_id.as_numeric())
            .collect();
        assert_eq!(targets, vec![Some(3), Some(1), Some(2)]);
    }
}
