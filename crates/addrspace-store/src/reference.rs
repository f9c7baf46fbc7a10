//! Construction of stored references.
//!
//! References carry a snapshot of the target's BrowseName and DisplayName,
//! taken when the reference is created. They are never refreshed.

use addrspace_core::{
    AddNodesItem, AddReferencesItem, DataValue, LocalizedText, NodeAttributesMask,
    ReferenceDescription, Variant,
};

/// The forward reference a parent gets to a node created below it.
///
/// Names come straight from the item: the DisplayName attribute if one was
/// specified, otherwise the local part of the browse name.
pub fn child_reference(item: &AddNodesItem) -> ReferenceDescription {
    let attrs = &item.node_attributes;
    let display_name = if attrs.is_specified(NodeAttributesMask::DISPLAY_NAME) {
        attrs.display_name.clone()
    } else {
        LocalizedText::new(item.browse_name.name.clone())
    };

    ReferenceDescription {
        reference_type_id: item.reference_type_id.clone(),
        is_forward: true,
        node_id: item.requested_new_node_id.clone(),
        node_class: item.node_class,
        browse_name: DataValue::new(Variant::QualifiedName(item.browse_name.clone())),
        display_name: DataValue::new(Variant::LocalizedText(display_name)),
        type_definition: (!item.type_definition.is_null()).then(|| item.type_definition.clone()),
    }
}

/// A reference built from an AddReferences item and the target's names as
/// the read path resolved them.
pub fn resolved_reference(
    item: &AddReferencesItem,
    browse_name: DataValue,
    display_name: DataValue,
) -> ReferenceDescription {
    ReferenceDescription {
        reference_type_id: item.reference_type_id.clone(),
        is_forward: item.is_forward,
        node_id: item.target_node_id.clone(),
        node_class: item.target_node_class,
        browse_name,
        display_name,
        type_definition: None,
    }
}
