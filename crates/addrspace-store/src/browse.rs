//! Browse: filtering a node's stored references.
//!
//! A reference is returned when it passes all three filters (direction,
//! reference type, target node class). Stored order is preserved and there
//! are no continuation points.

use std::collections::HashSet;

use addrspace_core::{
    BrowseDescription, BrowseDirection, BrowseResult, NodeId, ReferenceDescription, StatusCode,
};
use tracing::trace;

use crate::node_store::NodeStore;
use crate::subtype::subtype_closure;

/// Reference-type filter, resolved once per browse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    /// No filter type given.
    Any,
    /// Only this reference type.
    Exact(NodeId),
    /// The filter type or any of its subtypes.
    WithSubtypes(HashSet<NodeId>),
}

impl TypeFilter {
    /// Resolves the filter for `desc`, computing the subtype closure if asked.
    pub fn resolve(store: &NodeStore, desc: &BrowseDescription) -> Self {
        if desc.reference_type_id.is_null() {
            return Self::Any;
        }
        if !desc.include_subtypes {
            return Self::Exact(desc.reference_type_id.clone());
        }
        let mut types: HashSet<NodeId> = subtype_closure(store, &desc.reference_type_id)
            .into_iter()
            .collect();
        types.insert(desc.reference_type_id.clone());
        Self::WithSubtypes(types)
    }

    pub fn matches(&self, reference_type_id: &NodeId) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(id) => id == reference_type_id,
            Self::WithSubtypes(types) => types.contains(reference_type_id),
        }
    }
}

/// Direction filter. Only references stored as forward are ever matched
/// by a directional filter; `Inverse` matches nothing.
pub fn direction_matches(direction: BrowseDirection, is_forward: bool) -> bool {
    match direction {
        BrowseDirection::Both => true,
        BrowseDirection::Forward => is_forward,
        BrowseDirection::Inverse => false,
    }
}

/// Class filter. A zero mask accepts every class.
pub fn class_matches(mask: u32, reference: &ReferenceDescription) -> bool {
    mask == 0 || reference.node_class.matches_mask(mask)
}

/// Browses one node.
pub fn browse_node(store: &NodeStore, desc: &BrowseDescription) -> BrowseResult {
    let Ok(node) = store.get(&desc.node_id) else {
        return BrowseResult::failed(StatusCode::BAD_NODE_ID_INVALID);
    };

    let type_filter = TypeFilter::resolve(store, desc);
    let references = node
        .references()
        .iter()
        .filter(|r| is_suitable(desc, &type_filter, r))
        .cloned()
        .collect();

    BrowseResult {
        status: StatusCode::GOOD,
        references,
    }
}

fn is_suitable(
    desc: &BrowseDescription,
    type_filter: &TypeFilter,
    reference: &ReferenceDescription,
) -> bool {
    if !direction_matches(desc.browse_direction, reference.is_forward) {
        trace!(target_id = %reference.node_id, "rejected by direction");
        return false;
    }
    if !type_filter.matches(&reference.reference_type_id) {
        trace!(
            target_id = %reference.node_id,
            reference_type = %reference.reference_type_id,
            "rejected by reference type"
        );
        return false;
    }
    if !class_matches(desc.node_class_mask, reference) {
        trace!(
            target_id = %reference.node_id,
            node_class = %reference.node_class,
            "rejected by node class"
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrspace_core::ids::reference_types;
    use addrspace_core::{DataValue, NodeClass};

    fn reference(ty: NodeId, is_forward: bool, class: NodeClass) -> ReferenceDescription {
        ReferenceDescription {
            reference_type_id: ty,
            is_forward,
            node_id: NodeId::numeric(2, 7),
            node_class: class,
            browse_name: DataValue::default(),
            display_name: DataValue::default(),
            type_definition: None,
        }
    }

    #[test]
    fn direction_asymmetry() {
        assert!(direction_matches(BrowseDirection::Forward, true));
        assert!(!direction_matches(BrowseDirection::Forward, false));
        assert!(direction_matches(BrowseDirection::Both, true));
        assert!(direction_matches(BrowseDirection::Both, false));
        assert!(!direction_matches(BrowseDirection::Inverse, true));
        assert!(!direction_matches(BrowseDirection::Inverse, false));
    }

    #[test]
    fn class_mask() {
        let r = reference(reference_types::ORGANIZES, true, NodeClass::Variable);
        assert!(class_matches(0, &r));
        assert!(class_matches(
            NodeClass::Variable.bits() | NodeClass::Object.bits(),
            &r
        ));
        assert!(!class_matches(NodeClass::Object.bits(), &r));
    }

    #[test]
    fn null_type_filter_is_any() {
        let store = NodeStore::new();
        let desc = BrowseDescription::new(NodeId::numeric(0, 85));
        let filter = TypeFilter::resolve(&store, &desc);
        assert_eq!(filter, TypeFilter::Any);
        assert!(filter.matches(&reference_types::HAS_COMPONENT));
    }

    #[test]
    fn exact_type_filter() {
        let store = NodeStore::new();
        let desc = BrowseDescription::new(NodeId::numeric(0, 85))
            .with_reference_type(reference_types::ORGANIZES, false);
        let filter = TypeFilter::resolve(&store, &desc);
        assert!(filter.matches(&reference_types::ORGANIZES));
        assert!(!filter.matches(&reference_types::HAS_COMPONENT));
    }

    #[test]
    fn subtype_filter_includes_filter_type() {
        let store = NodeStore::new();
        let desc = BrowseDescription::new(NodeId::numeric(0, 85))
            .with_reference_type(reference_types::HIERARCHICAL_REFERENCES, true);
        let filter = TypeFilter::resolve(&store, &desc);
        assert!(filter.matches(&reference_types::HIERARCHICAL_REFERENCES));
        assert!(!filter.matches(&reference_types::ORGANIZES));
    }

    #[test]
    fn unknown_start_node() {
        let store = NodeStore::new();
        let result = browse_node(&store, &BrowseDescription::new(NodeId::numeric(0, 85)));
        assert_eq!(result.status, StatusCode::BAD_NODE_ID_INVALID);
        assert!(result.references.is_empty());
    }
}
