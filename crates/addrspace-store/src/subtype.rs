//! Reference-type subtype resolution.
//!
//! HasSubtype edges are ordinary forward references stored on the supertype
//! node, so the hierarchy lives in the same graph as everything else.

use std::collections::HashSet;

use addrspace_core::NodeId;
use addrspace_core::ids::reference_types;
use tracing::debug;

use crate::node_store::NodeStore;

/// Every type reachable from `type_id` over one or more forward HasSubtype
/// edges, in depth-first pre-order.
///
/// `type_id` itself is only part of the result if the data contains a
/// HasSubtype path back to it. A type absent from the store has no
/// subtypes. Each id is reported once, so cycles terminate.
pub fn subtype_closure(store: &NodeStore, type_id: &NodeId) -> Vec<NodeId> {
    let mut closure = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<NodeId> = direct_subtypes(store, type_id).rev().collect();

    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            debug!(type_id = %type_id, subtype = %id, "subtype already visited");
            continue;
        }
        stack.extend(direct_subtypes(store, &id).rev());
        closure.push(id);
    }

    closure
}

/// Targets of the forward HasSubtype references stored on `type_id`.
fn direct_subtypes<'a>(
    store: &'a NodeStore,
    type_id: &NodeId,
) -> impl DoubleEndedIterator<Item = NodeId> + 'a {
    store
        .get(type_id)
        .map(|node| node.references())
        .unwrap_or_default()
        .iter()
        .filter(|r| r.is_forward && r.reference_type_id == reference_types::HAS_SUBTYPE)
        .map(|r| r.node_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeData;
    use addrspace_core::{DataValue, NodeClass, QualifiedName, ReferenceDescription};

    fn ty(n: u32) -> NodeId {
        NodeId::numeric(1, n)
    }

    fn has_subtype(target: NodeId, is_forward: bool) -> ReferenceDescription {
        ReferenceDescription {
            reference_type_id: reference_types::HAS_SUBTYPE,
            is_forward,
            node_id: target,
            node_class: NodeClass::ReferenceType,
            browse_name: DataValue::default(),
            display_name: DataValue::default(),
            type_definition: None,
        }
    }

    /// Builds a store from (supertype, [subtypes]) pairs.
    fn store(edges: &[(u32, &[u32])]) -> NodeStore {
        let mut store = NodeStore::new();
        for (parent, children) in edges {
            let mut node = NodeData::new(
                ty(*parent),
                QualifiedName::new(1, format!("T{parent}")),
                NodeClass::ReferenceType,
            );
            for child in *children {
                node.push_reference(has_subtype(ty(*child), true));
            }
            store.insert(node).unwrap();
        }
        store
    }

    #[test]
    fn pre_order_closure() {
        // T(1) -> {T1(2), T2(3)}, T2 -> {T3(4)}
        let store = store(&[(1, &[2, 3]), (2, &[]), (3, &[4]), (4, &[])]);
        assert_eq!(subtype_closure(&store, &ty(1)), vec![ty(2), ty(3), ty(4)]);
        assert_eq!(subtype_closure(&store, &ty(3)), vec![ty(4)]);
        assert!(subtype_closure(&store, &ty(4)).is_empty());
    }

    #[test]
    fn depth_first_before_siblings() {
        // 1 -> {2, 5}, 2 -> {3}, 3 -> {4}
        let store = store(&[(1, &[2, 5]), (2, &[3]), (3, &[4])]);
        assert_eq!(
            subtype_closure(&store, &ty(1)),
            vec![ty(2), ty(3), ty(4), ty(5)]
        );
    }

    #[test]
    fn absent_type_has_no_subtypes() {
        let store = store(&[(1, &[2])]);
        assert!(subtype_closure(&store, &ty(42)).is_empty());
    }

    #[test]
    fn cycle_terminates() {
        // 1 -> 2 -> 3 -> 1
        let store = store(&[(1, &[2]), (2, &[3]), (3, &[1])]);
        assert_eq!(subtype_closure(&store, &ty(1)), vec![ty(2), ty(3), ty(1)]);
    }

    #[test]
    fn self_loop_includes_start() {
        let store = store(&[(1, &[1, 2])]);
        assert_eq!(subtype_closure(&store, &ty(1)), vec![ty(1), ty(2)]);
    }

    #[test]
    fn inverse_has_subtype_is_not_followed() {
        let mut store = store(&[(1, &[2]), (2, &[])]);
        store
            .get_mut(&ty(2))
            .unwrap()
            .push_reference(has_subtype(ty(1), false));
        assert_eq!(subtype_closure(&store, &ty(2)), Vec::<NodeId>::new());
    }

    #[test]
    fn other_reference_types_are_ignored() {
        let mut store = store(&[(1, &[2])]);
        store.get_mut(&ty(1)).unwrap().push_reference(ReferenceDescription {
            reference_type_id: reference_types::HAS_COMPONENT,
            ..has_subtype(ty(9), true)
        });
        assert_eq!(subtype_closure(&store, &ty(1)), vec![ty(2)]);
    }
}
