//! The node store: every node of the address space, keyed by NodeId.

use std::collections::HashMap;

use addrspace_core::NodeId;

use crate::error::{SpaceError, SpaceResult};
use crate::node::NodeData;

/// Exclusive owner of all nodes. At most one node per NodeId.
#[derive(Debug, Default, Clone)]
pub struct NodeStore {
    nodes: HashMap<NodeId, NodeData>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node under its own id.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NodeIdExists`] if the id is taken. The stored
    /// node is left untouched.
    pub fn insert(&mut self, node: NodeData) -> SpaceResult<()> {
        let node_id = node.node_id().clone();
        if self.nodes.contains_key(&node_id) {
            return Err(SpaceError::NodeIdExists(node_id));
        }
        self.nodes.insert(node_id, node);
        Ok(())
    }

    pub fn get(&self, node_id: &NodeId) -> SpaceResult<&NodeData> {
        self.nodes
            .get(node_id)
            .ok_or_else(|| SpaceError::NodeNotFound(node_id.clone()))
    }

    pub fn get_mut(&mut self, node_id: &NodeId) -> SpaceResult<&mut NodeData> {
        self.nodes
            .get_mut(node_id)
            .ok_or_else(|| SpaceError::NodeNotFound(node_id.clone()))
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of all stored nodes, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrspace_core::{NodeClass, QualifiedName};

    fn node(id: u32, name: &str) -> NodeData {
        NodeData::new(
            NodeId::numeric(1, id),
            QualifiedName::new(1, name),
            NodeClass::Variable,
        )
    }

    #[test]
    fn insert_and_get() {
        let mut store = NodeStore::new();
        assert!(store.is_empty());
        store.insert(node(1, "A")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains(&NodeId::numeric(1, 1)));
        assert_eq!(
            store.get(&NodeId::numeric(1, 1)).unwrap().browse_name(),
            Some(&QualifiedName::new(1, "A"))
        );
    }

    #[test]
    fn duplicate_insert_keeps_original() {
        let mut store = NodeStore::new();
        store.insert(node(1, "A")).unwrap();
        let err = store.insert(node(1, "B")).unwrap_err();
        assert_eq!(err, SpaceError::NodeIdExists(NodeId::numeric(1, 1)));
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&NodeId::numeric(1, 1)).unwrap().browse_name(),
            Some(&QualifiedName::new(1, "A"))
        );
    }

    #[test]
    fn missing_node() {
        let mut store = NodeStore::new();
        let id = NodeId::string(1, "nope");
        assert_eq!(
            store.get(&id).unwrap_err(),
            SpaceError::NodeNotFound(id.clone())
        );
        assert!(store.get_mut(&id).is_err());
    }

    #[test]
    fn ids_lists_every_node() {
        let mut store = NodeStore::new();
        store.insert(node(1, "A")).unwrap();
        store.insert(node(2, "B")).unwrap();
        let mut ids: Vec<_> = store.ids().filter_map(NodeId::as_numeric).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
