//! Thread-safe handle to an address space.
//!
//! Mutating services hold the write lock for their whole batch, so a batch
//! is applied atomically with respect to other callers. Read and Browse
//! share the read lock. A poisoned lock is reported as
//! [`SpaceError::LockPoisoned`] rather than propagated as a panic.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use addrspace_core::{
    AddNodesItem, AddNodesResult, AddReferencesItem, AttributeId, BrowseDescription,
    BrowseResult, DataValue, NodeId, ReadValueId, StatusCode, WriteValue,
};

use crate::attribute::{ChangeNotifier, ValueProducer};
use crate::error::{SpaceError, SpaceResult};
use crate::space::AddressSpace;

/// Cloneable, shareable address space.
#[derive(Debug, Clone, Default)]
pub struct SharedAddressSpace {
    inner: Arc<RwLock<AddressSpace>>,
}

impl SharedAddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an address space that was populated single-threaded.
    pub fn from_space(space: AddressSpace) -> Self {
        Self {
            inner: Arc::new(RwLock::new(space)),
        }
    }

    /// Acquires the read lock.
    pub fn read_lock(&self) -> SpaceResult<RwLockReadGuard<'_, AddressSpace>> {
        self.inner.read().map_err(|_| SpaceError::LockPoisoned)
    }

    /// Acquires the write lock.
    pub fn write_lock(&self) -> SpaceResult<RwLockWriteGuard<'_, AddressSpace>> {
        self.inner.write().map_err(|_| SpaceError::LockPoisoned)
    }

    pub fn add_nodes(&self, items: &[AddNodesItem]) -> SpaceResult<Vec<AddNodesResult>> {
        Ok(self.write_lock()?.add_nodes(items))
    }

    pub fn add_references(&self, items: &[AddReferencesItem]) -> SpaceResult<Vec<StatusCode>> {
        Ok(self.write_lock()?.add_references(items))
    }

    pub fn read(&self, items: &[ReadValueId]) -> SpaceResult<Vec<DataValue>> {
        Ok(self.read_lock()?.read(items))
    }

    pub fn write(&self, items: &[WriteValue]) -> SpaceResult<Vec<StatusCode>> {
        Ok(self.write_lock()?.write(items))
    }

    pub fn browse(&self, descriptions: &[BrowseDescription]) -> SpaceResult<Vec<BrowseResult>> {
        Ok(self.read_lock()?.browse(descriptions))
    }

    pub fn get_attribute_value(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
    ) -> SpaceResult<DataValue> {
        Ok(self.read_lock()?.get_attribute_value(node_id, attribute_id))
    }

    pub fn set_attribute_value(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        value: DataValue,
    ) -> SpaceResult<StatusCode> {
        Ok(self
            .write_lock()?
            .set_attribute_value(node_id, attribute_id, value))
    }

    pub fn set_value_producer(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        producer: Arc<dyn ValueProducer>,
    ) -> SpaceResult<()> {
        self.write_lock()?
            .set_value_producer(node_id, attribute_id, producer)
    }

    pub fn set_change_notifier(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> SpaceResult<()> {
        self.write_lock()?
            .set_change_notifier(node_id, attribute_id, notifier)
    }

    pub fn len(&self) -> SpaceResult<usize> {
        Ok(self.read_lock()?.len())
    }

    pub fn contains(&self, node_id: &NodeId) -> SpaceResult<bool> {
        Ok(self.read_lock()?.contains(node_id))
    }
}

impl From<AddressSpace> for SharedAddressSpace {
    fn from(space: AddressSpace) -> Self {
        Self::from_space(space)
    }
}
