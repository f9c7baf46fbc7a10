//! Attribute slots and the AddNodes attribute table.
//!
//! An [`AttributeValue`] always holds a stored [`DataValue`]. Its
//! [`ValueSource`] decides what Read returns: the stored value, or the
//! output of an attached [`ValueProducer`]. A [`ChangeNotifier`] can be
//! attached independently and runs after every successful Write.

use std::fmt;
use std::sync::Arc;

use addrspace_core::{
    AttributeId, DataValue, NodeAttributes, NodeAttributesMask, NodeId, StatusCode, Variant,
};

// ============================================================================
// Callbacks
// ============================================================================

/// Supplies the current value of a dynamic attribute.
///
/// Invoked while the address space lock is held, so implementations must
/// not block.
pub trait ValueProducer: Send + Sync {
    /// Returns the value to report for a Read.
    fn produce(&self) -> DataValue;
}

impl<F> ValueProducer for F
where
    F: Fn() -> DataValue + Send + Sync,
{
    fn produce(&self) -> DataValue {
        self()
    }
}

/// Observes successful writes to an attribute.
///
/// The returned status becomes the Write result for that item. Invoked
/// while the address space lock is held, so implementations must not block.
pub trait ChangeNotifier: Send + Sync {
    /// Called after `value` has been stored on (`node_id`, `attribute_id`).
    fn notify(&self, node_id: &NodeId, attribute_id: AttributeId, value: &DataValue)
    -> StatusCode;
}

impl<F> ChangeNotifier for F
where
    F: Fn(&NodeId, AttributeId, &DataValue) -> StatusCode + Send + Sync,
{
    fn notify(
        &self,
        node_id: &NodeId,
        attribute_id: AttributeId,
        value: &DataValue,
    ) -> StatusCode {
        self(node_id, attribute_id, value)
    }
}

// ============================================================================
// Attribute Slot
// ============================================================================

/// Where Read takes an attribute's value from.
#[derive(Clone, Default)]
pub enum ValueSource {
    /// The stored data value is authoritative.
    #[default]
    Stored,
    /// The producer is authoritative; the stored value is only a shadow.
    Produced(Arc<dyn ValueProducer>),
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => f.write_str("Stored"),
            Self::Produced(_) => f.write_str("Produced(..)"),
        }
    }
}

/// One attribute of one node.
#[derive(Clone)]
pub struct AttributeValue {
    value: DataValue,
    source: ValueSource,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl AttributeValue {
    /// A stored attribute with no callbacks.
    pub fn new(value: DataValue) -> Self {
        Self {
            value,
            source: ValueSource::Stored,
            notifier: None,
        }
    }

    /// The value Read reports: the producer's output if one is attached,
    /// otherwise the stored value.
    pub fn current(&self) -> DataValue {
        match &self.source {
            ValueSource::Stored => self.value.clone(),
            ValueSource::Produced(producer) => producer.produce(),
        }
    }

    /// The stored value, regardless of any producer.
    pub fn stored(&self) -> &DataValue {
        &self.value
    }

    /// Overwrites the stored value. Does not run the notifier.
    pub fn store(&mut self, value: DataValue) {
        self.value = value;
    }

    pub fn source(&self) -> &ValueSource {
        &self.source
    }

    pub fn is_produced(&self) -> bool {
        matches!(self.source, ValueSource::Produced(_))
    }

    /// Makes `producer` authoritative for reads.
    pub fn set_producer(&mut self, producer: Arc<dyn ValueProducer>) {
        self.source = ValueSource::Produced(producer);
    }

    /// Makes the stored value authoritative again.
    pub fn clear_producer(&mut self) {
        self.source = ValueSource::Stored;
    }

    pub fn notifier(&self) -> Option<&Arc<dyn ChangeNotifier>> {
        self.notifier.as_ref()
    }

    pub fn set_notifier(&mut self, notifier: Arc<dyn ChangeNotifier>) {
        self.notifier = Some(notifier);
    }

    pub fn clear_notifier(&mut self) {
        self.notifier = None;
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeValue")
            .field("value", &self.value)
            .field("source", &self.source)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

// ============================================================================
// AddNodes Attribute Table
// ============================================================================

/// Mask bit to attribute id, in mask-bit order.
const ATTRIBUTE_TABLE: [(NodeAttributesMask, AttributeId); 22] = [
    (NodeAttributesMask::ACCESS_LEVEL, AttributeId::AccessLevel),
    (NodeAttributesMask::ARRAY_DIMENSIONS, AttributeId::ArrayDimensions),
    (NodeAttributesMask::BROWSE_NAME, AttributeId::BrowseName),
    (NodeAttributesMask::CONTAINS_NO_LOOPS, AttributeId::ContainsNoLoops),
    (NodeAttributesMask::DATA_TYPE, AttributeId::DataType),
    (NodeAttributesMask::DESCRIPTION, AttributeId::Description),
    (NodeAttributesMask::DISPLAY_NAME, AttributeId::DisplayName),
    (NodeAttributesMask::EVENT_NOTIFIER, AttributeId::EventNotifier),
    (NodeAttributesMask::EXECUTABLE, AttributeId::Executable),
    (NodeAttributesMask::HISTORIZING, AttributeId::Historizing),
    (NodeAttributesMask::INVERSE_NAME, AttributeId::InverseName),
    (NodeAttributesMask::IS_ABSTRACT, AttributeId::IsAbstract),
    (
        NodeAttributesMask::MINIMUM_SAMPLING_INTERVAL,
        AttributeId::MinimumSamplingInterval,
    ),
    (NodeAttributesMask::NODE_CLASS, AttributeId::NodeClass),
    (NodeAttributesMask::NODE_ID, AttributeId::NodeId),
    (NodeAttributesMask::SYMMETRIC, AttributeId::Symmetric),
    (NodeAttributesMask::USER_ACCESS_LEVEL, AttributeId::UserAccessLevel),
    (NodeAttributesMask::USER_EXECUTABLE, AttributeId::UserExecutable),
    (NodeAttributesMask::USER_WRITE_MASK, AttributeId::UserWriteMask),
    (NodeAttributesMask::VALUE_RANK, AttributeId::ValueRank),
    (NodeAttributesMask::WRITE_MASK, AttributeId::WriteMask),
    (NodeAttributesMask::VALUE, AttributeId::Value),
];

/// Converts one field of the bundle to its fixed variant kind.
fn field_variant(attrs: &NodeAttributes, attribute_id: AttributeId) -> Variant {
    match attribute_id {
        AttributeId::AccessLevel => Variant::Byte(attrs.access_level),
        AttributeId::ArrayDimensions => Variant::from(attrs.array_dimensions.clone()),
        AttributeId::BrowseName => Variant::QualifiedName(attrs.browse_name.clone()),
        AttributeId::ContainsNoLoops => Variant::Boolean(attrs.contains_no_loops),
        AttributeId::DataType => Variant::NodeId(attrs.data_type.clone()),
        AttributeId::Description => Variant::LocalizedText(attrs.description.clone()),
        AttributeId::DisplayName => Variant::LocalizedText(attrs.display_name.clone()),
        AttributeId::EventNotifier => Variant::Byte(attrs.event_notifier),
        AttributeId::Executable => Variant::Boolean(attrs.executable),
        AttributeId::Historizing => Variant::Boolean(attrs.historizing),
        AttributeId::InverseName => Variant::LocalizedText(attrs.inverse_name.clone()),
        AttributeId::IsAbstract => Variant::Boolean(attrs.is_abstract),
        AttributeId::MinimumSamplingInterval => Variant::Double(attrs.minimum_sampling_interval),
        AttributeId::NodeClass => Variant::Int32(attrs.node_class.bits() as i32),
        AttributeId::NodeId => Variant::NodeId(attrs.node_id.clone()),
        AttributeId::Symmetric => Variant::Boolean(attrs.symmetric),
        AttributeId::UserAccessLevel => Variant::Byte(attrs.user_access_level),
        AttributeId::UserExecutable => Variant::Boolean(attrs.user_executable),
        AttributeId::UserWriteMask => Variant::UInt32(attrs.user_write_mask),
        AttributeId::ValueRank => Variant::Int32(attrs.value_rank),
        AttributeId::WriteMask => Variant::UInt32(attrs.write_mask),
        AttributeId::Value => attrs.value.clone(),
    }
}

/// Yields every attribute whose bit is set in `specified_attributes`,
/// converted to its fixed variant kind.
pub fn specified_attributes(
    attrs: &NodeAttributes,
) -> impl Iterator<Item = (AttributeId, Variant)> + '_ {
    ATTRIBUTE_TABLE
        .iter()
        .filter(|(bit, _)| attrs.is_specified(*bit))
        .map(|(_, attribute_id)| (*attribute_id, field_variant(attrs, *attribute_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrspace_core::{LocalizedText, NodeClass, VariantType};
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn stored_value_is_current_without_producer() {
        let slot = AttributeValue::new(DataValue::new(5i32));
        assert_eq!(slot.current(), DataValue::new(5i32));
        assert!(!slot.is_produced());
    }

    #[test]
    fn producer_replaces_stored_value() {
        let counter = Arc::new(AtomicU32::new(0));
        let c = counter.clone();
        let mut slot = AttributeValue::new(DataValue::new(0u32));
        slot.set_producer(Arc::new(move || {
            DataValue::new(c.fetch_add(1, Ordering::SeqCst) + 100)
        }));

        assert_eq!(slot.current().value, Variant::UInt32(100));
        slot.store(DataValue::new(7u32));
        assert_eq!(slot.current().value, Variant::UInt32(101));
        assert_eq!(slot.stored().value, Variant::UInt32(7));

        slot.clear_producer();
        assert_eq!(slot.current().value, Variant::UInt32(7));
    }

    #[test]
    fn notifier_is_independent_of_source() {
        let mut slot = AttributeValue::new(DataValue::default());
        slot.set_notifier(Arc::new(
            |_: &NodeId, _: AttributeId, _: &DataValue| StatusCode::GOOD,
        ));
        assert!(slot.notifier().is_some());
        assert!(!slot.is_produced());
        slot.clear_notifier();
        assert!(slot.notifier().is_none());
    }

    #[test]
    fn unset_bits_are_skipped() {
        let attrs = NodeAttributes::default();
        assert_eq!(specified_attributes(&attrs).count(), 0);
    }

    #[test]
    fn fixed_kinds() {
        let attrs = NodeAttributes::default()
            .with_access_level(3)
            .with_data_type(NodeId::numeric(0, 11))
            .with_is_abstract(true)
            .with_write_mask(0x20)
            .with_array_dimensions(vec![2, 2])
            .with_description(LocalizedText::new("desc"));

        let kinds: Vec<(AttributeId, VariantType)> = specified_attributes(&attrs)
            .map(|(id, v)| (id, v.type_id()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (AttributeId::AccessLevel, VariantType::Byte),
                (AttributeId::ArrayDimensions, VariantType::UInt32),
                (AttributeId::DataType, VariantType::NodeId),
                (AttributeId::Description, VariantType::LocalizedText),
                (AttributeId::IsAbstract, VariantType::Boolean),
                (AttributeId::WriteMask, VariantType::UInt32),
            ]
        );
    }

    #[test]
    fn value_keeps_supplied_kind() {
        let attrs = NodeAttributes::default().with_value("running");
        let (id, value) = specified_attributes(&attrs).next().unwrap();
        assert_eq!(id, AttributeId::Value);
        assert_eq!(value, Variant::String("running".to_string()));
    }

    #[test]
    fn node_class_bit_maps_to_int32() {
        let mut attrs = NodeAttributes {
            node_class: NodeClass::Variable,
            ..NodeAttributes::default()
        };
        attrs.specified_attributes |= NodeAttributesMask::NODE_CLASS;
        let (_, value) = specified_attributes(&attrs).next().unwrap();
        assert_eq!(value, Variant::Int32(2));
    }
}
