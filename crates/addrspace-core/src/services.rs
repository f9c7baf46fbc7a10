//! Typed request and result structures for the address space services.
//!
//! The protocol-handling layer decodes wire messages into these structures
//! and encodes the results back. Every batch service takes a slice of items
//! and returns exactly one result per item, in input order.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::node_id::NodeId;
use crate::status::StatusCode;
use crate::types::{AttributeId, BrowseDirection, NodeClass};
use crate::variant::{DataValue, LocalizedText, QualifiedName, Variant};

// ============================================================================
// Node Attributes
// ============================================================================

bitflags! {
    /// Selects which optional fields of [`NodeAttributes`] were supplied.
    ///
    /// Bit values are fixed by the protocol and travel as a plain number.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeAttributesMask: u32 {
        const ACCESS_LEVEL              = 1;
        const ARRAY_DIMENSIONS          = 1 << 1;
        const BROWSE_NAME               = 1 << 2;
        const CONTAINS_NO_LOOPS         = 1 << 3;
        const DATA_TYPE                 = 1 << 4;
        const DESCRIPTION               = 1 << 5;
        const DISPLAY_NAME              = 1 << 6;
        const EVENT_NOTIFIER            = 1 << 7;
        const EXECUTABLE                = 1 << 8;
        const HISTORIZING               = 1 << 9;
        const INVERSE_NAME              = 1 << 10;
        const IS_ABSTRACT               = 1 << 11;
        const MINIMUM_SAMPLING_INTERVAL = 1 << 12;
        const NODE_CLASS                = 1 << 13;
        const NODE_ID                   = 1 << 14;
        const SYMMETRIC                 = 1 << 15;
        const USER_ACCESS_LEVEL         = 1 << 16;
        const USER_EXECUTABLE           = 1 << 17;
        const USER_WRITE_MASK           = 1 << 18;
        const VALUE_RANK                = 1 << 19;
        const WRITE_MASK                = 1 << 20;
        const VALUE                     = 1 << 21;
    }
}

impl Serialize for NodeAttributesMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

// Unknown bits are dropped, matching a decoder that ignores reserved bits.
impl<'de> Deserialize<'de> for NodeAttributesMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

/// Attribute bundle supplied with an AddNodes item.
///
/// Only fields whose bit is set in `specified_attributes` are applied. The
/// `with_*` setters assign a field and set its bit in one step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeAttributes {
    pub specified_attributes: NodeAttributesMask,
    pub access_level: u8,
    pub array_dimensions: Vec<u32>,
    pub browse_name: QualifiedName,
    pub contains_no_loops: bool,
    pub data_type: NodeId,
    pub description: LocalizedText,
    pub display_name: LocalizedText,
    pub event_notifier: u8,
    pub executable: bool,
    pub historizing: bool,
    pub inverse_name: LocalizedText,
    pub is_abstract: bool,
    pub minimum_sampling_interval: f64,
    pub node_class: NodeClass,
    pub node_id: NodeId,
    pub symmetric: bool,
    pub user_access_level: u8,
    pub user_executable: bool,
    pub user_write_mask: u32,
    pub value_rank: i32,
    pub write_mask: u32,
    pub value: Variant,
}

impl NodeAttributes {
    /// Returns true if the given bit was specified.
    #[must_use]
    pub fn is_specified(&self, bit: NodeAttributesMask) -> bool {
        self.specified_attributes.contains(bit)
    }

    #[must_use]
    pub fn with_access_level(mut self, access_level: u8) -> Self {
        self.access_level = access_level;
        self.specified_attributes |= NodeAttributesMask::ACCESS_LEVEL;
        self
    }

    #[must_use]
    pub fn with_array_dimensions(mut self, dims: impl Into<Vec<u32>>) -> Self {
        self.array_dimensions = dims.into();
        self.specified_attributes |= NodeAttributesMask::ARRAY_DIMENSIONS;
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: NodeId) -> Self {
        self.data_type = data_type;
        self.specified_attributes |= NodeAttributesMask::DATA_TYPE;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = description.into();
        self.specified_attributes |= NodeAttributesMask::DESCRIPTION;
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<LocalizedText>) -> Self {
        self.display_name = display_name.into();
        self.specified_attributes |= NodeAttributesMask::DISPLAY_NAME;
        self
    }

    #[must_use]
    pub fn with_event_notifier(mut self, event_notifier: u8) -> Self {
        self.event_notifier = event_notifier;
        self.specified_attributes |= NodeAttributesMask::EVENT_NOTIFIER;
        self
    }

    #[must_use]
    pub fn with_executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self.specified_attributes |= NodeAttributesMask::EXECUTABLE;
        self
    }

    #[must_use]
    pub fn with_historizing(mut self, historizing: bool) -> Self {
        self.historizing = historizing;
        self.specified_attributes |= NodeAttributesMask::HISTORIZING;
        self
    }

    #[must_use]
    pub fn with_inverse_name(mut self, inverse_name: impl Into<LocalizedText>) -> Self {
        self.inverse_name = inverse_name.into();
        self.specified_attributes |= NodeAttributesMask::INVERSE_NAME;
        self
    }

    #[must_use]
    pub fn with_is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self.specified_attributes |= NodeAttributesMask::IS_ABSTRACT;
        self
    }

    #[must_use]
    pub fn with_minimum_sampling_interval(mut self, interval_ms: f64) -> Self {
        self.minimum_sampling_interval = interval_ms;
        self.specified_attributes |= NodeAttributesMask::MINIMUM_SAMPLING_INTERVAL;
        self
    }

    #[must_use]
    pub fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self.specified_attributes |= NodeAttributesMask::SYMMETRIC;
        self
    }

    #[must_use]
    pub fn with_value_rank(mut self, value_rank: i32) -> Self {
        self.value_rank = value_rank;
        self.specified_attributes |= NodeAttributesMask::VALUE_RANK;
        self
    }

    #[must_use]
    pub fn with_write_mask(mut self, write_mask: u32) -> Self {
        self.write_mask = write_mask;
        self.specified_attributes |= NodeAttributesMask::WRITE_MASK;
        self
    }

    #[must_use]
    pub fn with_user_write_mask(mut self, user_write_mask: u32) -> Self {
        self.user_write_mask = user_write_mask;
        self.specified_attributes |= NodeAttributesMask::USER_WRITE_MASK;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Variant>) -> Self {
        self.value = value.into();
        self.specified_attributes |= NodeAttributesMask::VALUE;
        self
    }
}

// ============================================================================
// AddNodes
// ============================================================================

/// One node to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNodesItem {
    /// Parent to link from. Null means no parent link.
    #[serde(default)]
    pub parent_node_id: NodeId,
    /// Type of the reference from the parent to the new node.
    #[serde(default)]
    pub reference_type_id: NodeId,
    pub requested_new_node_id: NodeId,
    pub browse_name: QualifiedName,
    pub node_class: NodeClass,
    #[serde(default)]
    pub node_attributes: NodeAttributes,
    /// Type definition of the new node. Null means none.
    #[serde(default)]
    pub type_definition: NodeId,
}

impl AddNodesItem {
    /// Creates an item without parent, type definition, or extra attributes.
    #[must_use]
    pub fn new(
        requested_new_node_id: NodeId,
        browse_name: QualifiedName,
        node_class: NodeClass,
    ) -> Self {
        Self {
            parent_node_id: NodeId::null(),
            reference_type_id: NodeId::null(),
            requested_new_node_id,
            browse_name,
            node_class,
            node_attributes: NodeAttributes::default(),
            type_definition: NodeId::null(),
        }
    }

    /// Links the new node below `parent` with the given reference type.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId, reference_type_id: NodeId) -> Self {
        self.parent_node_id = parent;
        self.reference_type_id = reference_type_id;
        self
    }

    /// Sets the type definition.
    #[must_use]
    pub fn with_type_definition(mut self, type_definition: NodeId) -> Self {
        self.type_definition = type_definition;
        self
    }

    /// Sets the attribute bundle.
    #[must_use]
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.node_attributes = attributes;
        self
    }
}

/// Outcome of one AddNodes item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddNodesResult {
    pub status: StatusCode,
    /// The created node's id. Null on failure.
    pub added_node_id: NodeId,
}

impl AddNodesResult {
    #[must_use]
    pub fn added(node_id: NodeId) -> Self {
        Self {
            status: StatusCode::GOOD,
            added_node_id: node_id,
        }
    }

    #[must_use]
    pub fn failed(status: StatusCode) -> Self {
        Self {
            status,
            added_node_id: NodeId::null(),
        }
    }
}

// ============================================================================
// AddReferences
// ============================================================================

/// One reference to append to its source node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddReferencesItem {
    pub source_node_id: NodeId,
    pub reference_type_id: NodeId,
    #[serde(default = "default_true")]
    pub is_forward: bool,
    pub target_node_id: NodeId,
    #[serde(default)]
    pub target_node_class: NodeClass,
}

fn default_true() -> bool {
    true
}

impl AddReferencesItem {
    /// A forward reference from `source` to `target`.
    #[must_use]
    pub fn forward(
        source_node_id: NodeId,
        reference_type_id: NodeId,
        target_node_id: NodeId,
        target_node_class: NodeClass,
    ) -> Self {
        Self {
            source_node_id,
            reference_type_id,
            is_forward: true,
            target_node_id,
            target_node_class,
        }
    }

    /// An inverse reference stored on `source`, pointing back at `target`.
    #[must_use]
    pub fn inverse(
        source_node_id: NodeId,
        reference_type_id: NodeId,
        target_node_id: NodeId,
        target_node_class: NodeClass,
    ) -> Self {
        Self {
            is_forward: false,
            ..Self::forward(
                source_node_id,
                reference_type_id,
                target_node_id,
                target_node_class,
            )
        }
    }
}

// ============================================================================
// Read / Write
// ============================================================================

/// One (node, attribute) pair to read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    pub attribute_id: AttributeId,
}

impl ReadValueId {
    #[must_use]
    pub fn new(node_id: NodeId, attribute_id: AttributeId) -> Self {
        Self {
            node_id,
            attribute_id,
        }
    }
}

/// One attribute write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: AttributeId,
    pub value: DataValue,
}

impl WriteValue {
    #[must_use]
    pub fn new(node_id: NodeId, attribute_id: AttributeId, value: impl Into<DataValue>) -> Self {
        Self {
            node_id,
            attribute_id,
            value: value.into(),
        }
    }
}

// ============================================================================
// Browse
// ============================================================================

/// One browse request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseDescription {
    pub node_id: NodeId,
    #[serde(default)]
    pub browse_direction: BrowseDirection,
    /// Reference type filter. Null means any type.
    #[serde(default)]
    pub reference_type_id: NodeId,
    #[serde(default)]
    pub include_subtypes: bool,
    /// Bitwise OR of [`NodeClass`] values. Zero means any class.
    #[serde(default)]
    pub node_class_mask: u32,
}

impl BrowseDescription {
    /// Browses forward references of any type and class.
    #[must_use]
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            browse_direction: BrowseDirection::Forward,
            reference_type_id: NodeId::null(),
            include_subtypes: false,
            node_class_mask: 0,
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: BrowseDirection) -> Self {
        self.browse_direction = direction;
        self
    }

    #[must_use]
    pub fn with_reference_type(mut self, reference_type_id: NodeId, include_subtypes: bool) -> Self {
        self.reference_type_id = reference_type_id;
        self.include_subtypes = include_subtypes;
        self
    }

    #[must_use]
    pub fn with_node_class_mask(mut self, mask: u32) -> Self {
        self.node_class_mask = mask;
        self
    }
}

/// A reference as stored on its source node and returned by Browse.
///
/// `browse_name` and `display_name` are the target's attributes as read
/// when the reference was created. If the target did not exist then, they
/// hold the read path's failure status instead of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    pub reference_type_id: NodeId,
    pub is_forward: bool,
    /// The target node.
    pub node_id: NodeId,
    pub node_class: NodeClass,
    pub browse_name: DataValue,
    pub display_name: DataValue,
    /// Type definition of the target, where known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_definition: Option<NodeId>,
}

impl ReferenceDescription {
    /// The target's browse name, if it was resolved.
    #[must_use]
    pub fn browse_name(&self) -> Option<&QualifiedName> {
        self.browse_name.value.as_qualified_name()
    }

    /// The target's display name, if it was resolved.
    #[must_use]
    pub fn display_name(&self) -> Option<&LocalizedText> {
        self.display_name.value.as_localized_text()
    }
}

/// Outcome of one browse request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BrowseResult {
    pub status: StatusCode,
    pub references: Vec<ReferenceDescription>,
}

impl BrowseResult {
    #[must_use]
    pub fn failed(status: StatusCode) -> Self {
        Self {
            status,
            references: Vec::new(),
        }
    }
}
