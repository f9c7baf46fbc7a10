//! Enumerations shared by every address space service.
//!
//! The discriminants are the protocol's numeric codes. They are part of the
//! contract with the encoding layer and must not be renumbered. Each one
//! serializes as its numeric code.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Attribute Ids
// ============================================================================

/// Identifies one attribute of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
}

impl AttributeId {
    /// Every attribute id, in numeric order.
    pub const ALL: [AttributeId; 22] = [
        Self::NodeId,
        Self::NodeClass,
        Self::BrowseName,
        Self::DisplayName,
        Self::Description,
        Self::WriteMask,
        Self::UserWriteMask,
        Self::IsAbstract,
        Self::Symmetric,
        Self::InverseName,
        Self::ContainsNoLoops,
        Self::EventNotifier,
        Self::Value,
        Self::DataType,
        Self::ValueRank,
        Self::ArrayDimensions,
        Self::AccessLevel,
        Self::UserAccessLevel,
        Self::MinimumSamplingInterval,
        Self::Historizing,
        Self::Executable,
        Self::UserExecutable,
    ];

    /// Returns the protocol code.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for AttributeId {
    type Error = UnknownCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.code() == code)
            .ok_or(UnknownCode {
                kind: "AttributeId",
                code,
            })
    }
}

impl From<AttributeId> for u32 {
    fn from(attribute_id: AttributeId) -> Self {
        attribute_id.code()
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Node Classes
// ============================================================================

/// The class of a node. Values are single bits so they can be combined into
/// a browse node-class mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum NodeClass {
    #[default]
    Unspecified = 0,
    Object = 1,
    Variable = 2,
    Method = 4,
    ObjectType = 8,
    VariableType = 16,
    ReferenceType = 32,
    DataType = 64,
    View = 128,
}

impl NodeClass {
    const ALL: [NodeClass; 9] = [
        Self::Unspecified,
        Self::Object,
        Self::Variable,
        Self::Method,
        Self::ObjectType,
        Self::VariableType,
        Self::ReferenceType,
        Self::DataType,
        Self::View,
    ];

    /// Returns the protocol code, which is also the mask bit.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Returns true if this class has a bit in common with `mask`.
    #[must_use]
    pub const fn matches_mask(self, mask: u32) -> bool {
        mask & self.bits() != 0
    }
}

impl TryFrom<u32> for NodeClass {
    type Error = UnknownCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.bits() == code)
            .ok_or(UnknownCode {
                kind: "NodeClass",
                code,
            })
    }
}

impl From<NodeClass> for u32 {
    fn from(class: NodeClass) -> Self {
        class.bits()
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Browse Direction
// ============================================================================

/// Which references a browse request asks for, relative to the start node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
#[repr(u32)]
pub enum BrowseDirection {
    #[default]
    Forward = 0,
    Inverse = 1,
    Both = 2,
}

impl TryFrom<u32> for BrowseDirection {
    type Error = UnknownCode;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Forward),
            1 => Ok(Self::Inverse),
            2 => Ok(Self::Both),
            _ => Err(UnknownCode {
                kind: "BrowseDirection",
                code,
            }),
        }
    }
}

impl From<BrowseDirection> for u32 {
    fn from(direction: BrowseDirection) -> Self {
        direction as u32
    }
}

/// A numeric code that does not map onto any variant of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCode {
    /// Name of the enumeration.
    pub kind: &'static str,
    /// The rejected code.
    pub code: u32,
}

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} code: {}", self.kind, self.code)
    }
}

impl std::error::Error for UnknownCode {}
