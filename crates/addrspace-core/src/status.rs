//! Protocol status codes.
//!
//! The numeric values are fixed by the protocol and must match the encoding
//! layer bit for bit. The top two bits carry the severity: `00` good,
//! `01` uncertain, `10` bad.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A protocol status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u32);

const SEVERITY_MASK: u32 = 0xC000_0000;
const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
const SEVERITY_BAD: u32 = 0x8000_0000;

impl StatusCode {
    pub const GOOD: Self = Self(0x0000_0000);
    pub const BAD_INTERNAL_ERROR: Self = Self(0x8002_0000);
    pub const BAD_NODE_ID_INVALID: Self = Self(0x8033_0000);
    pub const BAD_NODE_ID_UNKNOWN: Self = Self(0x8034_0000);
    pub const BAD_ATTRIBUTE_ID_INVALID: Self = Self(0x8035_0000);
    pub const BAD_NOT_WRITABLE: Self = Self(0x803B_0000);
    pub const BAD_NODE_ID_EXISTS: Self = Self(0x805E_0000);
    pub const BAD_SOURCE_NODE_ID_INVALID: Self = Self(0x8064_0000);
    /// Defined for wire compatibility. AddReferences accepts absent targets,
    /// so the address space never returns this code.
    pub const BAD_TARGET_NODE_ID_INVALID: Self = Self(0x8065_0000);
    pub const BAD_TYPE_MISMATCH: Self = Self(0x8074_0000);

    /// Returns the raw numeric code.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if the severity is good.
    #[must_use]
    pub const fn is_good(self) -> bool {
        self.0 & SEVERITY_MASK == 0
    }

    /// Returns true if the severity is uncertain.
    #[must_use]
    pub const fn is_uncertain(self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_UNCERTAIN
    }

    /// Returns true if the severity is bad.
    #[must_use]
    pub const fn is_bad(self) -> bool {
        self.0 & SEVERITY_MASK == SEVERITY_BAD
    }

    /// Symbolic name for the codes this crate knows about.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::GOOD => "Good",
            Self::BAD_INTERNAL_ERROR => "BadInternalError",
            Self::BAD_NODE_ID_INVALID => "BadNodeIdInvalid",
            Self::BAD_NODE_ID_UNKNOWN => "BadNodeIdUnknown",
            Self::BAD_ATTRIBUTE_ID_INVALID => "BadAttributeIdInvalid",
            Self::BAD_NOT_WRITABLE => "BadNotWritable",
            Self::BAD_NODE_ID_EXISTS => "BadNodeIdExists",
            Self::BAD_SOURCE_NODE_ID_INVALID => "BadSourceNodeIdInvalid",
            Self::BAD_TARGET_NODE_ID_INVALID => "BadTargetNodeIdInvalid",
            Self::BAD_TYPE_MISMATCH => "BadTypeMismatch",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08X})", name, self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
