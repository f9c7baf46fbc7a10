//! Node identifiers.
//!
//! A [`NodeId`] is a namespace index plus an identifier of one of four kinds.
//! Equality is structural, so a `NodeId` is usable directly as a map key.
//!
//! The textual form follows the usual protocol notation:
//!
//! | Kind    | Example                                          |
//! |---------|--------------------------------------------------|
//! | numeric | `i=85`, `ns=2;i=1001`                            |
//! | string  | `ns=2;s=Boiler.Temperature`                      |
//! | GUID    | `ns=1;g=72962b91-fa75-4ae6-8d28-b404dc7daf63`    |
//! | opaque  | `ns=3;b=M/RbKBsRVkePCePcx24oRA==`                |
//!
//! The namespace prefix is omitted for namespace 0.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Numeric identifier (`i=`).
    Numeric(u32),
    /// String identifier (`s=`).
    String(String),
    /// GUID identifier (`g=`).
    Guid(Uuid),
    /// Opaque byte string identifier (`b=`, base64 in text form).
    Opaque(Vec<u8>),
}

impl Identifier {
    /// Returns true if this identifier holds the null value of its kind.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Numeric(n) => *n == 0,
            Self::String(s) => s.is_empty(),
            Self::Guid(g) => g.is_nil(),
            Self::Opaque(b) => b.is_empty(),
        }
    }
}

/// Unique identifier of a node in the address space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Namespace index.
    pub namespace: u16,
    /// Identifier within the namespace.
    pub identifier: Identifier,
}

impl NodeId {
    /// Creates a numeric NodeId.
    #[must_use]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Creates a string NodeId.
    #[must_use]
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// Creates a GUID NodeId.
    #[must_use]
    pub const fn guid(namespace: u16, value: Uuid) -> Self {
        Self {
            namespace,
            identifier: Identifier::Guid(value),
        }
    }

    /// Creates an opaque NodeId.
    #[must_use]
    pub fn opaque(namespace: u16, value: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace,
            identifier: Identifier::Opaque(value.into()),
        }
    }

    /// The null NodeId (`i=0`).
    #[must_use]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// Returns true for the null NodeId of any identifier kind in namespace 0.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier.is_null()
    }

    /// Returns the numeric identifier value, if this is a numeric NodeId.
    #[must_use]
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(n) => Some(n),
            _ => None,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self::numeric(0, value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(n) => write!(f, "i={}", n),
            Identifier::String(s) => write!(f, "s={}", s),
            Identifier::Guid(g) => write!(f, "g={}", g),
            Identifier::Opaque(b) => write!(f, "b={}", BASE64.encode(b)),
        }
    }
}

impl FromStr for NodeId {
    type Err = NodeIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail
                    .split_once(';')
                    .ok_or(NodeIdParseError::MissingIdentifier)?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|_| NodeIdParseError::InvalidNamespace(ns.to_string()))?;
                (ns, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest
            .split_once('=')
            .ok_or(NodeIdParseError::MissingIdentifier)?;

        let identifier = match kind {
            "i" => Identifier::Numeric(
                value
                    .parse()
                    .map_err(|_| NodeIdParseError::InvalidNumeric(value.to_string()))?,
            ),
            "s" => Identifier::String(value.to_string()),
            "g" => Identifier::Guid(
                Uuid::parse_str(value)
                    .map_err(|_| NodeIdParseError::InvalidGuid(value.to_string()))?,
            ),
            "b" => Identifier::Opaque(
                BASE64
                    .decode(value)
                    .map_err(|_| NodeIdParseError::InvalidOpaque(value.to_string()))?,
            ),
            other => return Err(NodeIdParseError::UnknownKind(other.to_string())),
        };

        Ok(Self {
            namespace,
            identifier,
        })
    }
}

/// Error type for parsing a NodeId from its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeIdParseError {
    /// The `ns=` prefix did not hold a valid u16.
    InvalidNamespace(String),
    /// No `<kind>=<value>` part was found.
    MissingIdentifier,
    /// The identifier kind was not one of `i`, `s`, `g`, `b`.
    UnknownKind(String),
    /// The numeric identifier was not a valid u32.
    InvalidNumeric(String),
    /// The GUID identifier could not be parsed.
    InvalidGuid(String),
    /// The opaque identifier was not valid base64.
    InvalidOpaque(String),
}

impl fmt::Display for NodeIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNamespace(ns) => write!(f, "invalid namespace index: {}", ns),
            Self::MissingIdentifier => write!(f, "missing identifier in NodeId"),
            Self::UnknownKind(kind) => write!(f, "unknown NodeId identifier kind: {}", kind),
            Self::InvalidNumeric(v) => write!(f, "invalid numeric identifier: {}", v),
            Self::InvalidGuid(v) => write!(f, "invalid GUID identifier: {}", v),
            Self::InvalidOpaque(v) => write!(f, "invalid opaque identifier: {}", v),
        }
    }
}

impl std::error::Error for NodeIdParseError {}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_node_id() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::default().is_null());
        assert!(NodeId::string(0, "").is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
        assert!(!NodeId::numeric(0, 85).is_null());
    }

    #[test]
    fn display_omits_namespace_zero() {
        assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
        assert_eq!(NodeId::numeric(2, 1001).to_string(), "ns=2;i=1001");
        assert_eq!(
            NodeId::string(2, "Boiler.Temperature").to_string(),
            "ns=2;s=Boiler.Temperature"
        );
    }

    #[test]
    fn display_fromstr_all_kinds() {
        let ids = [
            NodeId::numeric(0, 45),
            NodeId::string(4, "Line;1=Pump"),
            NodeId::guid(1, Uuid::new_v4()),
            NodeId::opaque(3, vec![0xde, 0xad, 0xbe, 0xef]),
        ];
        for id in ids {
            let parsed: NodeId = id.to_string().parse().unwrap();
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "ns=x;i=1".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidNamespace("x".to_string()))
        );
        assert_eq!(
            "ns=1".parse::<NodeId>(),
            Err(NodeIdParseError::MissingIdentifier)
        );
        assert_eq!(
            "q=1".parse::<NodeId>(),
            Err(NodeIdParseError::UnknownKind("q".to_string()))
        );
        assert!(matches!(
            "i=-3".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidNumeric(_))
        ));
        assert!(matches!(
            "g=not-a-guid".parse::<NodeId>(),
            Err(NodeIdParseError::InvalidGuid(_))
        ));
    }

    #[test]
    fn serializes_as_text() {
        let id = NodeId::numeric(2, 7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns=2;i=7\"");
        let parsed: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_u32_is_namespace_zero() {
        assert_eq!(NodeId::from(40), NodeId::numeric(0, 40));
        assert_eq!(NodeId::from(40).as_numeric(), Some(40));
        assert_eq!(NodeId::string(1, "a").as_numeric(), None);
    }
}
