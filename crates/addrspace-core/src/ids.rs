//! Well-known NodeIds from namespace 0.

use crate::node_id::NodeId;

/// Standard reference types.
pub mod reference_types {
    use super::NodeId;

    pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
    pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 32);
    pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
    pub const HAS_CHILD: NodeId = NodeId::numeric(0, 34);
    pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
    pub const HAS_EVENT_SOURCE: NodeId = NodeId::numeric(0, 36);
    pub const HAS_MODELLING_RULE: NodeId = NodeId::numeric(0, 37);
    pub const HAS_ENCODING: NodeId = NodeId::numeric(0, 38);
    pub const HAS_DESCRIPTION: NodeId = NodeId::numeric(0, 39);
    pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
    pub const GENERATES_EVENT: NodeId = NodeId::numeric(0, 41);
    pub const AGGREGATES: NodeId = NodeId::numeric(0, 44);
    pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
    pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
    pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
    pub const HAS_NOTIFIER: NodeId = NodeId::numeric(0, 48);
}

/// Standard folders and types.
pub mod objects {
    use super::NodeId;

    pub const BASE_OBJECT_TYPE: NodeId = NodeId::numeric(0, 58);
    pub const FOLDER_TYPE: NodeId = NodeId::numeric(0, 61);
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::numeric(0, 63);
    pub const PROPERTY_TYPE: NodeId = NodeId::numeric(0, 68);
    pub const ROOT_FOLDER: NodeId = NodeId::numeric(0, 84);
    pub const OBJECTS_FOLDER: NodeId = NodeId::numeric(0, 85);
    pub const TYPES_FOLDER: NodeId = NodeId::numeric(0, 86);
    pub const VIEWS_FOLDER: NodeId = NodeId::numeric(0, 87);
}
