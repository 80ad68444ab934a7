//! User hierarchy group resource

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tags::Tags;

/// Declared hierarchy group configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct HierarchyGroupSpec {
    /// Owning instance
    pub instance_id: String,

    /// Group name (1 to 127 characters)
    pub name: String,

    /// Parent group; an empty string means a top-level group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<String>,

    /// Resource tags
    #[serde(default)]
    pub tags: Tags,
}

impl HierarchyGroupSpec {
    /// Parent group id with empty strings treated as absent
    pub fn parent(&self) -> Option<&str> {
        self.parent_group_id
            .as_deref()
            .filter(|parent| !parent.is_empty())
    }
}

/// One level of a group's hierarchy path
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyLevel {
    pub id: Option<String>,
    pub name: Option<String>,
    pub arn: Option<String>,
}

/// Flattened hierarchy group attributes
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyGroupAttributes {
    pub arn: String,
    pub hierarchy_group_id: String,
    pub instance_id: String,
    pub name: String,
    pub level_id: Option<String>,
    /// Derived from the hierarchy path
    pub parent_group_id: Option<String>,
    /// Levels from the root down to and including this group
    pub hierarchy_path: Vec<HierarchyLevel>,
    pub tags: Tags,
    pub tags_all: Tags,
}
