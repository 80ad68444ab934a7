//! Agent status resource

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::model::{AgentStatusState, AgentStatusType};
use crate::tags::Tags;

/// Declared agent status configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AgentStatusSpec {
    /// Owning instance
    pub instance_id: String,

    /// Display name (1 to 127 characters)
    pub name: String,

    /// Description (1 to 250 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ENABLED or DISABLED
    pub state: AgentStatusState,

    /// Resource tags
    #[serde(default)]
    pub tags: Tags,
}

/// Flattened agent status attributes
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AgentStatusAttributes {
    pub arn: String,
    pub agent_status_id: String,
    pub instance_id: String,
    pub name: String,
    pub description: Option<String>,
    pub state: Option<AgentStatusState>,
    pub status_type: Option<AgentStatusType>,
    pub tags: Tags,
    pub tags_all: Tags,
}
