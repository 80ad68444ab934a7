//! Agent status adapter

use crate::client::model::{AgentStatus, CreateAgentStatusRequest};
use crate::resources::{AgentStatusAttributes, AgentStatusSpec};
use crate::tags::{TagViews, Tags};

use super::non_empty;

/// Build the CreateAgentStatus request
pub fn build_create_agent_status_request(
    spec: &AgentStatusSpec,
    tags: Option<Tags>,
) -> CreateAgentStatusRequest {
    CreateAgentStatusRequest {
        instance_id: spec.instance_id.clone(),
        name: spec.name.clone(),
        description: non_empty(spec.description.as_ref()),
        state: spec.state,
        tags,
    }
}

/// Flatten a DescribeAgentStatus payload
pub fn flatten_agent_status(
    instance_id: &str,
    agent_status_id: &str,
    status: AgentStatus,
    tag_views: TagViews,
) -> AgentStatusAttributes {
    AgentStatusAttributes {
        arn: status.agent_status_arn.unwrap_or_default(),
        agent_status_id: status
            .agent_status_id
            .unwrap_or_else(|| agent_status_id.to_string()),
        instance_id: instance_id.to_string(),
        name: status.name.unwrap_or_default(),
        description: status.description,
        state: status.state,
        status_type: status.status_type,
        tags: tag_views.tags,
        tags_all: tag_views.tags_all,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::model::{AgentStatusState, AgentStatusType};

    #[test]
    fn test_empty_description_is_not_sent() {
        let spec = AgentStatusSpec {
            instance_id: "i-1".to_string(),
            name: "Lunch".to_string(),
            description: Some(String::new()),
            state: AgentStatusState::Enabled,
            tags: Tags::new(),
        };

        let request = build_create_agent_status_request(&spec, None);
        assert!(request.description.is_none());
        assert!(request.tags.is_none());
    }

    #[test]
    fn test_flatten_reports_status_type() {
        let status = AgentStatus {
            agent_status_arn: Some("arn:status".to_string()),
            name: Some("Lunch".to_string()),
            state: Some(AgentStatusState::Disabled),
            status_type: Some(AgentStatusType::Custom),
            ..Default::default()
        };

        let attrs = flatten_agent_status("i-1", "as-1", status, TagViews::default());
        assert_eq!(attrs.agent_status_id, "as-1");
        assert_eq!(attrs.state, Some(AgentStatusState::Disabled));
        assert_eq!(attrs.status_type, Some(AgentStatusType::Custom));
        assert!(attrs.description.is_none());
    }
}
