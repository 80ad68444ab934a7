//! Agent status reconciler
//!
//! Agent statuses cannot be deleted remotely; removing one only drops the local record.

use tracing::{debug, info, warn};

use crate::adapters::{build_create_agent_status_request, flatten_agent_status};
use crate::client::model::UpdateAgentStatusRequest;
use crate::client::operation as op;
use crate::client::ApiError;
use crate::controllers::{Context, Target};
use crate::error::Result;
use crate::id;
use crate::reconcilers::{
    created_id, entity_missing, present, validate_instance_id, validate_length, ReadMode,
    UpdateProgress,
};
use crate::resources::{AgentStatusAttributes, AgentStatusSpec, Record};
use crate::tags::{TagDiff, TagPolicy, Tags};

/// Kind label
pub const KIND: &str = "AgentStatus";

/// Validate the declared agent status
pub fn validate(spec: &AgentStatusSpec) -> Result<()> {
    validate_instance_id(&spec.instance_id)?;
    validate_length("name", &spec.name, 1, 127)?;
    if let Some(description) = &spec.description {
        validate_length("description", description, 1, 250)?;
    }
    Ok(())
}

/// Create the agent status and read it back
pub async fn create(
    ctx: &Context,
    spec: &AgentStatusSpec,
) -> Result<Record<AgentStatusAttributes>> {
    validate(spec)?;

    let target = Target::new(KIND, op::CREATE_AGENT_STATUS, &spec.name);
    let request = build_create_agent_status_request(spec, ctx.tags.request_tags(&spec.tags));
    let response = ctx
        .call(&target, ctx.client.create_agent_status(request))
        .await?;

    let agent_status_id = created_id(&target, response.agent_status_id)?;
    let id = id::AGENT_STATUS_ID.encode(&[spec.instance_id.as_str(), agent_status_id.as_str()]);
    info!(id = %id, name = %spec.name, "Created agent status");

    read(ctx, &id, ReadMode::Created, &spec.tags)
        .await?
        .ok_or_else(|| target.failed(ApiError::EmptyResponse))
}

/// Read the agent status; `None` means the record should be dropped
pub async fn read(
    ctx: &Context,
    id: &str,
    mode: ReadMode,
    declared_tags: &Tags,
) -> Result<Option<Record<AgentStatusAttributes>>> {
    let (instance_id, agent_status_id) = id::AGENT_STATUS_ID.decode_pair(id)?;

    let target = Target::new(KIND, op::DESCRIBE_AGENT_STATUS, id);
    let Some(status) = ctx
        .describe(
            &target,
            ctx.client.describe_agent_status(instance_id, agent_status_id),
        )
        .await?
    else {
        return entity_missing(&target, mode);
    };

    let tag_views = ctx.tags.views(&status.tags, declared_tags);
    Ok(Some(Record::new(
        id,
        flatten_agent_status(instance_id, agent_status_id, status, tag_views),
    )))
}

/// Attribute with its own update call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentStatusChange {
    Name,
    Description,
    State,
    Tags,
}

impl AgentStatusChange {
    /// Attribute name
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::State => "state",
            Self::Tags => "tags",
        }
    }
}

/// Changed attributes, in update order
pub fn pending_changes(
    prior: &AgentStatusAttributes,
    spec: &AgentStatusSpec,
    tags: &TagPolicy,
) -> Vec<AgentStatusChange> {
    let mut changes = Vec::new();

    if spec.name != prior.name {
        changes.push(AgentStatusChange::Name);
    }
    if present(spec.description.as_ref()) != present(prior.description.as_ref()) {
        changes.push(AgentStatusChange::Description);
    }
    if Some(spec.state) != prior.state {
        changes.push(AgentStatusChange::State);
    }
    if !TagDiff::between(&prior.tags_all, &tags.desired_all(&spec.tags)).is_empty() {
        changes.push(AgentStatusChange::Tags);
    }

    changes
}

/// Attributes no update call can change
pub fn requires_replacement(
    prior: &AgentStatusAttributes,
    spec: &AgentStatusSpec,
) -> Vec<&'static str> {
    if spec.instance_id != prior.instance_id {
        vec!["instance_id"]
    } else {
        Vec::new()
    }
}

/// Apply each changed attribute with its own UpdateAgentStatus call, then refresh
pub async fn update(
    ctx: &Context,
    record: &Record<AgentStatusAttributes>,
    spec: &AgentStatusSpec,
) -> Result<Option<Record<AgentStatusAttributes>>> {
    validate(spec)?;
    let (instance_id, agent_status_id) = id::AGENT_STATUS_ID.decode_pair(&record.id)?;
    let prior = &record.attributes;
    let mut progress = UpdateProgress::new(KIND, &record.id);

    for change in pending_changes(prior, spec, &ctx.tags) {
        debug!(id = %record.id, attribute = change.attribute(), "Updating agent status");

        let base = UpdateAgentStatusRequest {
            instance_id: instance_id.to_string(),
            agent_status_id: agent_status_id.to_string(),
            ..Default::default()
        };
        let request = match change {
            AgentStatusChange::Name => Some(UpdateAgentStatusRequest {
                name: Some(spec.name.clone()),
                ..base
            }),
            // An empty description clears it remotely
            AgentStatusChange::Description => Some(UpdateAgentStatusRequest {
                description: Some(spec.description.clone().unwrap_or_default()),
                ..base
            }),
            AgentStatusChange::State => Some(UpdateAgentStatusRequest {
                state: Some(spec.state),
                ..base
            }),
            AgentStatusChange::Tags => None,
        };

        let result = match request {
            Some(request) => {
                let target = Target::new(KIND, op::UPDATE_AGENT_STATUS, &record.id);
                ctx.call(&target, ctx.client.update_agent_status(request))
                    .await
            }
            None => {
                let target = Target::new(KIND, op::UPDATE_TAGS, &record.id);
                let diff = TagDiff::between(&prior.tags_all, &ctx.tags.desired_all(&spec.tags));
                ctx.call(&target, ctx.client.update_tags(&prior.arn, &diff))
                    .await
            }
        };

        result.map_err(|e| progress.failed(e))?;
        progress.applied(change.attribute());
    }

    read(ctx, &record.id, ReadMode::Refresh, &spec.tags).await
}

/// Drop the record; the remote API offers no delete for agent statuses
pub async fn delete(_ctx: &Context, id: &str) -> Result<()> {
    id::AGENT_STATUS_ID.decode_pair(id)?;
    warn!(
        id = %id,
        "Agent statuses cannot be deleted remotely; removing from state only"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::model::AgentStatusState;
    use crate::client::InMemoryConnect;
    use crate::error::Error;

    fn spec() -> AgentStatusSpec {
        AgentStatusSpec {
            instance_id: "i-1".to_string(),
            name: "Lunch".to_string(),
            description: Some("Out for lunch".to_string()),
            state: AgentStatusState::Enabled,
            tags: Tags::new(),
        }
    }

    fn state_of(spec: &AgentStatusSpec) -> AgentStatusAttributes {
        AgentStatusAttributes {
            arn: "arn:status".to_string(),
            agent_status_id: "as-1".to_string(),
            instance_id: spec.instance_id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            state: Some(spec.state),
            status_type: None,
            tags: Tags::new(),
            tags_all: Tags::new(),
        }
    }

    #[test]
    fn test_name_and_description_lengths() {
        let mut spec = spec();
        spec.name = "n".repeat(128);
        assert!(validate(&spec).is_err());

        let mut spec = self::spec();
        spec.description = Some("d".repeat(251));
        assert!(validate(&spec).is_err());

        let mut spec = self::spec();
        spec.description = Some(String::new());
        assert!(validate(&spec).is_err());

        let mut spec = self::spec();
        spec.description = None;
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_each_attribute_is_its_own_change() {
        let prior = spec();
        let state = state_of(&prior);

        let mut declared = prior.clone();
        declared.state = AgentStatusState::Disabled;
        assert_eq!(
            pending_changes(&state, &declared, &TagPolicy::default()),
            vec![AgentStatusChange::State]
        );

        declared.description = None;
        declared.name = "Break".to_string();
        assert_eq!(
            pending_changes(&state, &declared, &TagPolicy::default()),
            vec![
                AgentStatusChange::Name,
                AgentStatusChange::Description,
                AgentStatusChange::State
            ]
        );
    }

    #[test]
    fn test_only_instance_forces_replacement() {
        let mut declared = spec();
        let state = state_of(&declared);
        declared.name = "Break".to_string();
        assert!(requires_replacement(&state, &declared).is_empty());

        declared.instance_id = "i-2".to_string();
        assert_eq!(requires_replacement(&state, &declared), vec!["instance_id"]);
    }

    #[tokio::test]
    async fn test_delete_still_checks_identifier() {
        let api = Arc::new(InMemoryConnect::new());
        let ctx = Context::new(api.clone(), TagPolicy::default());

        assert!(delete(&ctx, "i-1:as-1").await.is_ok());
        for id in ["as-1", "i-1:", "i-1:as-1:extra"] {
            let err = delete(&ctx, id).await.unwrap_err();
            assert!(matches!(err, Error::MalformedIdentifier { .. }), "{}", id);
        }
        assert!(api.calls().is_empty());
    }
}
