//! Agent status controller

use crate::controllers::{Context, DeletePolicy, ResourceKind};
use crate::error::Result;
use crate::reconcilers::agent_status as agent_status_reconciler;
use crate::reconcilers::ReadMode;
use crate::resources::{AgentStatusAttributes, AgentStatusSpec, Record};
use crate::tags::{TagPolicy, Tags};

/// Agent statuses; removal keeps the remote entity
pub struct AgentStatuses;

impl ResourceKind for AgentStatuses {
    const KIND: &'static str = agent_status_reconciler::KIND;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Unsupported;

    type Spec = AgentStatusSpec;
    type Attributes = AgentStatusAttributes;

    fn validate(spec: &AgentStatusSpec) -> Result<()> {
        agent_status_reconciler::validate(spec)
    }

    fn declared_tags(spec: &AgentStatusSpec) -> Tags {
        spec.tags.clone()
    }

    fn state_tags(attributes: &AgentStatusAttributes) -> Tags {
        attributes.tags.clone()
    }

    fn requires_replacement(
        prior: &AgentStatusAttributes,
        declared: &AgentStatusSpec,
    ) -> Vec<&'static str> {
        agent_status_reconciler::requires_replacement(prior, declared)
    }

    fn pending_changes(
        prior: &AgentStatusAttributes,
        declared: &AgentStatusSpec,
        tags: &TagPolicy,
    ) -> Vec<&'static str> {
        agent_status_reconciler::pending_changes(prior, declared, tags)
            .iter()
            .map(|change| change.attribute())
            .collect()
    }

    async fn create(
        ctx: &Context,
        spec: &AgentStatusSpec,
    ) -> Result<Record<AgentStatusAttributes>> {
        agent_status_reconciler::create(ctx, spec).await
    }

    async fn read(
        ctx: &Context,
        id: &str,
        mode: ReadMode,
        declared_tags: &Tags,
    ) -> Result<Option<Record<AgentStatusAttributes>>> {
        agent_status_reconciler::read(ctx, id, mode, declared_tags).await
    }

    async fn update(
        ctx: &Context,
        record: &Record<AgentStatusAttributes>,
        spec: &AgentStatusSpec,
    ) -> Result<Option<Record<AgentStatusAttributes>>> {
        agent_status_reconciler::update(ctx, record, spec).await
    }

    async fn delete(ctx: &Context, id: &str) -> Result<()> {
        agent_status_reconciler::delete(ctx, id).await
    }
}
