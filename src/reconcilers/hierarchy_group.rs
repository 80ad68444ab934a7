//! User hierarchy group reconciler

use tracing::{debug, info};

use crate::adapters::{build_create_hierarchy_group_request, flatten_hierarchy_group};
use crate::client::operation as op;
use crate::client::ApiError;
use crate::controllers::{Context, Target};
use crate::error::Result;
use crate::id;
use crate::reconcilers::{
    created_id, entity_missing, validate_instance_id, validate_length, ReadMode, UpdateProgress,
};
use crate::resources::{HierarchyGroupAttributes, HierarchyGroupSpec, Record};
use crate::tags::{TagDiff, TagPolicy, Tags};

/// Kind label
pub const KIND: &str = "UserHierarchyGroup";

/// Validate the declared group
pub fn validate(spec: &HierarchyGroupSpec) -> Result<()> {
    validate_instance_id(&spec.instance_id)?;
    validate_length("name", &spec.name, 1, 127)
}

/// Create the group and read it back
pub async fn create(
    ctx: &Context,
    spec: &HierarchyGroupSpec,
) -> Result<Record<HierarchyGroupAttributes>> {
    validate(spec)?;

    let target = Target::new(KIND, op::CREATE_USER_HIERARCHY_GROUP, &spec.name);
    let request = build_create_hierarchy_group_request(spec, ctx.tags.request_tags(&spec.tags));
    let response = ctx
        .call(&target, ctx.client.create_user_hierarchy_group(request))
        .await?;

    let group_id = created_id(&target, response.hierarchy_group_id)?;
    let id = id::HIERARCHY_GROUP_ID.encode(&[spec.instance_id.as_str(), group_id.as_str()]);
    info!(id = %id, name = %spec.name, parent = ?spec.parent(), "Created hierarchy group");

    read(ctx, &id, ReadMode::Created, &spec.tags)
        .await?
        .ok_or_else(|| target.failed(ApiError::EmptyResponse))
}

/// Read the group; `None` means the record should be dropped
pub async fn read(
    ctx: &Context,
    id: &str,
    mode: ReadMode,
    declared_tags: &Tags,
) -> Result<Option<Record<HierarchyGroupAttributes>>> {
    let (instance_id, group_id) = id::HIERARCHY_GROUP_ID.decode_pair(id)?;

    let target = Target::new(KIND, op::DESCRIBE_USER_HIERARCHY_GROUP, id);
    let Some(group) = ctx
        .describe(
            &target,
            ctx.client.describe_user_hierarchy_group(instance_id, group_id),
        )
        .await?
    else {
        return entity_missing(&target, mode);
    };

    let tag_views = ctx.tags.views(&group.tags, declared_tags);
    Ok(Some(Record::new(
        id,
        flatten_hierarchy_group(instance_id, group_id, group, tag_views),
    )))
}

/// Attribute group with its own update call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyGroupChange {
    Name,
    Tags,
}

impl HierarchyGroupChange {
    /// Attribute name
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Tags => "tags",
        }
    }
}

/// Changed attribute groups, in update order
pub fn pending_changes(
    prior: &HierarchyGroupAttributes,
    spec: &HierarchyGroupSpec,
    tags: &TagPolicy,
) -> Vec<HierarchyGroupChange> {
    let mut changes = Vec::new();
    if spec.name != prior.name {
        changes.push(HierarchyGroupChange::Name);
    }
    if !TagDiff::between(&prior.tags_all, &tags.desired_all(&spec.tags)).is_empty() {
        changes.push(HierarchyGroupChange::Tags);
    }
    changes
}

/// Attributes no update call can change
pub fn requires_replacement(
    prior: &HierarchyGroupAttributes,
    spec: &HierarchyGroupSpec,
) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if spec.instance_id != prior.instance_id {
        reasons.push("instance_id");
    }
    if spec.parent() != prior.parent_group_id.as_deref() {
        reasons.push("parent_group_id");
    }
    reasons
}

/// Rename and retag as needed, then refresh
pub async fn update(
    ctx: &Context,
    record: &Record<HierarchyGroupAttributes>,
    spec: &HierarchyGroupSpec,
) -> Result<Option<Record<HierarchyGroupAttributes>>> {
    validate(spec)?;
    let (instance_id, group_id) = id::HIERARCHY_GROUP_ID.decode_pair(&record.id)?;
    let prior = &record.attributes;
    let mut progress = UpdateProgress::new(KIND, &record.id);

    for change in pending_changes(prior, spec, &ctx.tags) {
        debug!(id = %record.id, attribute = change.attribute(), "Updating hierarchy group");
        let result = match change {
            HierarchyGroupChange::Name => {
                let target = Target::new(KIND, op::UPDATE_USER_HIERARCHY_GROUP_NAME, &record.id);
                ctx.call(
                    &target,
                    ctx.client.update_user_hierarchy_group_name(
                        instance_id,
                        group_id,
                        spec.name.clone(),
                    ),
                )
                .await
            }
            HierarchyGroupChange::Tags => {
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

/// Delete the group; an already missing group counts as deleted
pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    let (instance_id, group_id) = id::HIERARCHY_GROUP_ID.decode_pair(id)?;

    let target = Target::new(KIND, op::DELETE_USER_HIERARCHY_GROUP, id);
    match ctx
        .call_optional(
            &target,
            ctx.client.delete_user_hierarchy_group(instance_id, group_id),
        )
        .await?
    {
        Some(()) => info!(id = %id, "Deleted hierarchy group"),
        None => info!(id = %id, "Hierarchy group already absent"),
    }
    Ok(())
}
