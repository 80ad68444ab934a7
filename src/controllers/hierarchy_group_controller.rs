//! User hierarchy group controller

use crate::controllers::{Context, DeletePolicy, ResourceKind};
use crate::error::Result;
use crate::reconcilers::hierarchy_group as hierarchy_group_reconciler;
use crate::reconcilers::ReadMode;
use crate::resources::{HierarchyGroupAttributes, HierarchyGroupSpec, Record};
use crate::tags::{TagPolicy, Tags};

/// User hierarchy groups
pub struct HierarchyGroups;

impl ResourceKind for HierarchyGroups {
    const KIND: &'static str = hierarchy_group_reconciler::KIND;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Remote;

    type Spec = HierarchyGroupSpec;
    type Attributes = HierarchyGroupAttributes;

    fn validate(spec: &HierarchyGroupSpec) -> Result<()> {
        hierarchy_group_reconciler::validate(spec)
    }

    fn declared_tags(spec: &HierarchyGroupSpec) -> Tags {
        spec.tags.clone()
    }

    fn state_tags(attributes: &HierarchyGroupAttributes) -> Tags {
        attributes.tags.clone()
    }

    fn requires_replacement(
        prior: &HierarchyGroupAttributes,
        declared: &HierarchyGroupSpec,
    ) -> Vec<&'static str> {
        hierarchy_group_reconciler::requires_replacement(prior, declared)
    }

    fn pending_changes(
        prior: &HierarchyGroupAttributes,
        declared: &HierarchyGroupSpec,
        tags: &TagPolicy,
    ) -> Vec<&'static str> {
        hierarchy_group_reconciler::pending_changes(prior, declared, tags)
            .iter()
            .map(|change| change.attribute())
            .collect()
    }

    async fn create(
        ctx: &Context,
        spec: &HierarchyGroupSpec,
    ) -> Result<Record<HierarchyGroupAttributes>> {
        hierarchy_group_reconciler::create(ctx, spec).await
    }

    async fn read(
        ctx: &Context,
        id: &str,
        mode: ReadMode,
        declared_tags: &Tags,
    ) -> Result<Option<Record<HierarchyGroupAttributes>>> {
        hierarchy_group_reconciler::read(ctx, id, mode, declared_tags).await
    }

    async fn update(
        ctx: &Context,
        record: &Record<HierarchyGroupAttributes>,
        spec: &HierarchyGroupSpec,
    ) -> Result<Option<Record<HierarchyGroupAttributes>>> {
        hierarchy_group_reconciler::update(ctx, record, spec).await
    }

    async fn delete(ctx: &Context, id: &str) -> Result<()> {
        hierarchy_group_reconciler::delete(ctx, id).await
    }
}
