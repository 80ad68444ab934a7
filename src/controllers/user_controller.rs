//! User controller

use crate::controllers::{Context, DeletePolicy, ResourceKind};
use crate::error::Result;
use crate::reconcilers::user as user_reconciler;
use crate::reconcilers::ReadMode;
use crate::resources::{Record, UserAttributes, UserSpec};
use crate::tags::{TagPolicy, Tags};

/// Contact-center users
pub struct Users;

impl ResourceKind for Users {
    const KIND: &'static str = user_reconciler::KIND;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Remote;

    type Spec = UserSpec;
    type Attributes = UserAttributes;

    fn validate(spec: &UserSpec) -> Result<()> {
        user_reconciler::validate(spec)
    }

    fn declared_tags(spec: &UserSpec) -> Tags {
        spec.tags.clone()
    }

    fn state_tags(attributes: &UserAttributes) -> Tags {
        attributes.tags.clone()
    }

    fn requires_replacement(prior: &UserAttributes, declared: &UserSpec) -> Vec<&'static str> {
        user_reconciler::requires_replacement(prior, declared)
    }

    fn pending_changes(
        prior: &UserAttributes,
        declared: &UserSpec,
        tags: &TagPolicy,
    ) -> Vec<&'static str> {
        user_reconciler::pending_changes(prior, declared, tags)
            .iter()
            .map(|change| change.attribute())
            .collect()
    }

    async fn create(ctx: &Context, spec: &UserSpec) -> Result<Record<UserAttributes>> {
        user_reconciler::create(ctx, spec).await
    }

    async fn read(
        ctx: &Context,
        id: &str,
        mode: ReadMode,
        declared_tags: &Tags,
    ) -> Result<Option<Record<UserAttributes>>> {
        user_reconciler::read(ctx, id, mode, declared_tags).await
    }

    async fn update(
        ctx: &Context,
        record: &Record<UserAttributes>,
        spec: &UserSpec,
    ) -> Result<Option<Record<UserAttributes>>> {
        user_reconciler::update(ctx, record, spec).await
    }

    async fn delete(ctx: &Context, id: &str) -> Result<()> {
        user_reconciler::delete(ctx, id).await
    }
}
