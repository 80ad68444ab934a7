//! Instance storage-config association controller
//!
//! Associations carry no tags.

use crate::controllers::{Context, DeletePolicy, ResourceKind};
use crate::error::Result;
use crate::reconcilers::storage_association as storage_reconciler;
use crate::reconcilers::ReadMode;
use crate::resources::{Record, StorageAssociationAttributes, StorageAssociationSpec};
use crate::tags::{TagPolicy, Tags};

/// Instance storage-config associations
pub struct StorageAssociations;

impl ResourceKind for StorageAssociations {
    const KIND: &'static str = storage_reconciler::KIND;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Remote;

    type Spec = StorageAssociationSpec;
    type Attributes = StorageAssociationAttributes;

    fn validate(spec: &StorageAssociationSpec) -> Result<()> {
        storage_reconciler::validate(spec)
    }

    fn declared_tags(_spec: &StorageAssociationSpec) -> Tags {
        Tags::new()
    }

    fn state_tags(_attributes: &StorageAssociationAttributes) -> Tags {
        Tags::new()
    }

    fn requires_replacement(
        prior: &StorageAssociationAttributes,
        declared: &StorageAssociationSpec,
    ) -> Vec<&'static str> {
        storage_reconciler::requires_replacement(prior, declared)
    }

    fn pending_changes(
        prior: &StorageAssociationAttributes,
        declared: &StorageAssociationSpec,
        _tags: &TagPolicy,
    ) -> Vec<&'static str> {
        storage_reconciler::pending_changes(prior, declared)
    }

    async fn create(
        ctx: &Context,
        spec: &StorageAssociationSpec,
    ) -> Result<Record<StorageAssociationAttributes>> {
        storage_reconciler::create(ctx, spec).await
    }

    async fn read(
        ctx: &Context,
        id: &str,
        mode: ReadMode,
        _declared_tags: &Tags,
    ) -> Result<Option<Record<StorageAssociationAttributes>>> {
        storage_reconciler::read(ctx, id, mode).await
    }

    async fn update(
        ctx: &Context,
        record: &Record<StorageAssociationAttributes>,
        spec: &StorageAssociationSpec,
    ) -> Result<Option<Record<StorageAssociationAttributes>>> {
        storage_reconciler::update(ctx, record, spec).await
    }

    async fn delete(ctx: &Context, id: &str) -> Result<()> {
        storage_reconciler::delete(ctx, id).await
    }
}
