//! Instance storage-config association reconciler
//!
//! Identifiers carry the resource type between instance and association id because every
//! remote call needs all three.

use tracing::{debug, info};

use crate::adapters::{build_storage_destination, flatten_storage_destination};
use crate::client::model::{AssociateInstanceStorageConfigRequest, InstanceStorageResourceType};
use crate::client::operation as op;
use crate::client::ApiError;
use crate::controllers::{Context, Target};
use crate::error::{Error, Result};
use crate::id;
use crate::reconcilers::{created_id, entity_missing, validate_instance_id, ReadMode};
use crate::resources::{Record, StorageAssociationAttributes, StorageAssociationSpec};

/// Kind label
pub const KIND: &str = "InstanceStorageConfigAssociation";

/// Validate the declared association
pub fn validate(spec: &StorageAssociationSpec) -> Result<()> {
    validate_instance_id(&spec.instance_id)?;
    build_storage_destination(&spec.storage_config)?;
    Ok(())
}

/// Decode an association identifier
pub fn decode_id(id: &str) -> Result<(&str, InstanceStorageResourceType, &str)> {
    let (instance_id, resource_type, association_id) =
        id::STORAGE_ASSOCIATION_ID.decode_triple(id)?;
    let resource_type = resource_type
        .parse::<InstanceStorageResourceType>()
        .map_err(|reason: String| Error::MalformedIdentifier {
            id: id.to_string(),
            expected: format!("{} ({})", id::STORAGE_ASSOCIATION_ID.describe(), reason),
        })?;
    Ok((instance_id, resource_type, association_id))
}

/// Associate the storage config and read it back
pub async fn create(
    ctx: &Context,
    spec: &StorageAssociationSpec,
) -> Result<Record<StorageAssociationAttributes>> {
    validate_instance_id(&spec.instance_id)?;
    let storage_config = build_storage_destination(&spec.storage_config)?;

    let target = Target::new(
        KIND,
        op::ASSOCIATE_INSTANCE_STORAGE_CONFIG,
        spec.resource_type.as_str(),
    );
    let request = AssociateInstanceStorageConfigRequest {
        instance_id: spec.instance_id.clone(),
        resource_type: spec.resource_type,
        storage_config,
    };
    let response = ctx
        .call(&target, ctx.client.associate_instance_storage_config(request))
        .await?;

    let association_id = created_id(&target, response.association_id)?;
    let id = id::STORAGE_ASSOCIATION_ID.encode(&[
        spec.instance_id.as_str(),
        spec.resource_type.as_str(),
        association_id.as_str(),
    ]);
    info!(id = %id, "Associated instance storage config");

    read(ctx, &id, ReadMode::Created)
        .await?
        .ok_or_else(|| target.failed(ApiError::EmptyResponse))
}

/// Read the association; `None` means the record should be dropped
pub async fn read(
    ctx: &Context,
    id: &str,
    mode: ReadMode,
) -> Result<Option<Record<StorageAssociationAttributes>>> {
    let (instance_id, resource_type, association_id) = decode_id(id)?;

    let target = Target::new(KIND, op::DESCRIBE_INSTANCE_STORAGE_CONFIG, id);
    let Some(config) = ctx
        .describe(
            &target,
            ctx.client
                .describe_instance_storage_config(instance_id, resource_type, association_id),
        )
        .await?
    else {
        return entity_missing(&target, mode);
    };

    Ok(Some(Record::new(
        id,
        StorageAssociationAttributes {
            association_id: config
                .association_id
                .unwrap_or_else(|| association_id.to_string()),
            instance_id: instance_id.to_string(),
            resource_type,
            storage_config: flatten_storage_destination(&config.destination),
        },
    )))
}

/// Changed attribute groups; only `storage_config` can be updated in place
pub fn pending_changes(
    prior: &StorageAssociationAttributes,
    spec: &StorageAssociationSpec,
) -> Vec<&'static str> {
    let declared = build_storage_destination(&spec.storage_config)
        .map(|destination| flatten_storage_destination(&destination));

    match declared {
        Ok(declared) if declared == prior.storage_config => Vec::new(),
        _ => vec!["storage_config"],
    }
}

/// Attributes no update call can change
pub fn requires_replacement(
    prior: &StorageAssociationAttributes,
    spec: &StorageAssociationSpec,
) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if spec.instance_id != prior.instance_id {
        reasons.push("instance_id");
    }
    if spec.resource_type != prior.resource_type {
        reasons.push("resource_type");
    }
    reasons
}

/// Replace the storage destination in place, then refresh
pub async fn update(
    ctx: &Context,
    record: &Record<StorageAssociationAttributes>,
    spec: &StorageAssociationSpec,
) -> Result<Option<Record<StorageAssociationAttributes>>> {
    let storage_config = build_storage_destination(&spec.storage_config)?;
    let (instance_id, resource_type, association_id) = decode_id(&record.id)?;

    if !pending_changes(&record.attributes, spec).is_empty() {
        debug!(id = %record.id, attribute = "storage_config", "Updating storage association");
        let target = Target::new(KIND, op::UPDATE_INSTANCE_STORAGE_CONFIG, &record.id);
        ctx.call(
            &target,
            ctx.client.update_instance_storage_config(
                instance_id,
                resource_type,
                association_id,
                storage_config,
            ),
        )
        .await?;
    }

    read(ctx, &record.id, ReadMode::Refresh).await
}

/// Disassociate; an already missing association counts as removed
pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    let (instance_id, resource_type, association_id) = decode_id(id)?;

    let target = Target::new(KIND, op::DISASSOCIATE_INSTANCE_STORAGE_CONFIG, id);
    match ctx
        .call_optional(
            &target,
            ctx.client.disassociate_instance_storage_config(
                instance_id,
                resource_type,
                association_id,
            ),
        )
        .await?
    {
        Some(()) => info!(id = %id, "Disassociated instance storage config"),
        None => info!(id = %id, "Storage association already absent"),
    }
    Ok(())
}
