//! Instance storage-config association resource

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::model::{EncryptionType, InstanceStorageResourceType, StorageType};

/// Declared storage association
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StorageAssociationSpec {
    /// Owning instance
    pub instance_id: String,

    /// Data stored through this association
    pub resource_type: InstanceStorageResourceType,

    /// Storage destination
    pub storage_config: StorageConfigBlock,
}

/// Storage configuration block
///
/// Exactly the nested block named by `storage_type` must be present.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StorageConfigBlock {
    /// S3, KINESIS_VIDEO_STREAM, KINESIS_STREAM or KINESIS_FIREHOSE
    pub storage_type: StorageType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_config: Option<S3ConfigBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinesis_video_stream_config: Option<KinesisVideoStreamConfigBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinesis_stream_config: Option<KinesisStreamConfigBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinesis_firehose_config: Option<KinesisFirehoseConfigBlock>,
}

impl StorageConfigBlock {
    /// Storage types whose nested block is present
    pub fn present_blocks(&self) -> Vec<StorageType> {
        let mut present = Vec::new();
        if self.s3_config.is_some() {
            present.push(StorageType::S3);
        }
        if self.kinesis_video_stream_config.is_some() {
            present.push(StorageType::KinesisVideoStream);
        }
        if self.kinesis_stream_config.is_some() {
            present.push(StorageType::KinesisStream);
        }
        if self.kinesis_firehose_config.is_some() {
            present.push(StorageType::KinesisFirehose);
        }
        present
    }
}

/// S3 bucket destination
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct S3ConfigBlock {
    pub bucket_name: String,
    pub bucket_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_config: Option<EncryptionConfigBlock>,
}

/// Kinesis video stream destination
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KinesisVideoStreamConfigBlock {
    pub prefix: String,
    pub retention_period_hours: u32,
    pub encryption_config: EncryptionConfigBlock,
}

/// Kinesis data stream destination
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KinesisStreamConfigBlock {
    pub stream_arn: String,
}

/// Kinesis Firehose destination
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KinesisFirehoseConfigBlock {
    pub firehose_arn: String,
}

/// Encryption block
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EncryptionConfigBlock {
    /// KMS
    pub encryption_type: EncryptionType,
    pub key_id: String,
}

/// Flattened storage association attributes
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageAssociationAttributes {
    pub association_id: String,
    pub instance_id: String,
    pub resource_type: InstanceStorageResourceType,
    pub storage_config: StorageConfigBlock,
}
