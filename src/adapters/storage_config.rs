//! Storage configuration adapter
//!
//! Converts the declared storage_config block to a [`StorageDestination`] and back.

use crate::client::model::{
    EncryptionConfig, KinesisVideoStreamConfig, S3Config, StorageDestination, StorageType,
};
use crate::error::{Error, Result};
use crate::resources::{
    EncryptionConfigBlock, KinesisFirehoseConfigBlock, KinesisStreamConfigBlock,
    KinesisVideoStreamConfigBlock, S3ConfigBlock, StorageConfigBlock,
};

/// Build the storage destination from the declared block
///
/// The block named by `storage_type` must be present and no other block may be.
pub fn build_storage_destination(storage: &StorageConfigBlock) -> Result<StorageDestination> {
    let conflicting: Vec<&str> = storage
        .present_blocks()
        .into_iter()
        .filter(|present| *present != storage.storage_type)
        .map(|present| present.block_name())
        .collect();
    if !conflicting.is_empty() {
        return Err(Error::validation(format!(
            "storage_type {} conflicts with {}",
            storage.storage_type.as_str(),
            conflicting.join(", ")
        )));
    }

    match storage.storage_type {
        StorageType::S3 => build_s3_destination(storage.s3_config.as_ref()),
        StorageType::KinesisVideoStream => {
            build_kinesis_video_destination(storage.kinesis_video_stream_config.as_ref())
        }
        StorageType::KinesisStream => {
            build_kinesis_stream_destination(storage.kinesis_stream_config.as_ref())
        }
        StorageType::KinesisFirehose => {
            build_kinesis_firehose_destination(storage.kinesis_firehose_config.as_ref())
        }
    }
}

fn missing_block(storage_type: StorageType) -> Error {
    Error::validation(format!(
        "{} must be set when storage_type is {}",
        storage_type.block_name(),
        storage_type.as_str()
    ))
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn build_s3_destination(s3: Option<&S3ConfigBlock>) -> Result<StorageDestination> {
    let s3 = s3.ok_or_else(|| missing_block(StorageType::S3))?;
    require(&s3.bucket_name, "s3_config.bucket_name")?;
    require(&s3.bucket_prefix, "s3_config.bucket_prefix")?;

    Ok(StorageDestination::S3(S3Config {
        bucket_name: s3.bucket_name.clone(),
        bucket_prefix: s3.bucket_prefix.clone(),
        encryption_config: s3
            .encryption_config
            .as_ref()
            .map(build_encryption_config)
            .transpose()?,
    }))
}

fn build_kinesis_video_destination(
    kvs: Option<&KinesisVideoStreamConfigBlock>,
) -> Result<StorageDestination> {
    let kvs = kvs.ok_or_else(|| missing_block(StorageType::KinesisVideoStream))?;
    require(&kvs.prefix, "kinesis_video_stream_config.prefix")?;

    Ok(StorageDestination::KinesisVideoStream(KinesisVideoStreamConfig {
        prefix: kvs.prefix.clone(),
        retention_period_hours: kvs.retention_period_hours,
        encryption_config: build_encryption_config(&kvs.encryption_config)?,
    }))
}

fn build_kinesis_stream_destination(
    stream: Option<&KinesisStreamConfigBlock>,
) -> Result<StorageDestination> {
    let stream = stream.ok_or_else(|| missing_block(StorageType::KinesisStream))?;
    require(&stream.stream_arn, "kinesis_stream_config.stream_arn")?;

    Ok(StorageDestination::KinesisStream {
        stream_arn: stream.stream_arn.clone(),
    })
}

fn build_kinesis_firehose_destination(
    firehose: Option<&KinesisFirehoseConfigBlock>,
) -> Result<StorageDestination> {
    let firehose = firehose.ok_or_else(|| missing_block(StorageType::KinesisFirehose))?;
    require(&firehose.firehose_arn, "kinesis_firehose_config.firehose_arn")?;

    Ok(StorageDestination::KinesisFirehose {
        firehose_arn: firehose.firehose_arn.clone(),
    })
}

fn build_encryption_config(encryption: &EncryptionConfigBlock) -> Result<EncryptionConfig> {
    require(&encryption.key_id, "encryption_config.key_id")?;

    Ok(EncryptionConfig {
        encryption_type: encryption.encryption_type,
        key_id: encryption.key_id.clone(),
    })
}

/// Flatten a storage destination into the declared block shape
pub fn flatten_storage_destination(destination: &StorageDestination) -> StorageConfigBlock {
    let mut block = StorageConfigBlock {
        storage_type: destination.storage_type(),
        s3_config: None,
        kinesis_video_stream_config: None,
        kinesis_stream_config: None,
        kinesis_firehose_config: None,
    };

    match destination {
        StorageDestination::S3(s3) => {
            block.s3_config = Some(S3ConfigBlock {
                bucket_name: s3.bucket_name.clone(),
                bucket_prefix: s3.bucket_prefix.clone(),
                encryption_config: s3.encryption_config.as_ref().map(flatten_encryption_config),
            });
        }
        StorageDestination::KinesisVideoStream(kvs) => {
            block.kinesis_video_stream_config = Some(KinesisVideoStreamConfigBlock {
                prefix: kvs.prefix.clone(),
                retention_period_hours: kvs.retention_period_hours,
                encryption_config: flatten_encryption_config(&kvs.encryption_config),
            });
        }
        StorageDestination::KinesisStream { stream_arn } => {
            block.kinesis_stream_config = Some(KinesisStreamConfigBlock {
                stream_arn: stream_arn.clone(),
            });
        }
        StorageDestination::KinesisFirehose { firehose_arn } => {
            block.kinesis_firehose_config = Some(KinesisFirehoseConfigBlock {
                firehose_arn: firehose_arn.clone(),
            });
        }
    }

    block
}

fn flatten_encryption_config(encryption: &EncryptionConfig) -> EncryptionConfigBlock {
    EncryptionConfigBlock {
        encryption_type: encryption.encryption_type,
        key_id: encryption.key_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::model::EncryptionType;

    fn empty(storage_type: StorageType) -> StorageConfigBlock {
        StorageConfigBlock {
            storage_type,
            s3_config: None,
            kinesis_video_stream_config: None,
            kinesis_stream_config: None,
            kinesis_firehose_config: None,
        }
    }

    fn kms(key_id: &str) -> EncryptionConfigBlock {
        EncryptionConfigBlock {
            encryption_type: EncryptionType::Kms,
            key_id: key_id.to_string(),
        }
    }

    #[test]
    fn test_missing_block_rejected() {
        let err = build_storage_destination(&empty(StorageType::S3)).unwrap_err();
        assert!(matches!(err, Error::ValidationRejected(_)));
        assert!(err.to_string().contains("s3_config must be set when storage_type is S3"));
    }

    #[test]
    fn test_conflicting_block_rejected() {
        let mut block = empty(StorageType::KinesisStream);
        block.kinesis_stream_config = Some(KinesisStreamConfigBlock {
            stream_arn: "arn:stream".to_string(),
        });
        block.kinesis_firehose_config = Some(KinesisFirehoseConfigBlock {
            firehose_arn: "arn:firehose".to_string(),
        });

        let err = build_storage_destination(&block).unwrap_err();
        assert!(err.to_string().contains("conflicts with kinesis_firehose_config"));
    }

    #[test]
    fn test_empty_key_id_rejected() {
        let mut block = empty(StorageType::KinesisVideoStream);
        block.kinesis_video_stream_config = Some(KinesisVideoStreamConfigBlock {
            prefix: "media".to_string(),
            retention_period_hours: 24,
            encryption_config: kms(""),
        });

        let err = build_storage_destination(&block).unwrap_err();
        assert!(err.to_string().contains("encryption_config.key_id"));
    }

    #[test]
    fn test_firehose_flattens_into_its_own_block() {
        let destination = StorageDestination::KinesisFirehose {
            firehose_arn: "arn:firehose".to_string(),
        };

        let block = flatten_storage_destination(&destination);
        assert_eq!(block.storage_type, StorageType::KinesisFirehose);
        assert_eq!(block.present_blocks(), vec![StorageType::KinesisFirehose]);
        assert_eq!(build_storage_destination(&block).unwrap(), destination);
    }

    #[test]
    fn test_s3_without_encryption() {
        let mut block = empty(StorageType::S3);
        block.s3_config = Some(S3ConfigBlock {
            bucket_name: "recordings".to_string(),
            bucket_prefix: "calls".to_string(),
            encryption_config: None,
        });

        match build_storage_destination(&block).unwrap() {
            StorageDestination::S3(s3) => assert!(s3.encryption_config.is_none()),
            other => panic!("unexpected destination {:?}", other),
        }
    }
}
