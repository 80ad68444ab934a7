//! Declared configuration and flattened attributes for each resource type

mod agent_status;
mod hierarchy_group;
mod storage_association;
mod user;

pub use agent_status::*;
pub use hierarchy_group::*;
pub use storage_association::*;
pub use user::*;

use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::Result;

/// A resource's local record: composite identifier plus flattened attributes
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record<A> {
    pub id: String,
    pub attributes: A,
}

impl<A> Record<A> {
    /// Create a record
    pub fn new(id: impl Into<String>, attributes: A) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

impl<A: Serialize> Record<A> {
    /// Render the record for a state store
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Generate YAML JSON-schema documents for every declared resource and the provider config
pub fn generate_schemas() -> Result<Vec<String>> {
    Ok(vec![
        serde_yaml::to_string(&schema_for!(ProviderConfig))?,
        serde_yaml::to_string(&schema_for!(UserSpec))?,
        serde_yaml::to_string(&schema_for!(AgentStatusSpec))?,
        serde_yaml::to_string(&schema_for!(HierarchyGroupSpec))?,
        serde_yaml::to_string(&schema_for!(StorageAssociationSpec))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_schemas_covers_every_resource() {
        let schemas = generate_schemas().unwrap();
        assert_eq!(schemas.len(), 5);
        assert!(schemas[1].contains("security_profile_ids"));
        assert!(schemas[4].contains("kinesis_firehose_config"));
    }

    #[test]
    fn test_absent_block_serializes_as_null() {
        let record = Record::new(
            "i-1:user-1",
            UserAttributes {
                user_id: "user-1".to_string(),
                instance_id: "i-1".to_string(),
                ..Default::default()
            },
        );

        let json = record.to_json().unwrap();
        assert_eq!(json["id"], "i-1:user-1");
        assert!(json["attributes"]["identity_info"].is_null());
        assert!(json["attributes"]["phone_config"].is_null());
    }

    #[test]
    fn test_storage_spec_rejects_unknown_fields() {
        let yaml = r#"
instance_id: i-1
resource_type: CALL_RECORDINGS
storage_config:
  storage_type: S3
  s3_config:
    bucket_name: recordings
    bucket_prefix: calls
  bogus: true
"#;
        let parsed: std::result::Result<StorageAssociationSpec, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());
    }
}
