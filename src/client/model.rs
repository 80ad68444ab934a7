//! Request and response shapes of the contact-center API
//!
//! Response fields are optional wherever the remote service may omit them; flattening
//! checks each one for presence instead of assuming a default.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tags::Tags;

/// User phone type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    SoftPhone,
    DeskPhone,
}

/// Agent status state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatusState {
    Enabled,
    Disabled,
}

/// Agent status type as reported by the service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatusType {
    Routable,
    Custom,
    Offline,
}

/// Kind of data an instance storage association stores
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStorageResourceType {
    AgentEvents,
    CallRecordings,
    ChatTranscripts,
    ContactTraceRecords,
    MediaStreams,
    ScheduledReports,
    RealTimeContactAnalysisSegments,
}

impl InstanceStorageResourceType {
    /// Every resource type
    pub const ALL: [InstanceStorageResourceType; 7] = [
        Self::AgentEvents,
        Self::CallRecordings,
        Self::ChatTranscripts,
        Self::ContactTraceRecords,
        Self::MediaStreams,
        Self::ScheduledReports,
        Self::RealTimeContactAnalysisSegments,
    ];

    /// Wire name, also used as the middle component of association identifiers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgentEvents => "AGENT_EVENTS",
            Self::CallRecordings => "CALL_RECORDINGS",
            Self::ChatTranscripts => "CHAT_TRANSCRIPTS",
            Self::ContactTraceRecords => "CONTACT_TRACE_RECORDS",
            Self::MediaStreams => "MEDIA_STREAMS",
            Self::ScheduledReports => "SCHEDULED_REPORTS",
            Self::RealTimeContactAnalysisSegments => "REAL_TIME_CONTACT_ANALYSIS_SEGMENTS",
        }
    }
}

impl fmt::Display for InstanceStorageResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStorageResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| format!("unknown instance storage resource type '{}'", s))
    }
}

/// Storage destination type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageType {
    S3,
    KinesisVideoStream,
    KinesisStream,
    KinesisFirehose,
}

impl StorageType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "S3",
            Self::KinesisVideoStream => "KINESIS_VIDEO_STREAM",
            Self::KinesisStream => "KINESIS_STREAM",
            Self::KinesisFirehose => "KINESIS_FIREHOSE",
        }
    }

    /// Name of the nested block carrying this type's settings
    pub fn block_name(&self) -> &'static str {
        match self {
            Self::S3 => "s3_config",
            Self::KinesisVideoStream => "kinesis_video_stream_config",
            Self::KinesisStream => "kinesis_stream_config",
            Self::KinesisFirehose => "kinesis_firehose_config",
        }
    }
}

/// Encryption type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncryptionType {
    Kms,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// User identity information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserIdentityInfo {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User phone settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPhoneConfig {
    pub phone_type: Option<PhoneType>,
    pub auto_accept: Option<bool>,
    pub after_contact_work_time_limit: Option<i64>,
    pub desk_phone_number: Option<String>,
}

/// CreateUser request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub instance_id: String,
    pub username: String,
    pub password: Option<String>,
    pub directory_user_id: Option<String>,
    pub hierarchy_group_id: Option<String>,
    pub identity_info: Option<UserIdentityInfo>,
    pub phone_config: Option<UserPhoneConfig>,
    pub routing_profile_id: String,
    pub security_profile_ids: Vec<String>,
    pub tags: Option<Tags>,
}

/// CreateUser response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserResponse {
    pub user_id: Option<String>,
    pub user_arn: Option<String>,
}

/// DescribeUser payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub username: Option<String>,
    pub directory_user_id: Option<String>,
    pub hierarchy_group_id: Option<String>,
    pub identity_info: Option<UserIdentityInfo>,
    pub phone_config: Option<UserPhoneConfig>,
    pub routing_profile_id: Option<String>,
    pub security_profile_ids: Vec<String>,
    pub tags: Tags,
}

// ---------------------------------------------------------------------------
// Agent statuses
// ---------------------------------------------------------------------------

/// CreateAgentStatus request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateAgentStatusRequest {
    pub instance_id: String,
    pub name: String,
    pub description: Option<String>,
    pub state: AgentStatusState,
    pub tags: Option<Tags>,
}

/// CreateAgentStatus response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateAgentStatusResponse {
    pub agent_status_id: Option<String>,
    pub agent_status_arn: Option<String>,
}

/// DescribeAgentStatus payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentStatus {
    pub agent_status_id: Option<String>,
    pub agent_status_arn: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<AgentStatusState>,
    pub status_type: Option<AgentStatusType>,
    pub tags: Tags,
}

/// UpdateAgentStatus request; only the populated fields change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateAgentStatusRequest {
    pub instance_id: String,
    pub agent_status_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<AgentStatusState>,
}

// ---------------------------------------------------------------------------
// User hierarchy groups
// ---------------------------------------------------------------------------

/// CreateUserHierarchyGroup request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserHierarchyGroupRequest {
    pub instance_id: String,
    pub name: String,
    pub parent_group_id: Option<String>,
    pub tags: Option<Tags>,
}

/// CreateUserHierarchyGroup response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateUserHierarchyGroupResponse {
    pub hierarchy_group_id: Option<String>,
    pub hierarchy_group_arn: Option<String>,
}

/// One level of a hierarchy path
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyGroupSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub arn: Option<String>,
}

/// DescribeUserHierarchyGroup payload
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyGroup {
    pub id: Option<String>,
    pub arn: Option<String>,
    pub name: Option<String>,
    pub level_id: Option<String>,
    /// Levels from the root down to and including this group
    pub hierarchy_path: Vec<HierarchyGroupSummary>,
    pub tags: Tags,
}

// ---------------------------------------------------------------------------
// Instance storage configs
// ---------------------------------------------------------------------------

/// Encryption settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionConfig {
    pub encryption_type: EncryptionType,
    pub key_id: String,
}

/// S3 destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Config {
    pub bucket_name: String,
    pub bucket_prefix: String,
    pub encryption_config: Option<EncryptionConfig>,
}

/// Kinesis video stream destination
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KinesisVideoStreamConfig {
    pub prefix: String,
    pub retention_period_hours: u32,
    pub encryption_config: EncryptionConfig,
}

/// Where an association stores data; exactly one destination per association
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageDestination {
    S3(S3Config),
    KinesisVideoStream(KinesisVideoStreamConfig),
    KinesisStream { stream_arn: String },
    KinesisFirehose { firehose_arn: String },
}

impl StorageDestination {
    /// The destination's storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::S3(_) => StorageType::S3,
            Self::KinesisVideoStream(_) => StorageType::KinesisVideoStream,
            Self::KinesisStream { .. } => StorageType::KinesisStream,
            Self::KinesisFirehose { .. } => StorageType::KinesisFirehose,
        }
    }
}

/// DescribeInstanceStorageConfig payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceStorageConfig {
    pub association_id: Option<String>,
    pub destination: StorageDestination,
}

/// AssociateInstanceStorageConfig request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssociateInstanceStorageConfigRequest {
    pub instance_id: String,
    pub resource_type: InstanceStorageResourceType,
    pub storage_config: StorageDestination,
}

/// AssociateInstanceStorageConfig response
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssociateInstanceStorageConfigResponse {
    pub association_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_wire_names_round_trip() {
        for resource_type in InstanceStorageResourceType::ALL {
            let parsed: InstanceStorageResourceType = resource_type.as_str().parse().unwrap();
            assert_eq!(parsed, resource_type);

            let json = serde_json::to_string(&resource_type).unwrap();
            assert_eq!(json, format!("\"{}\"", resource_type));
        }
    }

    #[test]
    fn test_unknown_resource_type_is_rejected() {
        assert!("CALL_LOGS".parse::<InstanceStorageResourceType>().is_err());
    }
}
