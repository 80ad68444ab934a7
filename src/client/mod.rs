//! Remote contact-center API
//!
//! [`ConnectApi`] is the seam between the reconcilers and whatever transport talks to the
//! service. Retries, authentication and pagination live behind it.

mod memory;
pub mod model;

pub use memory::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::tags::TagDiff;
use model::*;

/// Remote operation names, used in call logs, errors and metrics
pub mod operation {
    pub const CREATE_USER: &str = "CreateUser";
    pub const DESCRIBE_USER: &str = "DescribeUser";
    pub const UPDATE_USER_HIERARCHY: &str = "UpdateUserHierarchy";
    pub const UPDATE_USER_IDENTITY_INFO: &str = "UpdateUserIdentityInfo";
    pub const UPDATE_USER_PHONE_CONFIG: &str = "UpdateUserPhoneConfig";
    pub const UPDATE_USER_ROUTING_PROFILE: &str = "UpdateUserRoutingProfile";
    pub const UPDATE_USER_SECURITY_PROFILES: &str = "UpdateUserSecurityProfiles";
    pub const DELETE_USER: &str = "DeleteUser";

    pub const CREATE_AGENT_STATUS: &str = "CreateAgentStatus";
    pub const DESCRIBE_AGENT_STATUS: &str = "DescribeAgentStatus";
    pub const UPDATE_AGENT_STATUS: &str = "UpdateAgentStatus";

    pub const CREATE_USER_HIERARCHY_GROUP: &str = "CreateUserHierarchyGroup";
    pub const DESCRIBE_USER_HIERARCHY_GROUP: &str = "DescribeUserHierarchyGroup";
    pub const UPDATE_USER_HIERARCHY_GROUP_NAME: &str = "UpdateUserHierarchyGroupName";
    pub const DELETE_USER_HIERARCHY_GROUP: &str = "DeleteUserHierarchyGroup";

    pub const ASSOCIATE_INSTANCE_STORAGE_CONFIG: &str = "AssociateInstanceStorageConfig";
    pub const DESCRIBE_INSTANCE_STORAGE_CONFIG: &str = "DescribeInstanceStorageConfig";
    pub const UPDATE_INSTANCE_STORAGE_CONFIG: &str = "UpdateInstanceStorageConfig";
    pub const DISASSOCIATE_INSTANCE_STORAGE_CONFIG: &str = "DisassociateInstanceStorageConfig";

    pub const UPDATE_TAGS: &str = "UpdateTags";
}

/// Result type of remote calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors reported by the remote API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The addressed entity does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The service rejected a parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other service-side failure
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// The call succeeded but carried no usable payload
    #[error("empty response")]
    EmptyResponse,
}

impl ApiError {
    /// Create a service error
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the entity is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Remote procedures used by the reconcilers
///
/// Each describe call returns `Ok(None)` when the service answers without a payload and
/// `Err(ApiError::NotFound)` when the entity does not exist.
#[async_trait]
pub trait ConnectApi: Send + Sync {
    // Users
    async fn create_user(&self, request: CreateUserRequest) -> ApiResult<CreateUserResponse>;

    async fn describe_user(&self, instance_id: &str, user_id: &str) -> ApiResult<Option<User>>;

    async fn update_user_hierarchy(
        &self,
        instance_id: &str,
        user_id: &str,
        hierarchy_group_id: Option<String>,
    ) -> ApiResult<()>;

    async fn update_user_identity_info(
        &self,
        instance_id: &str,
        user_id: &str,
        identity_info: UserIdentityInfo,
    ) -> ApiResult<()>;

    async fn update_user_phone_config(
        &self,
        instance_id: &str,
        user_id: &str,
        phone_config: UserPhoneConfig,
    ) -> ApiResult<()>;

    async fn update_user_routing_profile(
        &self,
        instance_id: &str,
        user_id: &str,
        routing_profile_id: String,
    ) -> ApiResult<()>;

    async fn update_user_security_profiles(
        &self,
        instance_id: &str,
        user_id: &str,
        security_profile_ids: Vec<String>,
    ) -> ApiResult<()>;

    async fn delete_user(&self, instance_id: &str, user_id: &str) -> ApiResult<()>;

    // Agent statuses
    async fn create_agent_status(
        &self,
        request: CreateAgentStatusRequest,
    ) -> ApiResult<CreateAgentStatusResponse>;

    async fn describe_agent_status(
        &self,
        instance_id: &str,
        agent_status_id: &str,
    ) -> ApiResult<Option<AgentStatus>>;

    async fn update_agent_status(&self, request: UpdateAgentStatusRequest) -> ApiResult<()>;

    // User hierarchy groups
    async fn create_user_hierarchy_group(
        &self,
        request: CreateUserHierarchyGroupRequest,
    ) -> ApiResult<CreateUserHierarchyGroupResponse>;

    async fn describe_user_hierarchy_group(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
    ) -> ApiResult<Option<HierarchyGroup>>;

    async fn update_user_hierarchy_group_name(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
        name: String,
    ) -> ApiResult<()>;

    async fn delete_user_hierarchy_group(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
    ) -> ApiResult<()>;

    // Instance storage configs
    async fn associate_instance_storage_config(
        &self,
        request: AssociateInstanceStorageConfigRequest,
    ) -> ApiResult<AssociateInstanceStorageConfigResponse>;

    async fn describe_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
    ) -> ApiResult<Option<InstanceStorageConfig>>;

    async fn update_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
        storage_config: StorageDestination,
    ) -> ApiResult<()>;

    async fn disassociate_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
    ) -> ApiResult<()>;

    // Tagging
    async fn update_tags(&self, resource_arn: &str, diff: &TagDiff) -> ApiResult<()>;
}
