//! User adapter
//!
//! Converts declared user configuration to CreateUser requests and DescribeUser payloads
//! back to flattened attributes.

use tracing::debug;

use crate::client::model::{CreateUserRequest, User, UserIdentityInfo, UserPhoneConfig};
use crate::resources::{IdentityInfo, PhoneConfig, UserAttributes, UserSpec};
use crate::tags::{TagViews, Tags};

use super::non_empty;

/// Build the CreateUser request
pub fn build_create_user_request(spec: &UserSpec, tags: Option<Tags>) -> CreateUserRequest {
    let request = CreateUserRequest {
        instance_id: spec.instance_id.clone(),
        username: spec.username.clone(),
        password: non_empty(spec.password.as_ref()),
        directory_user_id: non_empty(spec.directory_user_id.as_ref()),
        hierarchy_group_id: non_empty(spec.hierarchy_group_id.as_ref()),
        identity_info: spec.identity_info.as_ref().and_then(expand_identity_info),
        phone_config: Some(expand_phone_config(&spec.phone_config)),
        routing_profile_id: spec.routing_profile_id.clone(),
        security_profile_ids: spec.security_profile_ids.iter().cloned().collect(),
        tags,
    };

    debug!(
        instance_id = %request.instance_id,
        username = %request.username,
        has_password = request.password.is_some(),
        "Built CreateUser request"
    );
    request
}

/// Expand the identity block; a block with no non-empty field expands to nothing
pub fn expand_identity_info(info: &IdentityInfo) -> Option<UserIdentityInfo> {
    let expanded = UserIdentityInfo {
        email: non_empty(info.email.as_ref()),
        first_name: non_empty(info.first_name.as_ref()),
        last_name: non_empty(info.last_name.as_ref()),
    };

    (expanded != UserIdentityInfo::default()).then_some(expanded)
}

/// Expand the phone block
///
/// Unset `auto_accept` and `after_contact_work_time_limit` are sent as the service defaults
/// (`false` and `0`), so a block that omits them compares equal to what DescribeUser reports.
pub fn expand_phone_config(config: &PhoneConfig) -> UserPhoneConfig {
    UserPhoneConfig {
        phone_type: config.phone_type,
        auto_accept: Some(config.auto_accept.unwrap_or(false)),
        after_contact_work_time_limit: Some(config.after_contact_work_time_limit.unwrap_or(0)),
        desk_phone_number: non_empty(config.desk_phone_number.as_ref()),
    }
}

/// Flatten a DescribeUser payload
///
/// `instance_id` and `user_id` come from the decoded identifier; a payload id, when present,
/// takes precedence for the latter.
pub fn flatten_user(
    instance_id: &str,
    user_id: &str,
    user: User,
    tag_views: TagViews,
) -> UserAttributes {
    UserAttributes {
        arn: user.arn.unwrap_or_default(),
        user_id: user.id.unwrap_or_else(|| user_id.to_string()),
        instance_id: instance_id.to_string(),
        username: user.username.unwrap_or_default(),
        directory_user_id: user.directory_user_id,
        hierarchy_group_id: user.hierarchy_group_id,
        identity_info: user.identity_info.as_ref().and_then(flatten_identity_info),
        phone_config: user.phone_config.as_ref().map(flatten_phone_config),
        routing_profile_id: user.routing_profile_id.unwrap_or_default(),
        security_profile_ids: user.security_profile_ids.into_iter().collect(),
        tags: tag_views.tags,
        tags_all: tag_views.tags_all,
    }
}

/// Flatten identity info; a payload with no field set is treated as an absent block
pub fn flatten_identity_info(info: &UserIdentityInfo) -> Option<IdentityInfo> {
    let flattened = IdentityInfo {
        email: info.email.clone(),
        first_name: info.first_name.clone(),
        last_name: info.last_name.clone(),
    };

    (!flattened.is_empty()).then_some(flattened)
}

/// Flatten phone settings, keeping only the fields the payload carries
pub fn flatten_phone_config(config: &UserPhoneConfig) -> PhoneConfig {
    PhoneConfig {
        phone_type: config.phone_type,
        auto_accept: config.auto_accept,
        after_contact_work_time_limit: config.after_contact_work_time_limit,
        desk_phone_number: config.desk_phone_number.clone(),
    }
}
