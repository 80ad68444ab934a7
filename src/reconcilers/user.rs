//! User reconciler
//!
//! Users have five field-level update calls plus tagging:
//! - UpdateUserHierarchy for `hierarchy_group_id`
//! - UpdateUserIdentityInfo for `identity_info`
//! - UpdateUserPhoneConfig for the whole `phone_config` block
//! - UpdateUserRoutingProfile for `routing_profile_id`
//! - UpdateUserSecurityProfiles for `security_profile_ids`

use tracing::{debug, info};

use crate::adapters::{
    build_create_user_request, expand_identity_info, expand_phone_config, flatten_user,
};
use crate::client::model::PhoneType;
use crate::client::operation as op;
use crate::client::ApiError;
use crate::controllers::{Context, Target};
use crate::error::{Error, Result};
use crate::id;
use crate::reconcilers::{
    created_id, entity_missing, present, validate_instance_id, ReadMode, UpdateProgress,
};
use crate::resources::{Record, UserAttributes, UserSpec};
use crate::tags::{TagDiff, TagPolicy, Tags};

/// Kind label
pub const KIND: &str = "User";

/// Upper bound on security profiles per user
pub const MAX_SECURITY_PROFILES: usize = 500;

/// Validate the declared user
pub fn validate(spec: &UserSpec) -> Result<()> {
    validate_instance_id(&spec.instance_id)?;

    if spec.username.is_empty() {
        return Err(Error::validation("username must not be empty"));
    }

    if spec.routing_profile_id.is_empty() {
        return Err(Error::validation("routing_profile_id must not be empty"));
    }

    // Security profiles
    let profiles = spec.security_profile_ids.len();
    if profiles == 0 || profiles > MAX_SECURITY_PROFILES {
        return Err(Error::validation(format!(
            "security_profile_ids must contain between 1 and {} entries, got {}",
            MAX_SECURITY_PROFILES, profiles
        )));
    }
    if spec.security_profile_ids.iter().any(|id| id.is_empty()) {
        return Err(Error::validation("security_profile_ids must not contain empty ids"));
    }

    // Phone configuration
    let phone = &spec.phone_config;
    match phone.phone_type {
        None => return Err(Error::validation("phone_config.phone_type is required")),
        Some(PhoneType::DeskPhone) if present(phone.desk_phone_number.as_ref()).is_none() => {
            return Err(Error::validation(
                "phone_config.desk_phone_number is required when phone_type is DESK_PHONE",
            ));
        }
        Some(_) => {}
    }
    if let Some(limit) = phone.after_contact_work_time_limit {
        if limit < 0 {
            return Err(Error::validation(format!(
                "phone_config.after_contact_work_time_limit must not be negative, got {}",
                limit
            )));
        }
    }

    Ok(())
}

/// Create the user and read it back
pub async fn create(ctx: &Context, spec: &UserSpec) -> Result<Record<UserAttributes>> {
    validate(spec)?;

    let target = Target::new(KIND, op::CREATE_USER, &spec.username);
    let request = build_create_user_request(spec, ctx.tags.request_tags(&spec.tags));
    let response = ctx.call(&target, ctx.client.create_user(request)).await?;

    let user_id = created_id(&target, response.user_id)?;
    let id = id::USER_ID.encode(&[spec.instance_id.as_str(), user_id.as_str()]);
    info!(id = %id, username = %spec.username, "Created user");

    read(ctx, &id, ReadMode::Created, &spec.tags)
        .await?
        .ok_or_else(|| target.failed(ApiError::EmptyResponse))
}

/// Read the user; `None` means the record should be dropped
pub async fn read(
    ctx: &Context,
    id: &str,
    mode: ReadMode,
    declared_tags: &Tags,
) -> Result<Option<Record<UserAttributes>>> {
    let (instance_id, user_id) = id::USER_ID.decode_pair(id)?;

    let target = Target::new(KIND, op::DESCRIBE_USER, id);
    let Some(user) = ctx
        .describe(&target, ctx.client.describe_user(instance_id, user_id))
        .await?
    else {
        return entity_missing(&target, mode);
    };

    let tag_views = ctx.tags.views(&user.tags, declared_tags);
    Ok(Some(Record::new(
        id,
        flatten_user(instance_id, user_id, user, tag_views),
    )))
}

/// Attribute group with its own update call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserChange {
    HierarchyGroup,
    IdentityInfo,
    PhoneConfig,
    RoutingProfile,
    SecurityProfiles,
    Tags,
}

impl UserChange {
    /// Attribute name
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::HierarchyGroup => "hierarchy_group_id",
            Self::IdentityInfo => "identity_info",
            Self::PhoneConfig => "phone_config",
            Self::RoutingProfile => "routing_profile_id",
            Self::SecurityProfiles => "security_profile_ids",
            Self::Tags => "tags",
        }
    }
}

/// Changed attribute groups, in update order
pub fn pending_changes(
    prior: &UserAttributes,
    spec: &UserSpec,
    tags: &TagPolicy,
) -> Vec<UserChange> {
    let mut changes = Vec::new();

    if present(spec.hierarchy_group_id.as_ref()) != present(prior.hierarchy_group_id.as_ref()) {
        changes.push(UserChange::HierarchyGroup);
    }

    let declared_identity = spec.identity_info.as_ref().and_then(expand_identity_info);
    let prior_identity = prior.identity_info.as_ref().and_then(expand_identity_info);
    if declared_identity != prior_identity {
        changes.push(UserChange::IdentityInfo);
    }

    let declared_phone = expand_phone_config(&spec.phone_config);
    if prior.phone_config.as_ref().map(expand_phone_config) != Some(declared_phone) {
        changes.push(UserChange::PhoneConfig);
    }

    if spec.routing_profile_id != prior.routing_profile_id {
        changes.push(UserChange::RoutingProfile);
    }

    if spec.security_profile_ids != prior.security_profile_ids {
        changes.push(UserChange::SecurityProfiles);
    }

    if !TagDiff::between(&prior.tags_all, &tags.desired_all(&spec.tags)).is_empty() {
        changes.push(UserChange::Tags);
    }

    changes
}

/// Attributes no update call can change
pub fn requires_replacement(prior: &UserAttributes, spec: &UserSpec) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if spec.instance_id != prior.instance_id {
        reasons.push("instance_id");
    }
    if spec.username != prior.username {
        reasons.push("username");
    }
    if let Some(directory_user_id) = present(spec.directory_user_id.as_ref()) {
        if prior.directory_user_id.as_deref() != Some(directory_user_id) {
            reasons.push("directory_user_id");
        }
    }
    reasons
}

/// Apply changed attribute groups one call at a time, then refresh
///
/// Stops at the first failing call; groups applied before it stay applied.
pub async fn update(
    ctx: &Context,
    record: &Record<UserAttributes>,
    spec: &UserSpec,
) -> Result<Option<Record<UserAttributes>>> {
    validate(spec)?;
    let (instance_id, user_id) = id::USER_ID.decode_pair(&record.id)?;
    let prior = &record.attributes;
    let mut progress = UpdateProgress::new(KIND, &record.id);

    for change in pending_changes(prior, spec, &ctx.tags) {
        debug!(id = %record.id, attribute = change.attribute(), "Updating user");
        let result = match change {
            UserChange::HierarchyGroup => {
                let target = Target::new(KIND, op::UPDATE_USER_HIERARCHY, &record.id);
                let group = present(spec.hierarchy_group_id.as_ref()).map(str::to_string);
                ctx.call(
                    &target,
                    ctx.client.update_user_hierarchy(instance_id, user_id, group),
                )
                .await
            }
            UserChange::IdentityInfo => {
                let target = Target::new(KIND, op::UPDATE_USER_IDENTITY_INFO, &record.id);
                // A removed block clears every identity field
                let identity = spec
                    .identity_info
                    .as_ref()
                    .and_then(expand_identity_info)
                    .unwrap_or_default();
                ctx.call(
                    &target,
                    ctx.client
                        .update_user_identity_info(instance_id, user_id, identity),
                )
                .await
            }
            UserChange::PhoneConfig => {
                let target = Target::new(KIND, op::UPDATE_USER_PHONE_CONFIG, &record.id);
                let phone = expand_phone_config(&spec.phone_config);
                ctx.call(
                    &target,
                    ctx.client.update_user_phone_config(instance_id, user_id, phone),
                )
                .await
            }
            UserChange::RoutingProfile => {
                let target = Target::new(KIND, op::UPDATE_USER_ROUTING_PROFILE, &record.id);
                ctx.call(
                    &target,
                    ctx.client.update_user_routing_profile(
                        instance_id,
                        user_id,
                        spec.routing_profile_id.clone(),
                    ),
                )
                .await
            }
            UserChange::SecurityProfiles => {
                let target = Target::new(KIND, op::UPDATE_USER_SECURITY_PROFILES, &record.id);
                ctx.call(
                    &target,
                    ctx.client.update_user_security_profiles(
                        instance_id,
                        user_id,
                        spec.security_profile_ids.iter().cloned().collect(),
                    ),
                )
                .await
            }
            UserChange::Tags => {
                let target = Target::new(KIND, op::UPDATE_TAGS, &record.id);
                let diff = TagDiff::between(&prior.tags_all, &ctx.tags.desired_all(&spec.tags));
                ctx.call(&target, ctx.client.update_tags(&prior.arn, &diff))
                    .await
            }
        };

        result.map_err(|e| progress.failed(e))?;
        progress.applied(change.attribute());
    }

    read(ctx, &record.id, ReadMode::Refresh, &spec.tags).await
}

/// Delete the user; an already missing user counts as deleted
pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    let (instance_id, user_id) = id::USER_ID.decode_pair(id)?;

    let target = Target::new(KIND, op::DELETE_USER, id);
    match ctx
        .call_optional(&target, ctx.client.delete_user(instance_id, user_id))
        .await?
    {
        Some(()) => info!(id = %id, "Deleted user"),
        None => info!(id = %id, "User already absent"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::resources::{IdentityInfo, PhoneConfig};

    fn spec() -> UserSpec {
        UserSpec {
            instance_id: "i-1".to_string(),
            username: "jdoe".to_string(),
            password: None,
            directory_user_id: None,
            hierarchy_group_id: None,
            identity_info: None,
            phone_config: PhoneConfig {
                phone_type: Some(PhoneType::SoftPhone),
                auto_accept: Some(false),
                after_contact_work_time_limit: Some(30),
                desk_phone_number: None,
            },
            routing_profile_id: "rp-1".to_string(),
            security_profile_ids: BTreeSet::from(["sp-1".to_string()]),
            tags: Tags::new(),
        }
    }

    fn state_of(spec: &UserSpec) -> UserAttributes {
        UserAttributes {
            arn: "arn:user".to_string(),
            user_id: "u-1".to_string(),
            instance_id: spec.instance_id.clone(),
            username: spec.username.clone(),
            directory_user_id: Some("u-1".to_string()),
            hierarchy_group_id: spec.hierarchy_group_id.clone(),
            identity_info: spec.identity_info.clone(),
            phone_config: Some(spec.phone_config.clone()),
            routing_profile_id: spec.routing_profile_id.clone(),
            security_profile_ids: spec.security_profile_ids.clone(),
            tags: spec.tags.clone(),
            tags_all: spec.tags.clone(),
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(validate(&spec()).is_ok());
    }

    #[test]
    fn test_desk_phone_requires_number() {
        let mut spec = spec();
        spec.phone_config.phone_type = Some(PhoneType::DeskPhone);
        assert!(validate(&spec).is_err());

        spec.phone_config.desk_phone_number = Some("+15555550100".to_string());
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_phone_type_required() {
        let mut spec = spec();
        spec.phone_config.phone_type = None;
        let err = validate(&spec).unwrap_err();
        assert!(err.to_string().contains("phone_type is required"));
    }

    #[test]
    fn test_security_profile_bounds() {
        let mut spec = spec();
        spec.security_profile_ids.clear();
        assert!(validate(&spec).is_err());

        spec.security_profile_ids = (0..=MAX_SECURITY_PROFILES)
            .map(|i| format!("sp-{}", i))
            .collect();
        assert!(validate(&spec).is_err());
    }

    #[test]
    fn test_negative_work_time_rejected() {
        let mut spec = spec();
        spec.phone_config.after_contact_work_time_limit = Some(-1);
        assert!(validate(&spec).is_err());
    }

    #[test]
    fn test_unchanged_spec_has_no_pending_changes() {
        let spec = spec();
        let state = state_of(&spec);
        assert!(pending_changes(&state, &spec, &TagPolicy::default()).is_empty());
        assert!(requires_replacement(&state, &spec).is_empty());
    }

    #[test]
    fn test_unset_phone_fields_match_reported_defaults() {
        let mut spec = spec();
        spec.phone_config.auto_accept = None;
        spec.phone_config.after_contact_work_time_limit = None;

        let mut state = state_of(&spec);
        state.phone_config = Some(PhoneConfig {
            phone_type: Some(PhoneType::SoftPhone),
            auto_accept: Some(false),
            after_contact_work_time_limit: Some(0),
            desk_phone_number: None,
        });
        assert!(pending_changes(&state, &spec, &TagPolicy::default()).is_empty());

        state.phone_config.as_mut().unwrap().auto_accept = Some(true);
        assert_eq!(
            pending_changes(&state, &spec, &TagPolicy::default()),
            vec![UserChange::PhoneConfig]
        );
    }

    #[test]
    fn test_changes_come_in_update_order() {
        let prior_spec = spec();
        let state = state_of(&prior_spec);

        let mut spec = prior_spec;
        spec.tags.insert("team".to_string(), "support".to_string());
        spec.security_profile_ids.insert("sp-2".to_string());
        spec.identity_info = Some(IdentityInfo {
            email: Some("jdoe@example.com".to_string()),
            ..Default::default()
        });

        assert_eq!(
            pending_changes(&state, &spec, &TagPolicy::default()),
            vec![
                UserChange::IdentityInfo,
                UserChange::SecurityProfiles,
                UserChange::Tags
            ]
        );
    }

    #[test]
    fn test_empty_identity_block_matches_absent_state() {
        let mut spec = spec();
        let state = state_of(&spec);
        spec.identity_info = Some(IdentityInfo::default());

        assert!(pending_changes(&state, &spec, &TagPolicy::default()).is_empty());
    }

    #[test]
    fn test_replacement_attributes() {
        let mut spec = spec();
        let state = state_of(&spec);

        spec.username = "jane".to_string();
        spec.directory_user_id = Some("dir-9".to_string());
        assert_eq!(
            requires_replacement(&state, &spec),
            vec!["username", "directory_user_id"]
        );
    }
}
