//! In-memory contact-center API
//!
//! Keeps entities in process, records every call in order and lets callers inject faults
//! or delete entities behind the reconciler's back.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::model::*;
use super::operation as op;
use super::{ApiError, ApiResult, ConnectApi};
use crate::tags::{TagDiff, Tags};

const ARN_PREFIX: &str = "arn:aws:connect:us-east-1:123456789012:instance";

/// Injected behaviour for one operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Fail with the given error
    Error(ApiError),
    /// Succeed without a payload
    Empty,
}

type EntityKey = (String, String);
type StorageKey = (String, InstanceStorageResourceType, String);

#[derive(Default)]
struct Inner {
    sequence: u64,
    next_ids: VecDeque<String>,
    users: BTreeMap<EntityKey, User>,
    agent_statuses: BTreeMap<EntityKey, AgentStatus>,
    hierarchy_groups: BTreeMap<EntityKey, HierarchyGroup>,
    storage_configs: BTreeMap<StorageKey, StorageDestination>,
    tags: BTreeMap<String, Tags>,
    faults: BTreeMap<&'static str, Fault>,
    calls: Vec<&'static str>,
}

impl Inner {
    fn allocate(&mut self, prefix: &str) -> String {
        self.next_ids.pop_front().unwrap_or_else(|| {
            self.sequence += 1;
            format!("{}-{}", prefix, self.sequence)
        })
    }

    fn tags_of(&self, arn: Option<&String>) -> Tags {
        arn.and_then(|arn| self.tags.get(arn))
            .cloned()
            .unwrap_or_default()
    }
}

fn key(instance_id: &str, entity_id: &str) -> EntityKey {
    (instance_id.to_string(), entity_id.to_string())
}

fn arn(instance_id: &str, segment: &str, entity_id: &str) -> String {
    format!("{}/{}/{}/{}", ARN_PREFIX, instance_id, segment, entity_id)
}

fn not_found(what: &str, instance_id: &str, entity_id: &str) -> ApiError {
    ApiError::NotFound(format!("{} {} in instance {}", what, entity_id, instance_id))
}

/// [`ConnectApi`] backed by process memory
#[derive(Default)]
pub struct InMemoryConnect {
    inner: Mutex<Inner>,
}

impl InMemoryConnect {
    /// Create an empty API
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and apply any injected fault; `true` means answer without a payload
    fn begin(&self, operation: &'static str) -> ApiResult<(MutexGuard<'_, Inner>, bool)> {
        let mut inner = self.lock();
        inner.calls.push(operation);
        match inner.faults.get(operation).cloned() {
            Some(Fault::Error(error)) => Err(error),
            Some(Fault::Empty) => Ok((inner, true)),
            None => Ok((inner, false)),
        }
    }

    /// Hand out `id` for the next created entity instead of a generated one
    pub fn push_next_id(&self, id: impl Into<String>) {
        self.lock().next_ids.push_back(id.into());
    }

    /// Make every call to `operation` behave according to `fault`
    pub fn inject(&self, operation: &'static str, fault: Fault) {
        self.lock().faults.insert(operation, fault);
    }

    /// Make every call to `operation` fail with `error`
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.inject(operation, Fault::Error(error));
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `operation`
    pub fn call_count(&self, operation: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Delete an entity out of band; returns whether anything was removed
    pub fn remove_entity(&self, instance_id: &str, entity_id: &str) -> bool {
        let mut inner = self.lock();
        let key = key(instance_id, entity_id);

        let removed = inner.users.remove(&key).is_some()
            || inner.agent_statuses.remove(&key).is_some()
            || inner.hierarchy_groups.remove(&key).is_some();
        if removed {
            return true;
        }

        let before = inner.storage_configs.len();
        inner.storage_configs.retain(|(instance, _, association), _| {
            !(instance == instance_id && association == entity_id)
        });
        before != inner.storage_configs.len()
    }

    /// Overwrite the tags stored for an ARN
    pub fn set_remote_tags(&self, resource_arn: &str, tags: Tags) {
        self.lock().tags.insert(resource_arn.to_string(), tags);
    }

    /// Tags currently stored for an ARN
    pub fn remote_tags(&self, resource_arn: &str) -> Option<Tags> {
        self.lock().tags.get(resource_arn).cloned()
    }

    /// Stored user, if any
    pub fn user(&self, instance_id: &str, user_id: &str) -> Option<User> {
        self.lock().users.get(&key(instance_id, user_id)).cloned()
    }

    /// Stored agent status, if any
    pub fn agent_status(&self, instance_id: &str, agent_status_id: &str) -> Option<AgentStatus> {
        self.lock()
            .agent_statuses
            .get(&key(instance_id, agent_status_id))
            .cloned()
    }

    /// Stored storage destination, if any
    pub fn storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
    ) -> Option<StorageDestination> {
        self.lock()
            .storage_configs
            .get(&(
                instance_id.to_string(),
                resource_type,
                association_id.to_string(),
            ))
            .cloned()
    }
}

#[async_trait]
impl ConnectApi for InMemoryConnect {
    async fn create_user(&self, request: CreateUserRequest) -> ApiResult<CreateUserResponse> {
        let (mut inner, empty) = self.begin(op::CREATE_USER)?;
        if empty {
            return Ok(CreateUserResponse::default());
        }

        if inner
            .users
            .iter()
            .any(|((instance, _), user)| {
                *instance == request.instance_id
                    && user.username.as_deref() == Some(request.username.as_str())
            })
        {
            return Err(ApiError::service(
                "DuplicateResourceException",
                format!("username {} already exists", request.username),
            ));
        }

        let user_id = inner.allocate("user");
        let user_arn = arn(&request.instance_id, "agent", &user_id);

        let user = User {
            id: Some(user_id.clone()),
            arn: Some(user_arn.clone()),
            username: Some(request.username),
            directory_user_id: Some(request.directory_user_id.unwrap_or_else(|| user_id.clone())),
            hierarchy_group_id: request.hierarchy_group_id,
            identity_info: request.identity_info,
            phone_config: request.phone_config,
            routing_profile_id: Some(request.routing_profile_id),
            security_profile_ids: request.security_profile_ids,
            tags: Tags::new(),
        };

        inner
            .tags
            .insert(user_arn.clone(), request.tags.unwrap_or_default());
        inner.users.insert(key(&request.instance_id, &user_id), user);

        Ok(CreateUserResponse {
            user_id: Some(user_id),
            user_arn: Some(user_arn),
        })
    }

    async fn describe_user(&self, instance_id: &str, user_id: &str) -> ApiResult<Option<User>> {
        let (inner, empty) = self.begin(op::DESCRIBE_USER)?;
        let mut user = inner
            .users
            .get(&key(instance_id, user_id))
            .cloned()
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        if empty {
            return Ok(None);
        }

        user.tags = inner.tags_of(user.arn.as_ref());
        Ok(Some(user))
    }

    async fn update_user_hierarchy(
        &self,
        instance_id: &str,
        user_id: &str,
        hierarchy_group_id: Option<String>,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_HIERARCHY)?;
        let user = inner
            .users
            .get_mut(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        user.hierarchy_group_id = hierarchy_group_id;
        Ok(())
    }

    async fn update_user_identity_info(
        &self,
        instance_id: &str,
        user_id: &str,
        identity_info: UserIdentityInfo,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_IDENTITY_INFO)?;
        let user = inner
            .users
            .get_mut(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        user.identity_info = Some(identity_info);
        Ok(())
    }

    async fn update_user_phone_config(
        &self,
        instance_id: &str,
        user_id: &str,
        phone_config: UserPhoneConfig,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_PHONE_CONFIG)?;
        let user = inner
            .users
            .get_mut(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        user.phone_config = Some(phone_config);
        Ok(())
    }

    async fn update_user_routing_profile(
        &self,
        instance_id: &str,
        user_id: &str,
        routing_profile_id: String,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_ROUTING_PROFILE)?;
        let user = inner
            .users
            .get_mut(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        user.routing_profile_id = Some(routing_profile_id);
        Ok(())
    }

    async fn update_user_security_profiles(
        &self,
        instance_id: &str,
        user_id: &str,
        security_profile_ids: Vec<String>,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_SECURITY_PROFILES)?;
        let user = inner
            .users
            .get_mut(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        user.security_profile_ids = security_profile_ids;
        Ok(())
    }

    async fn delete_user(&self, instance_id: &str, user_id: &str) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::DELETE_USER)?;
        let user = inner
            .users
            .remove(&key(instance_id, user_id))
            .ok_or_else(|| not_found("user", instance_id, user_id))?;
        if let Some(arn) = user.arn {
            inner.tags.remove(&arn);
        }
        Ok(())
    }

    async fn create_agent_status(
        &self,
        request: CreateAgentStatusRequest,
    ) -> ApiResult<CreateAgentStatusResponse> {
        let (mut inner, empty) = self.begin(op::CREATE_AGENT_STATUS)?;
        if empty {
            return Ok(CreateAgentStatusResponse::default());
        }

        let agent_status_id = inner.allocate("status");
        let agent_status_arn = arn(&request.instance_id, "agent-state", &agent_status_id);

        let status = AgentStatus {
            agent_status_id: Some(agent_status_id.clone()),
            agent_status_arn: Some(agent_status_arn.clone()),
            name: Some(request.name),
            description: request.description,
            state: Some(request.state),
            status_type: Some(AgentStatusType::Custom),
            tags: Tags::new(),
        };

        inner
            .tags
            .insert(agent_status_arn.clone(), request.tags.unwrap_or_default());
        inner
            .agent_statuses
            .insert(key(&request.instance_id, &agent_status_id), status);

        Ok(CreateAgentStatusResponse {
            agent_status_id: Some(agent_status_id),
            agent_status_arn: Some(agent_status_arn),
        })
    }

    async fn describe_agent_status(
        &self,
        instance_id: &str,
        agent_status_id: &str,
    ) -> ApiResult<Option<AgentStatus>> {
        let (inner, empty) = self.begin(op::DESCRIBE_AGENT_STATUS)?;
        let mut status = inner
            .agent_statuses
            .get(&key(instance_id, agent_status_id))
            .cloned()
            .ok_or_else(|| not_found("agent status", instance_id, agent_status_id))?;
        if empty {
            return Ok(None);
        }

        status.tags = inner.tags_of(status.agent_status_arn.as_ref());
        Ok(Some(status))
    }

    async fn update_agent_status(&self, request: UpdateAgentStatusRequest) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_AGENT_STATUS)?;
        let status = inner
            .agent_statuses
            .get_mut(&key(&request.instance_id, &request.agent_status_id))
            .ok_or_else(|| {
                not_found("agent status", &request.instance_id, &request.agent_status_id)
            })?;

        if let Some(name) = request.name {
            status.name = Some(name);
        }
        if let Some(description) = request.description {
            status.description = (!description.is_empty()).then_some(description);
        }
        if let Some(state) = request.state {
            status.state = Some(state);
        }
        Ok(())
    }

    async fn create_user_hierarchy_group(
        &self,
        request: CreateUserHierarchyGroupRequest,
    ) -> ApiResult<CreateUserHierarchyGroupResponse> {
        let (mut inner, empty) = self.begin(op::CREATE_USER_HIERARCHY_GROUP)?;
        if empty {
            return Ok(CreateUserHierarchyGroupResponse::default());
        }

        let mut hierarchy_path = match &request.parent_group_id {
            Some(parent_id) => inner
                .hierarchy_groups
                .get(&key(&request.instance_id, parent_id))
                .map(|parent| parent.hierarchy_path.clone())
                .ok_or_else(|| {
                    ApiError::InvalidParameter(format!("unknown parent group {}", parent_id))
                })?,
            None => Vec::new(),
        };

        let hierarchy_group_id = inner.allocate("group");
        let hierarchy_group_arn = arn(&request.instance_id, "agent-group", &hierarchy_group_id);

        hierarchy_path.push(HierarchyGroupSummary {
            id: Some(hierarchy_group_id.clone()),
            name: Some(request.name.clone()),
            arn: Some(hierarchy_group_arn.clone()),
        });

        let group = HierarchyGroup {
            id: Some(hierarchy_group_id.clone()),
            arn: Some(hierarchy_group_arn.clone()),
            name: Some(request.name),
            level_id: Some(hierarchy_path.len().to_string()),
            hierarchy_path,
            tags: Tags::new(),
        };

        inner
            .tags
            .insert(hierarchy_group_arn.clone(), request.tags.unwrap_or_default());
        inner
            .hierarchy_groups
            .insert(key(&request.instance_id, &hierarchy_group_id), group);

        Ok(CreateUserHierarchyGroupResponse {
            hierarchy_group_id: Some(hierarchy_group_id),
            hierarchy_group_arn: Some(hierarchy_group_arn),
        })
    }

    async fn describe_user_hierarchy_group(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
    ) -> ApiResult<Option<HierarchyGroup>> {
        let (inner, empty) = self.begin(op::DESCRIBE_USER_HIERARCHY_GROUP)?;
        let mut group = inner
            .hierarchy_groups
            .get(&key(instance_id, hierarchy_group_id))
            .cloned()
            .ok_or_else(|| not_found("hierarchy group", instance_id, hierarchy_group_id))?;
        if empty {
            return Ok(None);
        }

        group.tags = inner.tags_of(group.arn.as_ref());
        Ok(Some(group))
    }

    async fn update_user_hierarchy_group_name(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
        name: String,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_USER_HIERARCHY_GROUP_NAME)?;
        if !inner
            .hierarchy_groups
            .contains_key(&key(instance_id, hierarchy_group_id))
        {
            return Err(not_found("hierarchy group", instance_id, hierarchy_group_id));
        }

        for ((instance, _), group) in inner.hierarchy_groups.iter_mut() {
            if instance != instance_id {
                continue;
            }
            if group.id.as_deref() == Some(hierarchy_group_id) {
                group.name = Some(name.clone());
            }
            for level in group.hierarchy_path.iter_mut() {
                if level.id.as_deref() == Some(hierarchy_group_id) {
                    level.name = Some(name.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete_user_hierarchy_group(
        &self,
        instance_id: &str,
        hierarchy_group_id: &str,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::DELETE_USER_HIERARCHY_GROUP)?;
        let group_key = key(instance_id, hierarchy_group_id);
        if !inner.hierarchy_groups.contains_key(&group_key) {
            return Err(not_found("hierarchy group", instance_id, hierarchy_group_id));
        }

        let has_children = inner.hierarchy_groups.iter().any(|((instance, id), group)| {
            instance == instance_id
                && id != hierarchy_group_id
                && group
                    .hierarchy_path
                    .iter()
                    .any(|level| level.id.as_deref() == Some(hierarchy_group_id))
        });
        if has_children {
            return Err(ApiError::service(
                "ResourceInUseException",
                format!("hierarchy group {} has child groups", hierarchy_group_id),
            ));
        }

        if let Some(arn) = inner
            .hierarchy_groups
            .remove(&group_key)
            .and_then(|group| group.arn)
        {
            inner.tags.remove(&arn);
        }
        Ok(())
    }

    async fn associate_instance_storage_config(
        &self,
        request: AssociateInstanceStorageConfigRequest,
    ) -> ApiResult<AssociateInstanceStorageConfigResponse> {
        let (mut inner, empty) = self.begin(op::ASSOCIATE_INSTANCE_STORAGE_CONFIG)?;
        if empty {
            return Ok(AssociateInstanceStorageConfigResponse::default());
        }

        let association_id = inner.allocate("assoc");
        inner.storage_configs.insert(
            (
                request.instance_id,
                request.resource_type,
                association_id.clone(),
            ),
            request.storage_config,
        );

        Ok(AssociateInstanceStorageConfigResponse {
            association_id: Some(association_id),
        })
    }

    async fn describe_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
    ) -> ApiResult<Option<InstanceStorageConfig>> {
        let (inner, empty) = self.begin(op::DESCRIBE_INSTANCE_STORAGE_CONFIG)?;
        let destination = inner
            .storage_configs
            .get(&(
                instance_id.to_string(),
                resource_type,
                association_id.to_string(),
            ))
            .cloned()
            .ok_or_else(|| not_found("storage association", instance_id, association_id))?;
        if empty {
            return Ok(None);
        }

        Ok(Some(InstanceStorageConfig {
            association_id: Some(association_id.to_string()),
            destination,
        }))
    }

    async fn update_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
        storage_config: StorageDestination,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_INSTANCE_STORAGE_CONFIG)?;
        let destination = inner
            .storage_configs
            .get_mut(&(
                instance_id.to_string(),
                resource_type,
                association_id.to_string(),
            ))
            .ok_or_else(|| not_found("storage association", instance_id, association_id))?;
        *destination = storage_config;
        Ok(())
    }

    async fn disassociate_instance_storage_config(
        &self,
        instance_id: &str,
        resource_type: InstanceStorageResourceType,
        association_id: &str,
    ) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::DISASSOCIATE_INSTANCE_STORAGE_CONFIG)?;
        inner
            .storage_configs
            .remove(&(
                instance_id.to_string(),
                resource_type,
                association_id.to_string(),
            ))
            .map(|_| ())
            .ok_or_else(|| not_found("storage association", instance_id, association_id))
    }

    async fn update_tags(&self, resource_arn: &str, diff: &TagDiff) -> ApiResult<()> {
        let (mut inner, _) = self.begin(op::UPDATE_TAGS)?;
        let tags = inner
            .tags
            .get_mut(resource_arn)
            .ok_or_else(|| ApiError::NotFound(format!("resource {}", resource_arn)))?;

        for key in &diff.removed {
            tags.remove(key);
        }
        tags.extend(diff.upserted.clone());
        Ok(())
    }
}
