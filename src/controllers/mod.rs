//! Lifecycle controllers for contact-center resources
//!
//! [`Context`] carries the remote client, the provider tag policy and a cancellation token
//! into every operation. [`ResourceKind`] ties one resource type's reconciler to the generic
//! lifecycle driver in [`lifecycle`].

mod agent_status_controller;
mod hierarchy_group_controller;
pub mod lifecycle;
mod storage_association_controller;
mod user_controller;

pub use agent_status_controller::AgentStatuses;
pub use hierarchy_group_controller::HierarchyGroups;
pub use lifecycle::Plan;
pub use storage_association_controller::StorageAssociations;
pub use user_controller::Users;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{ApiError, ApiResult, ConnectApi};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::metrics;
use crate::reconcilers::ReadMode;
use crate::resources::Record;
use crate::tags::{TagPolicy, Tags};

/// Shared context for all operations
pub struct Context {
    /// Remote API client
    pub client: Arc<dyn ConnectApi>,
    /// Provider tag policy
    pub tags: TagPolicy,
    cancel: CancellationToken,
}

impl Context {
    /// Create a new context
    pub fn new(client: Arc<dyn ConnectApi>, tags: TagPolicy) -> Self {
        Self {
            client,
            tags,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a context from provider configuration
    pub fn from_config(client: Arc<dyn ConnectApi>, config: &ProviderConfig) -> Self {
        Self::new(client, config.tag_policy())
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token aborting every remote call made through this context
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Issue a remote call
    pub async fn call<T, F>(&self, target: &Target, request: F) -> Result<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        self.invoke(target, request)
            .await?
            .map_err(|e| target.failed(e))
    }

    /// Issue a remote call, mapping not-found to `None`
    pub async fn call_optional<T, F>(&self, target: &Target, request: F) -> Result<Option<T>>
    where
        F: Future<Output = ApiResult<T>>,
    {
        match self.invoke(target, request).await? {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(target.failed(e)),
        }
    }

    /// Issue a describe call; `None` means not found, an empty payload is an error
    pub async fn describe<T, F>(&self, target: &Target, request: F) -> Result<Option<T>>
    where
        F: Future<Output = ApiResult<Option<T>>>,
    {
        match self.call_optional(target, request).await? {
            Some(Some(payload)) => Ok(Some(payload)),
            Some(None) => Err(target.failed(ApiError::EmptyResponse)),
            None => Ok(None),
        }
    }

    async fn invoke<T, F>(&self, target: &Target, request: F) -> Result<ApiResult<T>>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(target.cancelled());
        }

        metrics::REMOTE_CALLS
            .with_label_values(&[target.kind, target.operation])
            .inc();
        debug!(
            kind = target.kind,
            operation = target.operation,
            target = %target.subject,
            "Calling remote API"
        );

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(target.cancelled()),
            result = request => Ok(result),
        }
    }
}

/// What a remote call is about, for errors, logs and metrics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub kind: &'static str,
    pub operation: &'static str,
    /// Composite identifier, or the declared name before one exists
    pub subject: String,
}

impl Target {
    pub fn new(kind: &'static str, operation: &'static str, subject: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            subject: subject.into(),
        }
    }

    /// Wrap a remote error
    pub fn failed(&self, source: ApiError) -> Error {
        Error::remote(self.kind, self.operation, self.subject.clone(), source)
    }

    /// Error for a call aborted by cancellation
    pub fn cancelled(&self) -> Error {
        Error::Cancelled {
            kind: self.kind,
            operation: self.operation,
            target: self.subject.clone(),
        }
    }
}

/// How a resource type is removed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Delete through the remote API
    Remote,
    /// The remote API has no delete; records are dropped and the entity is retained
    Unsupported,
}

/// One resource type as seen by the lifecycle driver
pub trait ResourceKind {
    /// Kind label used in logs and metrics
    const KIND: &'static str;

    const DELETE_POLICY: DeletePolicy;

    /// Declared configuration
    type Spec: Send + Sync;

    /// Flattened attributes kept in local state
    type Attributes: Send + Sync;

    fn validate(spec: &Self::Spec) -> Result<()>;

    /// Tags the declared configuration asks for explicitly
    fn declared_tags(spec: &Self::Spec) -> Tags;

    /// Declared-comparable tags held in state
    fn state_tags(attributes: &Self::Attributes) -> Tags;

    /// Attributes whose change needs delete-then-create
    fn requires_replacement(prior: &Self::Attributes, declared: &Self::Spec) -> Vec<&'static str>;

    /// Attribute groups an update would send, in dispatch order
    fn pending_changes(
        prior: &Self::Attributes,
        declared: &Self::Spec,
        tags: &TagPolicy,
    ) -> Vec<&'static str>;

    fn create(
        ctx: &Context,
        spec: &Self::Spec,
    ) -> impl Future<Output = Result<Record<Self::Attributes>>> + Send;

    fn read(
        ctx: &Context,
        id: &str,
        mode: ReadMode,
        declared_tags: &Tags,
    ) -> impl Future<Output = Result<Option<Record<Self::Attributes>>>> + Send;

    fn update(
        ctx: &Context,
        record: &Record<Self::Attributes>,
        spec: &Self::Spec,
    ) -> impl Future<Output = Result<Option<Record<Self::Attributes>>>> + Send;

    fn delete(ctx: &Context, id: &str) -> impl Future<Output = Result<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{operation as op, InMemoryConnect};

    fn context(api: Arc<InMemoryConnect>) -> Context {
        Context::new(api, TagPolicy::default())
    }

    #[tokio::test]
    async fn test_describe_maps_outcomes() {
        let api = Arc::new(InMemoryConnect::new());
        let ctx = context(api.clone());
        let target = Target::new("User", op::DESCRIBE_USER, "i-1:u-1");

        let missing = ctx
            .describe(&target, ctx.client.describe_user("i-1", "u-1"))
            .await
            .unwrap();
        assert!(missing.is_none());

        api.fail(op::DESCRIBE_USER, ApiError::service("ThrottlingException", "slow"));
        let err = ctx
            .describe(&target, ctx.client.describe_user("i-1", "u-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteOperationFailed { operation: "DescribeUser", .. }));
    }

    #[tokio::test]
    async fn test_cancelled_context_makes_no_call() {
        let api = Arc::new(InMemoryConnect::new());
        let ctx = context(api.clone());
        ctx.cancellation_token().cancel();

        let target = Target::new("User", op::DELETE_USER, "i-1:u-1");
        let err = ctx
            .call(&target, ctx.client.delete_user("i-1", "u-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_call_optional_swallows_not_found_only() {
        let api = Arc::new(InMemoryConnect::new());
        let ctx = context(api.clone());
        let target = Target::new("User", op::DELETE_USER, "i-1:u-1");

        let gone = ctx
            .call_optional(&target, ctx.client.delete_user("i-1", "u-1"))
            .await
            .unwrap();
        assert!(gone.is_none());
        assert_eq!(api.call_count(op::DELETE_USER), 1);
    }

    #[tokio::test]
    async fn test_external_token_cancels_calls() {
        let api = Arc::new(InMemoryConnect::new());
        let config =
            ProviderConfig::from_yaml("default_tags:\n  tags:\n    team: cc\n").unwrap();
        let parent = CancellationToken::new();
        let ctx =
            Context::from_config(api.clone(), &config).with_cancellation(parent.child_token());
        assert_eq!(
            ctx.tags.default_tags().get("team").map(String::as_str),
            Some("cc")
        );

        parent.cancel();
        let target = Target::new("User", op::DESCRIBE_USER, "i-1:u-1");
        let err = ctx
            .describe(&target, ctx.client.describe_user("i-1", "u-1"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert!(api.calls().is_empty());
    }
}
