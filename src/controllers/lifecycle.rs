//! Generic lifecycle driver
//!
//! Turns a prior record plus declared configuration into create, update, replace or no-op,
//! and wraps every entry point with the reconciliation metrics.

use std::future::Future;

use tracing::{error, info, instrument, warn};

use crate::client::ApiError;
use crate::controllers::{Context, DeletePolicy, ResourceKind, Target};
use crate::error::{Error, Result};
use crate::metrics;
use crate::reconcilers::ReadMode;
use crate::resources::Record;
use crate::tags::Tags;

/// What `apply` will do for a resource
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Plan {
    /// No usable record; create the entity
    Create,
    /// Delete then create, for the listed attributes
    Replace(Vec<&'static str>),
    /// Update the listed attribute groups in place
    Update(Vec<&'static str>),
    /// State already matches
    NoOp,
}

/// Plan against the current (refreshed) record
pub fn plan<K: ResourceKind>(
    ctx: &Context,
    current: Option<&Record<K::Attributes>>,
    declared: &K::Spec,
) -> Plan {
    let Some(record) = current else {
        return Plan::Create;
    };

    let reasons = K::requires_replacement(&record.attributes, declared);
    if !reasons.is_empty() {
        return Plan::Replace(reasons);
    }

    let changes = K::pending_changes(&record.attributes, declared, &ctx.tags);
    if changes.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update(changes)
    }
}

/// Converge the remote entity on the declared configuration
///
/// A prior record is refreshed first; if its entity has disappeared it is recreated.
#[instrument(skip_all, fields(kind = K::KIND))]
pub async fn apply<K: ResourceKind>(
    ctx: &Context,
    prior: Option<&Record<K::Attributes>>,
    declared: &K::Spec,
) -> Result<Record<K::Attributes>> {
    observed(K::KIND, "apply", async {
        K::validate(declared)?;

        let declared_tags = K::declared_tags(declared);
        let current = match prior {
            Some(record) => K::read(ctx, &record.id, ReadMode::Refresh, &declared_tags).await?,
            None => None,
        };

        match (plan::<K>(ctx, current.as_ref(), declared), current) {
            (Plan::NoOp, Some(record)) => {
                info!(id = %record.id, "Up to date");
                Ok(record)
            }
            (Plan::Update(changes), Some(record)) => {
                info!(id = %record.id, changes = ?changes, "Updating");
                K::update(ctx, &record, declared)
                    .await?
                    .ok_or_else(|| vanished(K::KIND, &record.id))
            }
            (Plan::Replace(reasons), Some(record)) => {
                info!(id = %record.id, reasons = ?reasons, "Replacing");
                remove::<K>(ctx, &record.id).await?;
                K::create(ctx, declared).await
            }
            (_, _) => {
                info!("Creating");
                K::create(ctx, declared).await
            }
        }
    })
    .await
}

/// Re-read a stored record; `None` means the entity is gone and the record should be dropped
#[instrument(skip_all, fields(kind = K::KIND, id = %record.id))]
pub async fn refresh<K: ResourceKind>(
    ctx: &Context,
    record: &Record<K::Attributes>,
) -> Result<Option<Record<K::Attributes>>> {
    observed(K::KIND, "refresh", async {
        let declared_tags = K::state_tags(&record.attributes);
        K::read(ctx, &record.id, ReadMode::Refresh, &declared_tags).await
    })
    .await
}

/// Remove the entity behind a record
#[instrument(skip_all, fields(kind = K::KIND, id = %record.id))]
pub async fn destroy<K: ResourceKind>(ctx: &Context, record: &Record<K::Attributes>) -> Result<()> {
    observed(K::KIND, "destroy", remove::<K>(ctx, &record.id)).await
}

/// Adopt an existing entity by composite identifier
#[instrument(skip_all, fields(kind = K::KIND, id = %id))]
pub async fn import<K: ResourceKind>(ctx: &Context, id: &str) -> Result<Record<K::Attributes>> {
    observed(K::KIND, "import", async {
        let record = K::read(ctx, id, ReadMode::Imported, &Tags::new())
            .await?
            .ok_or_else(|| vanished(K::KIND, id))?;
        info!(id = %id, "Imported");
        Ok(record)
    })
    .await
}

async fn remove<K: ResourceKind>(ctx: &Context, id: &str) -> Result<()> {
    K::delete(ctx, id).await?;
    match K::DELETE_POLICY {
        DeletePolicy::Remote => {}
        DeletePolicy::Unsupported => {
            warn!(id = %id, "Record dropped; the remote entity is retained");
        }
    }
    Ok(())
}

fn vanished(kind: &'static str, id: &str) -> Error {
    Target::new(kind, "Read", id).failed(ApiError::NotFound(id.to_string()))
}

async fn observed<T>(
    kind: &'static str,
    operation: &'static str,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    let _timer = metrics::RECONCILE_DURATION
        .with_label_values(&[kind, operation])
        .start_timer();
    metrics::RECONCILIATIONS
        .with_label_values(&[kind, operation])
        .inc();

    let result = work.await;
    if let Err(e) = &result {
        error!(kind, operation, error = %e, "Reconciliation failed");
        metrics::RECONCILIATION_ERRORS
            .with_label_values(&[kind, operation])
            .inc();
    }
    result
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::InMemoryConnect;
    use crate::controllers::HierarchyGroups;
    use crate::resources::{HierarchyGroupAttributes, HierarchyGroupSpec};
    use crate::tags::TagPolicy;

    fn context() -> Context {
        Context::new(Arc::new(InMemoryConnect::new()), TagPolicy::default())
    }

    fn spec(name: &str, parent: Option<&str>) -> HierarchyGroupSpec {
        HierarchyGroupSpec {
            instance_id: "i-1".to_string(),
            name: name.to_string(),
            parent_group_id: parent.map(str::to_string),
            tags: Tags::new(),
        }
    }

    fn record() -> Record<HierarchyGroupAttributes> {
        Record::new(
            "i-1:hg-1",
            HierarchyGroupAttributes {
                hierarchy_group_id: "hg-1".to_string(),
                instance_id: "i-1".to_string(),
                name: "Sales".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_plan_variants() {
        let ctx = context();
        let record = record();

        assert_eq!(plan::<HierarchyGroups>(&ctx, None, &spec("Sales", None)), Plan::Create);
        assert_eq!(
            plan::<HierarchyGroups>(&ctx, Some(&record), &spec("Sales", None)),
            Plan::NoOp
        );
        assert_eq!(
            plan::<HierarchyGroups>(&ctx, Some(&record), &spec("Support", None)),
            Plan::Update(vec!["name"])
        );
        assert_eq!(
            plan::<HierarchyGroups>(&ctx, Some(&record), &spec("Support", Some("hg-0"))),
            Plan::Replace(vec!["parent_group_id"])
        );
    }

    #[test]
    fn test_replacement_wins_over_update() {
        let ctx = context();
        let mut declared = spec("Support", None);
        declared.instance_id = "i-2".to_string();

        assert_eq!(
            plan::<HierarchyGroups>(&ctx, Some(&record()), &declared),
            Plan::Replace(vec!["instance_id"])
        );
    }
}
