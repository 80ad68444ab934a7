//! Reconcilers for contact-center resources
//!
//! Each submodule holds the operations for one resource type:
//! - `validate` rejects declared configuration before any remote call
//! - `create`, `read`, `update` and `delete` drive the remote API
//! - `pending_changes` and `requires_replacement` compare declared configuration to state

pub mod agent_status;
pub mod hierarchy_group;
pub mod storage_association;
pub mod user;

use tracing::warn;

use crate::client::ApiError;
use crate::controllers::Target;
use crate::error::{Error, Result};
use crate::id::SEPARATOR;
use crate::metrics;

/// Why a record is being read
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Right after this operation created the entity; it must exist
    Created,
    /// Adopting an entity by identifier; it must exist
    Imported,
    /// Re-reading a stored record; a missing entity clears the record
    Refresh,
}

/// Resolve a describe call that found no entity
pub(crate) fn entity_missing<T>(target: &Target, mode: ReadMode) -> Result<Option<T>> {
    match mode {
        ReadMode::Refresh => {
            warn!(
                kind = target.kind,
                id = %target.subject,
                "Remote entity not found, removing from state"
            );
            metrics::DRIFT_REMOVALS
                .with_label_values(&[target.kind])
                .inc();
            Ok(None)
        }
        ReadMode::Created | ReadMode::Imported => {
            Err(target.failed(ApiError::NotFound(target.subject.clone())))
        }
    }
}

/// Remote id from a create response; absent or empty ids fail the create
pub(crate) fn created_id(target: &Target, id: Option<String>) -> Result<String> {
    id.filter(|id| !id.is_empty())
        .ok_or_else(|| target.failed(ApiError::EmptyResponse))
}

/// Attribute groups already applied during a field-level update
///
/// Updates stop at the first failing call without rolling back earlier ones, so a failure
/// is logged together with whatever already went through.
pub(crate) struct UpdateProgress<'a> {
    kind: &'static str,
    id: &'a str,
    applied: Vec<&'static str>,
}

impl<'a> UpdateProgress<'a> {
    pub(crate) fn new(kind: &'static str, id: &'a str) -> Self {
        Self {
            kind,
            id,
            applied: Vec::new(),
        }
    }

    pub(crate) fn applied(&mut self, attribute: &'static str) {
        self.applied.push(attribute);
    }

    /// Log a failed update step and hand the error back
    pub(crate) fn failed(&self, error: Error) -> Error {
        if !self.applied.is_empty() {
            warn!(
                kind = self.kind,
                id = %self.id,
                applied = ?self.applied,
                error = %error,
                "Update failed after some fields were applied"
            );
        }
        error
    }
}

/// Validate an instance id used as the first identifier component
pub fn validate_instance_id(instance_id: &str) -> Result<()> {
    if instance_id.is_empty() {
        return Err(Error::validation("instance_id must not be empty"));
    }
    if instance_id.contains(SEPARATOR) {
        return Err(Error::validation(format!(
            "instance_id '{}' must not contain '{}'",
            instance_id, SEPARATOR
        )));
    }
    Ok(())
}

/// Validate a string's length in characters
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(Error::validation(format!(
            "{} must be between {} and {} characters, got {}",
            field, min, max, len
        )));
    }
    Ok(())
}

/// Normalize an optional string so that empty means absent
pub(crate) fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_rules() {
        assert!(validate_instance_id("i-1").is_ok());
        assert!(validate_instance_id("").is_err());
        assert!(validate_instance_id("i:1").is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(validate_length("name", "é", 1, 1).is_ok());
        assert!(validate_length("name", "", 1, 127).is_err());

        let long = "x".repeat(128);
        let err = validate_length("name", &long, 1, 127).unwrap_err();
        assert!(err.to_string().contains("got 128"));
    }

    #[test]
    fn test_missing_entity_by_mode() {
        let target = Target::new("User", "DescribeUser", "i-1:u-1");

        let cleared: Option<()> = entity_missing(&target, ReadMode::Refresh).unwrap();
        assert!(cleared.is_none());

        for mode in [ReadMode::Created, ReadMode::Imported] {
            let err = entity_missing::<()>(&target, mode).unwrap_err();
            assert!(matches!(err, Error::RemoteOperationFailed { .. }));
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn test_created_id_requires_value() {
        let target = Target::new("User", "CreateUser", "jdoe");
        assert_eq!(created_id(&target, Some("u-1".to_string())).unwrap(), "u-1");
        assert!(created_id(&target, Some(String::new())).is_err());
        assert!(created_id(&target, None).is_err());
    }
}
