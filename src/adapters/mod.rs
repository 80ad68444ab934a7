//! Adapters between declared configuration and the remote API model
//!
//! `build_*` and `expand_*` turn declared specs into requests, `flatten_*` turn responses
//! into local attributes. Absent blocks stay `None` in both directions and empty strings
//! inside blocks are never sent.

mod agent_status;
mod hierarchy_group;
mod storage_config;
mod user;

pub use agent_status::*;
pub use hierarchy_group::*;
pub use storage_config::*;
pub use user::*;

/// `Some` only for a non-empty string
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
