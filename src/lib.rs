//! Connect resource reconciler
//!
//! Declarative create/read/update/delete reconciliation for contact-center users, agent
//! statuses, user hierarchy groups and instance storage-config associations, driven through
//! the [`client::ConnectApi`] trait.

pub mod adapters;
pub mod client;
pub mod config;
pub mod controllers;
pub mod error;
pub mod id;
pub mod metrics;
pub mod reconcilers;
pub mod resources;
pub mod tags;
pub mod telemetry;

pub use error::{Error, Result};
