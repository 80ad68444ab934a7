//! User resource

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::client::model::PhoneType;
use crate::tags::Tags;

/// Declared user configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UserSpec {
    /// Owning instance
    pub instance_id: String,

    /// Login name
    pub username: String,

    /// Initial password; sent on create only and never read back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Identifier of the user in the directory, when directory-backed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_user_id: Option<String>,

    /// Hierarchy group the user belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_group_id: Option<String>,

    /// Name and email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_info: Option<IdentityInfo>,

    /// Phone settings
    pub phone_config: PhoneConfig,

    /// Routing profile
    pub routing_profile_id: String,

    /// Security profiles (1 to 500)
    pub security_profile_ids: BTreeSet<String>,

    /// Resource tags
    #[serde(default)]
    pub tags: Tags,
}

/// Identity information block
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IdentityInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl IdentityInfo {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }
}

/// Phone configuration block
///
/// `phone_type` is required in declared configuration; it stays optional here so that a
/// flattened response lacking it is represented faithfully.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PhoneConfig {
    /// SOFT_PHONE or DESK_PHONE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<PhoneType>,

    /// Accept incoming contacts automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_accept: Option<bool>,

    /// After-contact work time limit in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_contact_work_time_limit: Option<i64>,

    /// Desk phone number, required for DESK_PHONE
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk_phone_number: Option<String>,
}

/// Flattened user attributes
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAttributes {
    pub arn: String,
    pub user_id: String,
    pub instance_id: String,
    pub username: String,
    pub directory_user_id: Option<String>,
    pub hierarchy_group_id: Option<String>,
    pub identity_info: Option<IdentityInfo>,
    pub phone_config: Option<PhoneConfig>,
    pub routing_profile_id: String,
    pub security_profile_ids: BTreeSet<String>,
    pub tags: Tags,
    pub tags_all: Tags,
}
