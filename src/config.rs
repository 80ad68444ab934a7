//! Provider configuration
//!
//! Process-wide settings shared by every resource operation, loaded from YAML:
//!
//! ```yaml
//! default_tags:
//!   tags:
//!     team: contact-center
//! ignore_tags:
//!   keys: [LastScanned]
//!   key_prefixes: ["kubernetes.io/"]
//! ```

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tags::{is_internal, IgnoreTags, TagPolicy, Tags};

/// Root provider configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Tags applied to every tagged resource
    #[serde(default)]
    pub default_tags: DefaultTags,

    /// Tags excluded from local state
    #[serde(default)]
    pub ignore_tags: IgnoreTags,
}

/// Default tags block
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DefaultTags {
    #[serde(default)]
    pub tags: Tags,
}

impl ProviderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject default tags the remote service would refuse
    pub fn validate(&self) -> Result<()> {
        for key in self.default_tags.tags.keys() {
            if key.is_empty() {
                return Err(Error::config("Default tag keys must not be empty"));
            }
            if is_internal(key) {
                return Err(Error::config(format!(
                    "Default tag '{}' uses a reserved prefix",
                    key
                )));
            }
        }

        if self.ignore_tags.key_prefixes.iter().any(|p| p.is_empty()) {
            return Err(Error::config(
                "Ignore key prefixes must not be empty; an empty prefix ignores every tag",
            ));
        }

        Ok(())
    }

    /// Tag policy handed to every operation
    pub fn tag_policy(&self) -> TagPolicy {
        TagPolicy::new(self.default_tags.tags.clone(), self.ignore_tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"
default_tags:
  tags:
    team: contact-center
    env: prod
ignore_tags:
  keys: [LastScanned]
  key_prefixes: ["kubernetes.io/"]
"#;

    #[test]
    fn test_parse_sample() {
        let config = ProviderConfig::from_yaml(SAMPLE).unwrap();

        assert_eq!(config.default_tags.tags.len(), 2);
        assert!(config.ignore_tags.matches("LastScanned"));
        assert!(config.ignore_tags.matches("kubernetes.io/cluster"));
        assert!(!config.ignore_tags.matches("team"));

        let policy = config.tag_policy();
        assert_eq!(
            policy.default_tags().get("team").map(String::as_str),
            Some("contact-center")
        );
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ProviderConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert!(config.tag_policy().default_tags().is_empty());
    }

    #[test]
    fn test_rejects_reserved_default_tag() {
        let yaml = "default_tags:\n  tags:\n    \"aws:owner\": me\n";
        let err = ProviderConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = ProviderConfig::from_yaml("region: us-east-1\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = ProviderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ignore_tags.keys.len(), 1);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProviderConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
