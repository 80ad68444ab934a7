//! Tag policy
//!
//! Provider-wide default tags are merged into every tagged create and update, and keys
//! matched by the ignore configuration never reach local state. Reads produce two views of
//! the remote tag set: `tags` for comparison with declared configuration and `tags_all`
//! for the full effective set.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tag map keyed by tag name
pub type Tags = BTreeMap<String, String>;

/// Prefix of tags owned by the remote platform itself
pub const INTERNAL_TAG_PREFIX: &str = "aws:";

/// Whether a tag key belongs to the remote platform
pub fn is_internal(key: &str) -> bool {
    key.starts_with(INTERNAL_TAG_PREFIX)
}

/// Tags excluded from local state
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct IgnoreTags {
    /// Exact keys to ignore
    #[serde(default)]
    pub keys: BTreeSet<String>,

    /// Key prefixes to ignore
    #[serde(default)]
    pub key_prefixes: Vec<String>,
}

impl IgnoreTags {
    /// Whether a key is ignored
    pub fn matches(&self, key: &str) -> bool {
        self.keys.contains(key)
            || self
                .key_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

/// Both read-side views of a remote tag set
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagViews {
    /// Tags comparable with declared configuration
    pub tags: Tags,
    /// Every effective tag, defaults included
    pub tags_all: Tags,
}

/// Keys to remove and pairs to add or change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub removed: Vec<String>,
    pub upserted: Tags,
}

impl TagDiff {
    /// Compute the change set turning `old` into `new`
    pub fn between(old: &Tags, new: &Tags) -> Self {
        let removed = old
            .keys()
            .filter(|key| !new.contains_key(*key))
            .cloned()
            .collect();

        let upserted = new
            .iter()
            .filter(|(key, value)| old.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self { removed, upserted }
    }

    /// Whether nothing changes
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.upserted.is_empty()
    }
}

/// Provider-wide tag configuration, passed explicitly to every operation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagPolicy {
    default_tags: Tags,
    ignore: IgnoreTags,
}

impl TagPolicy {
    /// Create a policy
    pub fn new(default_tags: Tags, ignore: IgnoreTags) -> Self {
        Self {
            default_tags,
            ignore,
        }
    }

    /// Provider default tags
    pub fn default_tags(&self) -> &Tags {
        &self.default_tags
    }

    /// Ignore configuration
    pub fn ignore(&self) -> &IgnoreTags {
        &self.ignore
    }

    /// Defaults overlaid with declared tags; declared values win on key collision
    pub fn merge(&self, declared: &Tags) -> Tags {
        let mut merged = self.default_tags.clone();
        merged.extend(declared.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Tags to send with a create request, `None` when there are none
    pub fn request_tags(&self, declared: &Tags) -> Option<Tags> {
        let tags: Tags = self
            .merge(declared)
            .into_iter()
            .filter(|(key, _)| !is_internal(key))
            .collect();

        (!tags.is_empty()).then_some(tags)
    }

    /// The `tags_all` view the declared configuration asks for
    pub fn desired_all(&self, declared: &Tags) -> Tags {
        self.merge(declared)
            .into_iter()
            .filter(|(key, _)| !is_internal(key) && !self.ignore.matches(key))
            .collect()
    }

    /// Split remote tags into the declared-comparable and full views
    ///
    /// A default tag is left out of `tags` when the remote value equals the default and the
    /// key was not declared explicitly.
    pub fn views(&self, remote: &Tags, declared: &Tags) -> TagViews {
        let tags_all: Tags = remote
            .iter()
            .filter(|(key, _)| !is_internal(key) && !self.ignore.matches(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let tags = tags_all
            .iter()
            .filter(|(key, value)| {
                declared.contains_key(*key) || self.default_tags.get(*key) != Some(*value)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        TagViews { tags, tags_all }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn policy() -> TagPolicy {
        TagPolicy::new(
            tags(&[("Team", "contact-center"), ("Env", "prod")]),
            IgnoreTags {
                keys: ["LastScanned".to_string()].into_iter().collect(),
                key_prefixes: vec!["kubernetes.io/".to_string()],
            },
        )
    }

    #[test]
    fn test_merge_prefers_declared_values() {
        let merged = policy().merge(&tags(&[("Env", "staging"), ("Owner", "ops")]));
        assert_eq!(
            merged,
            tags(&[("Env", "staging"), ("Owner", "ops"), ("Team", "contact-center")])
        );
    }

    #[test]
    fn test_request_tags_strip_internal_keys() {
        let policy = TagPolicy::default();
        assert_eq!(policy.request_tags(&Tags::new()), None);
        assert_eq!(
            policy.request_tags(&tags(&[("aws:cloudformation:stack", "x")])),
            None
        );
    }

    #[test]
    fn test_views_hide_defaults_unless_declared() {
        let remote = tags(&[
            ("Team", "contact-center"),
            ("Env", "prod"),
            ("Owner", "ops"),
            ("aws:createdBy", "system"),
            ("LastScanned", "yesterday"),
            ("kubernetes.io/cluster", "main"),
        ]);

        let views = policy().views(&remote, &tags(&[("Owner", "ops"), ("Env", "prod")]));

        assert_eq!(views.tags, tags(&[("Env", "prod"), ("Owner", "ops")]));
        assert_eq!(
            views.tags_all,
            tags(&[("Env", "prod"), ("Owner", "ops"), ("Team", "contact-center")])
        );
    }

    #[test]
    fn test_views_keep_overridden_default() {
        let remote = tags(&[("Team", "billing")]);
        let views = policy().views(&remote, &Tags::new());
        assert_eq!(views.tags, tags(&[("Team", "billing")]));
    }

    #[test]
    fn test_diff_between_tag_sets() {
        let old = tags(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let new = tags(&[("a", "1"), ("b", "20"), ("d", "4")]);

        let diff = TagDiff::between(&old, &new);

        assert_eq!(diff.removed, vec!["c".to_string()]);
        assert_eq!(diff.upserted, tags(&[("b", "20"), ("d", "4")]));
        assert!(TagDiff::between(&new, &new).is_empty());
    }
}
