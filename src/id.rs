//! Composite identifiers
//!
//! Every record in local state is keyed by a string joining the owning instance id with one
//! or two entity ids, e.g. `i-1:hg-42` or `i-1:CALL_RECORDINGS:assoc-7`. Stored identifiers
//! are persisted verbatim by the orchestration tool, so the separator and the part counts
//! below must never change.
//!
//! Decoding splits on every separator and requires the exact part count of the layout, so
//! no component may contain `:`. Remote ids never do; instance ids are checked during
//! validation.

use crate::error::{Error, Result};

/// Component separator
pub const SEPARATOR: char = ':';

/// Named component layout of one resource type's identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdLayout {
    parts: &'static [&'static str],
}

/// `instance_id:user_id`
pub const USER_ID: IdLayout = IdLayout::new(&["instance_id", "user_id"]);

/// `instance_id:agent_status_id`
pub const AGENT_STATUS_ID: IdLayout = IdLayout::new(&["instance_id", "agent_status_id"]);

/// `instance_id:hierarchy_group_id`
pub const HIERARCHY_GROUP_ID: IdLayout = IdLayout::new(&["instance_id", "hierarchy_group_id"]);

/// `instance_id:resource_type:association_id`
pub const STORAGE_ASSOCIATION_ID: IdLayout =
    IdLayout::new(&["instance_id", "resource_type", "association_id"]);

impl IdLayout {
    /// Create a layout from its component names
    pub const fn new(parts: &'static [&'static str]) -> Self {
        Self { parts }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false; layouts have two or three components
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Human-readable form, e.g. `instance_id:user_id`
    pub fn describe(&self) -> String {
        self.parts.join(&SEPARATOR.to_string())
    }

    /// Join components into an identifier
    pub fn encode<S: AsRef<str>>(&self, components: &[S]) -> String {
        debug_assert_eq!(components.len(), self.len());
        encode(components)
    }

    /// Split an identifier into its components
    pub fn decode<'a>(&self, id: &'a str) -> Result<Vec<&'a str>> {
        decode(id, self.len()).map_err(|_| self.malformed(id))
    }

    /// Decode a two-part identifier
    pub fn decode_pair<'a>(&self, id: &'a str) -> Result<(&'a str, &'a str)> {
        match self.decode(id)?.as_slice() {
            [first, second] => Ok((*first, *second)),
            _ => Err(self.malformed(id)),
        }
    }

    /// Decode a three-part identifier
    pub fn decode_triple<'a>(&self, id: &'a str) -> Result<(&'a str, &'a str, &'a str)> {
        match self.decode(id)?.as_slice() {
            [first, second, third] => Ok((*first, *second, *third)),
            _ => Err(self.malformed(id)),
        }
    }

    fn malformed(&self, id: &str) -> Error {
        Error::MalformedIdentifier {
            id: id.to_string(),
            expected: self.describe(),
        }
    }
}

/// Join components with [`SEPARATOR`]
///
/// Components are not validated; callers pass ids they just received from the remote API.
pub fn encode<S: AsRef<str>>(components: &[S]) -> String {
    components
        .iter()
        .map(|component| component.as_ref())
        .collect::<Vec<&str>>()
        .join(&SEPARATOR.to_string())
}

/// Split `id` into exactly `expected_parts` non-empty components
pub fn decode(id: &str, expected_parts: usize) -> Result<Vec<&str>> {
    let parts: Vec<&str> = id.split(SEPARATOR).collect();

    if parts.len() != expected_parts || parts.iter().any(|part| part.is_empty()) {
        return Err(Error::MalformedIdentifier {
            id: id.to_string(),
            expected: format!(
                "{} non-empty components separated by '{}'",
                expected_parts, SEPARATOR
            ),
        });
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_round_trip_two_and_three_parts() {
        let pair = ["i-1", "hg-42"];
        assert_eq!(decode(&encode(&pair), 2).unwrap(), pair);

        let triple = ["i-1", "CALL_RECORDINGS", "assoc-7"];
        assert_eq!(decode(&encode(&triple), 3).unwrap(), triple);
    }

    #[test]
    fn test_round_trip_varied_components() {
        let cases: &[&[&str]] = &[
            &["instance-abc", "user_123"],
            &["x", "y"],
            &["a b", "c/d"],
            &["8f14e45f-ceea-467f-a0e6-2d6e4a3c9b10", "as-0001"],
            &["çà", "日本"],
            &["i-1", "AGENT_EVENTS", "assoc-9"],
            &["x", "y", "z"],
            &["arn/bucket", "CONTACT_TRACE_RECORDS", "a.b-c_d"],
        ];

        for components in cases.iter().copied() {
            let id = encode(components);
            assert_eq!(decode(&id, components.len()).unwrap(), components, "{}", id);
        }

        let encoded = USER_ID.encode(&["i 1", "u/2"]);
        let (instance, user) = USER_ID.decode_pair(&encoded).unwrap();
        assert_eq!((instance, user), ("i 1", "u/2"));
    }

    proptest! {
        #[test]
        fn test_round_trip_generated_components(
            components in prop::collection::vec("[^:]{1,24}", 2..=3)
        ) {
            let id = encode(components.as_slice());
            prop_assert_eq!(decode(&id, components.len()).unwrap(), components);
        }

        #[test]
        fn test_wrong_part_count_is_malformed(
            components in prop::collection::vec("[^:]{1,24}", 2..=3)
        ) {
            let id = encode(components.as_slice());
            let other = if components.len() == 2 { 3 } else { 2 };
            let is_malformed = matches!(
                decode(&id, other),
                Err(Error::MalformedIdentifier { .. })
            );
            prop_assert!(is_malformed);
        }
    }

    #[test]
    fn test_decode_rejects_malformed_ids() {
        let cases = [
            ("", 2),
            ("no-separator", 2),
            (":hg-42", 2),
            ("i-1:", 2),
            ("i-1:hg-42:extra", 2),
            ("i-1:CALL_RECORDINGS", 3),
            ("i-1::assoc-7", 3),
            ("i-1:a:b:c", 3),
        ];

        for (id, parts) in cases {
            let err = decode(id, parts).unwrap_err();
            assert!(
                matches!(err, Error::MalformedIdentifier { .. }),
                "'{}' should be malformed for {} parts",
                id,
                parts
            );
        }
    }

    #[test]
    fn test_layout_error_names_expected_components() {
        let err = USER_ID.decode_pair("only-one").unwrap_err();
        assert!(err.to_string().contains("instance_id:user_id"));
    }

    #[test]
    fn test_layout_decode_triple() {
        let (instance, resource_type, association) = STORAGE_ASSOCIATION_ID
            .decode_triple("i-1:AGENT_EVENTS:abc")
            .unwrap();
        assert_eq!(instance, "i-1");
        assert_eq!(resource_type, "AGENT_EVENTS");
        assert_eq!(association, "abc");
    }
}
