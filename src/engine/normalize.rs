//! Canonical grouping keys for account types and category names.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// A normalized (lower-cased, trimmed, non-empty) account type or category name. Raw names that
/// differ only in case or surrounding whitespace map to the same key.
///
/// `normalize` is the only way to build one, so the key cannot be read back from JSON.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for GroupKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for GroupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the grouping key for `raw`, or `None` when nothing usable is left after trimming.
/// Callers skip records without a key.
pub fn normalize(raw: Option<&str>) -> Option<GroupKey> {
    let key = raw?.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(GroupKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_whitespace() {
        let a = normalize(Some("  Cash ")).unwrap();
        let b = normalize(Some("CASH")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "cash");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some("")), None);
        assert_eq!(normalize(Some(" \t\n ")), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Food", "  credit CARD  ", "Ünïcode Bank", "a", "x y"] {
            let once = normalize(Some(raw)).unwrap();
            let twice = normalize(Some(once.as_str())).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        assert_eq!(normalize(Some(" Credit  Card ")).unwrap().as_str(), "credit  card");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = normalize(Some(" Food ")).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"food\"");
    }
}
