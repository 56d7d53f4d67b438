//! Ordered tag pairs embedded in a segment key.

use std::fmt;

use serde::Serialize;

/// Key/value annotations in the order they first appear in the key.
///
/// Inserting an existing key replaces its value but keeps its original
/// position, so both lookups and first-seen ordering are available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<(String, String)>);

impl Tags {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a pair with `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct tag keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no tags were present in the key.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Renders `key-value` pairs joined with `_`, the form used in filenames.
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("_")?;
            }
            write!(f, "{key}-{value}")?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Tags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_keeps_position() {
        let mut tags = Tags::new();
        assert_eq!(tags.insert("type", "a"), None);
        assert_eq!(tags.insert("host", "go01"), None);
        assert_eq!(tags.insert("type", "b"), Some("a".to_string()));

        let pairs: Vec<_> = tags.iter().collect();
        assert_eq!(pairs, vec![("type", "b"), ("host", "go01")]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn display_joins_pairs() {
        let tags: Tags = [("type", "accesslog"), ("error", "true")].into_iter().collect();
        assert_eq!(tags.to_string(), "type-accesslog_error-true");
        assert_eq!(Tags::new().to_string(), "");
    }

    #[test]
    fn lookup() {
        let tags: Tags = [("host", "go01")].into_iter().collect();
        assert!(tags.contains_key("host"));
        assert!(!tags.contains_key("type"));
        assert_eq!(tags.get("host"), Some("go01"));
        assert!(!tags.is_empty());
    }
}
