//! Plain key/value statistics returned by encoders and decoders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered `name -> count` record, for reporting only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodecStats(BTreeMap<String, u64>);

impl CodecStats {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl TryInto<u64>) {
        let value = value.try_into().unwrap_or(u64::MAX);
        self.0.insert(key.into(), value);
    }

    /// Value of `key`, if recorded.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no entry was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every entry of `other` into `self`.
    pub fn extend(&mut self, other: &CodecStats) {
        self.0
            .extend(other.0.iter().map(|(k, &v)| (k.clone(), v)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_serialize() {
        let mut stats = CodecStats::new();
        stats.insert("b", 2usize);
        stats.insert("a", 1u32);

        assert_eq!(stats.get("a"), Some(1));
        assert_eq!(stats.len(), 2);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2}"#);
    }
}
