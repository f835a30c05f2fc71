//! Scoped key/value pin attributes (I/O standard, drive strength, ...).

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A set of named pin attributes.
///
/// Attributes are scoped: platform defaults are overridden by resource
/// attributes, which are in turn overridden by subsignal attributes. Merging
/// only ever adds or replaces keys; an inherited key is never dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, String>);

impl AttributeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Shorthand for a set holding only an `io_standard`.
    pub fn io_standard(standard: &str) -> Self {
        Self::new().with("io_standard", standard)
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no attributes are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a new set holding every key of `outer` and `inner`; `inner` wins on collision.
    pub fn merge(outer: &AttributeSet, inner: &AttributeSet) -> AttributeSet {
        let mut merged = outer.clone();
        merged.extend_from(inner);
        merged
    }

    /// Overlays `inner` onto this set in place.
    pub fn extend_from(&mut self, inner: &AttributeSet) {
        for (k, v) in &inner.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        write!(f, "{}", parts.join(" "))
    }
}
