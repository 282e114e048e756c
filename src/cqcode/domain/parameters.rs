//! Ordered parameter map carried by a parsed tag.

use serde::{Deserialize, Serialize};

/// Parameter name/value pairs of a tag, in first-seen order.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the position where the key first appeared, so a re-rendered tag lists its
/// parameters in the order they were originally written.
///
/// # Examples
///
/// ```
/// use cqtext::cqcode::domain::TagParameters;
///
/// let mut parameters = TagParameters::new();
/// parameters.insert("url", "http://a");
/// parameters.insert("sub_type", "0");
/// parameters.insert("url", "http://b");
///
/// assert_eq!(parameters.get("url"), Some("http://b"));
/// assert_eq!(parameters.keys().collect::<Vec<_>>(), ["url", "sub_type"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagParameters(Vec<(String, String)>);

impl TagParameters {
    /// Creates an empty parameter map.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts or replaces a parameter value.
    ///
    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key_text = key.into();
        let value_text = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key_text) {
            Some((_, slot)) => Some(std::mem::replace(slot, value_text)),
            None => {
                self.0.push((key_text, value_text));
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over parameter names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when there are no parameters.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TagParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (key, value) in iter {
            parameters.insert(key, value);
        }
        parameters
    }
}
