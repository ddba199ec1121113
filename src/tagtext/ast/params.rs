//! Ordered parameter maps
//!
//! Parameters and options share this representation: a keyed map plus the order in
//! which keys first appeared, so values can be looked up by key or by 1-based
//! position.

use indexmap::IndexMap;

/// Value recorded for a key written without `=value`
pub const FLAG_VALUE: &str = "yes";

#[derive(Debug, Clone, Default)]
pub struct Params {
    values: IndexMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`; a repeated key keeps its first position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set `key` as a bare flag
    pub fn insert_flag(&mut self, key: impl Into<String>) {
        self.insert(key, FLAG_VALUE);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Entry at 1-based `index`
    pub fn get_index(&self, index: usize) -> Option<(&str, &str)> {
        self.values
            .get_index(index.checked_sub(1)?)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True when `key` is present with the flag value
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key) == Some(FLAG_VALUE)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Entries in insertion order, owned
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Two maps are equal when they hold the same entries in the same order
impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.values.iter().eq(other.values.iter())
    }
}

impl Eq for Params {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}
