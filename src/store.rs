//! The environment the decoder reads from and writes into.
//!
//! [`ProcessEnv`] is the real process environment. [`MemoryEnv`] holds the
//! same mapping in memory so the decoding logic can run without touching
//! global state.

use std::collections::BTreeMap;
use std::env;

/// A mutable string to string mapping. Implementations only ever add or
/// overwrite entries, never remove them.
pub trait EnvStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// All keys currently present, in no particular order.
    fn keys(&self) -> Vec<String>;
}

/// The environment of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
    }

    fn keys(&self) -> Vec<String> {
        // Entries that are not valid unicode can't be blobs; skip them.
        env::vars_os()
            .filter_map(|(k, _)| k.into_string().ok())
            .collect()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: BTreeMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}
