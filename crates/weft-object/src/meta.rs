//! Meta storage
//!
//! Meta entries are hidden attributes in a namespace disjoint from members;
//! they are never reachable through attribute access and no wrapper events
//! fire around them.

use rustc_hash::FxHashMap;

use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Hidden name → value mapping
#[derive(Default)]
pub struct MetaStore {
    entries: FxHashMap<String, Value>,
}

impl MetaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a meta value
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMeta` if the name is absent.
    pub fn get(&self, key: &str) -> ObjectResult<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| ObjectError::NoSuchMeta(key.to_string()))
    }

    /// Look up a meta value, falling back to a default
    ///
    /// The default is always honored when the name is absent, including
    /// `Null` and other falsy defaults. Whether a default was supplied is
    /// encoded by calling this method instead of [`MetaStore::get`].
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.entries.get(key).cloned().unwrap_or(default)
    }

    /// Insert or overwrite a meta entry
    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Remove a meta entry, returning its value
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMeta` if the name is absent.
    pub fn remove(&mut self, key: &str) -> ObjectResult<Value> {
        self.entries
            .remove(key)
            .ok_or_else(|| ObjectError::NoSuchMeta(key.to_string()))
    }

    /// Check whether a meta entry exists
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every meta entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
