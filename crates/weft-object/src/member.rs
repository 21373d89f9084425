//! Member storage
//!
//! Members are the externally visible named attributes of an object. The
//! store preserves insertion order so iteration (and the object's debug
//! rendering) is reproducible; order carries no semantic weight.

use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Insertion-ordered name → value mapping
///
/// Member counts are small in practice, so entries live in a vector and
/// lookups scan linearly.
#[derive(Default)]
pub struct MemberStore {
    entries: Vec<(String, Value)>,
}

impl MemberStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a member value
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if the name is absent.
    pub fn get(&self, key: &str) -> ObjectResult<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
            .ok_or_else(|| ObjectError::NoSuchMember(key.to_string()))
    }

    /// Insert or overwrite a member
    ///
    /// Overwriting keeps the member's original position.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    /// Remove a member, returning its value
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if the name is absent.
    pub fn remove(&mut self, key: &str) -> ObjectResult<Value> {
        let pos = self
            .entries
            .iter()
            .position(|(name, _)| name == key)
            .ok_or_else(|| ObjectError::NoSuchMember(key.to_string()))?;
        Ok(self.entries.remove(pos).1)
    }

    /// Check whether a member exists
    pub fn has(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == key)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Drop every member
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
