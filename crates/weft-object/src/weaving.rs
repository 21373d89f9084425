//! Interception set and weaving registry
//!
//! Weaving transparently proxies callable members with ordered before/after
//! advice pairs. A member must first be marked interceptable (which requires
//! it to currently denote a callable); advice pairs then execute around every
//! invocation of the proxied member.

use std::rc::Rc;
use std::str::FromStr;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Advice function woven around an interceptable member
///
/// Both halves of a pair are called with the member's invocation arguments,
/// never with its result.
pub type Advice = Rc<dyn Fn(&[Value]) -> ObjectResult<()>>;

/// Ordered (before, after) advice pair
pub type AdvicePair = (Advice, Advice);

/// Wrap a closure as an advice function
pub fn advice<F>(f: F) -> Advice
where
    F: Fn(&[Value]) -> ObjectResult<()> + 'static,
{
    Rc::new(f)
}

/// Pair selection for [`WeavingRegistry::remove`]
///
/// Selection is by position in the registration list: `First` and `Last`
/// remove one whole (before, after) pair, never one half of a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeavingRemoval {
    /// Delete every pair registered for the member
    All,
    /// Delete the earliest-registered pair
    First,
    /// Delete the latest-registered pair
    Last,
}

impl FromStr for WeavingRemoval {
    type Err = ObjectError;

    /// Parse a mode string from a user-facing surface
    ///
    /// # Errors
    ///
    /// Returns `InvalidWeavingMode` for anything but `all`, `first`, `last`.
    fn from_str(s: &str) -> ObjectResult<Self> {
        match s {
            "all" => Ok(WeavingRemoval::All),
            "first" => Ok(WeavingRemoval::First),
            "last" => Ok(WeavingRemoval::Last),
            other => Err(ObjectError::InvalidWeavingMode(other.to_string())),
        }
    }
}

/// Pair position for [`WeavingRegistry::replace`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeavingSlot {
    /// The earliest-registered pair
    First,
    /// The latest-registered pair
    Last,
}

/// Set of member names currently eligible for call-proxying
///
/// The callable-at-mark-time invariant is enforced by the facade, which can
/// see the member store; the set itself is a plain name collection.
#[derive(Default)]
pub struct InterceptionSet {
    names: FxHashSet<String>,
}

impl InterceptionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a name is marked
    pub fn contains(&self, key: &str) -> bool {
        self.names.contains(key)
    }

    /// Mark a name
    pub fn insert(&mut self, key: &str) {
        self.names.insert(key.to_string());
    }

    /// Unmark a name; no-op when absent
    pub fn remove(&mut self, key: &str) {
        self.names.remove(key);
    }

    /// Drop every marked name
    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// Member name → ordered advice pair list mapping
///
/// Registration order is execution order. Entries may outlive their target
/// member: removing a member keeps its weavings, so re-adding the member
/// re-arms the existing advice.
#[derive(Default)]
pub struct WeavingRegistry {
    weavings: FxHashMap<String, Vec<AdvicePair>>,
}

impl WeavingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an advice pair for a member, creating the list if absent
    pub fn add(&mut self, key: &str, before: Advice, after: Advice) {
        self.weavings
            .entry(key.to_string())
            .or_default()
            .push((before, after));
    }

    /// Remove advice pairs by position
    ///
    /// An emptied list is dropped, so a follow-up removal for the same
    /// member fails.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWeaving` if no advice is registered for the member.
    pub fn remove(&mut self, key: &str, mode: WeavingRemoval) -> ObjectResult<()> {
        match mode {
            WeavingRemoval::All => {
                self.weavings
                    .remove(key)
                    .ok_or_else(|| ObjectError::NoSuchWeaving(key.to_string()))?;
            }
            WeavingRemoval::First | WeavingRemoval::Last => {
                let list = self
                    .weavings
                    .get_mut(key)
                    .ok_or_else(|| ObjectError::NoSuchWeaving(key.to_string()))?;
                // Lists are never stored empty.
                if mode == WeavingRemoval::First {
                    list.remove(0);
                } else {
                    list.pop();
                }
                if list.is_empty() {
                    self.weavings.remove(key);
                }
            }
        }
        Ok(())
    }

    /// Swap the advice pair at a position
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWeaving` if no advice is registered for the member.
    pub fn replace(
        &mut self,
        key: &str,
        slot: WeavingSlot,
        before: Advice,
        after: Advice,
    ) -> ObjectResult<()> {
        let list = self
            .weavings
            .get_mut(key)
            .ok_or_else(|| ObjectError::NoSuchWeaving(key.to_string()))?;
        let index = match slot {
            WeavingSlot::First => 0,
            WeavingSlot::Last => list.len() - 1,
        };
        list[index] = (before, after);
        Ok(())
    }

    /// Clone a member's advice list for dispatch
    ///
    /// The advice proxy iterates over this snapshot, so advice that mutates
    /// the registry mid-invocation cannot disturb the running sequence.
    pub fn snapshot(&self, key: &str) -> Vec<AdvicePair> {
        self.weavings.get(key).cloned().unwrap_or_default()
    }

    /// Check whether a member has registered advice
    pub fn has(&self, key: &str) -> bool {
        self.weavings.contains_key(key)
    }

    /// Drop every advice list
    pub fn clear(&mut self) {
        self.weavings.clear();
    }
}
