//! Wrapper registry and lifecycle events
//!
//! Wrappers are hook functions bound to lifecycle/access events and fired
//! synchronously around member mutation and object lifecycle transitions.
//! Events are a closed enum paired with the member name, so there is no
//! string concatenation (`"before_set_" + key`) anywhere in dispatch.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Lifecycle/access event identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Object construction, fired with the constructor arguments
    Init,
    /// Object reset, fired before the stores are cleared
    Reset,
    /// Before a member read
    BeforeGet(String),
    /// After a member read, fired with the value
    AfterGet(String),
    /// Before a member write, fired with the new value
    BeforeSet(String),
    /// After a member write, fired with the new value
    AfterSet(String),
    /// Before a member removal
    BeforeDelete(String),
    /// After a member removal
    AfterDelete(String),
}

impl fmt::Display for Event {
    /// Renders the conventional event names (`on_init`, `before_set_x`, ...)
    /// for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Init => write!(f, "on_init"),
            Event::Reset => write!(f, "on_reset"),
            Event::BeforeGet(name) => write!(f, "before_get_{}", name),
            Event::AfterGet(name) => write!(f, "after_get_{}", name),
            Event::BeforeSet(name) => write!(f, "before_set_{}", name),
            Event::AfterSet(name) => write!(f, "after_set_{}", name),
            Event::BeforeDelete(name) => write!(f, "before_del_{}", name),
            Event::AfterDelete(name) => write!(f, "after_del_{}", name),
        }
    }
}

/// Hook function bound to an event
///
/// Hooks receive the event arguments and may fail; a failure aborts the
/// remaining hooks for that event and propagates to the operation's caller.
/// Hook identity (for unregistration) is the `Rc` allocation.
pub type Hook = Rc<dyn Fn(&[Value]) -> ObjectResult<()>>;

/// Wrap a closure as a registrable hook
///
/// Keep the returned handle around if the hook needs to be unregistered
/// later; unregistration matches by identity.
pub fn hook<F>(f: F) -> Hook
where
    F: Fn(&[Value]) -> ObjectResult<()> + 'static,
{
    Rc::new(f)
}

/// Event → ordered hook list mapping
#[derive(Default)]
pub struct WrapperRegistry {
    hooks: FxHashMap<Event, Vec<Hook>>,
}

impl WrapperRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook to an event's list, creating the list if absent
    pub fn register(&mut self, event: Event, hook: Hook) {
        self.hooks.entry(event).or_default().push(hook);
    }

    /// Remove the first identical hook from an event's list
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWrapper` if the event has no registered hooks or the
    /// hook is not among them.
    pub fn unregister(&mut self, event: &Event, hook: &Hook) -> ObjectResult<()> {
        let list = self
            .hooks
            .get_mut(event)
            .ok_or_else(|| ObjectError::NoSuchWrapper(event.clone()))?;
        let pos = list
            .iter()
            .position(|registered| Rc::ptr_eq(registered, hook))
            .ok_or_else(|| ObjectError::NoSuchWrapper(event.clone()))?;
        list.remove(pos);
        if list.is_empty() {
            self.hooks.remove(event);
        }
        Ok(())
    }

    /// Clone an event's hook list for dispatch
    ///
    /// Dispatch iterates over this snapshot, never the live list, so a hook
    /// that (un)registers hooks on the same event cannot disturb in-flight
    /// iteration. Events with no hooks yield an empty snapshot.
    pub fn snapshot(&self, event: &Event) -> Vec<Hook> {
        self.hooks.get(event).cloned().unwrap_or_default()
    }

    /// Check whether an event has registered hooks
    pub fn has(&self, event: &Event) -> bool {
        self.hooks.contains_key(event)
    }

    /// Drop every registered hook
    pub fn clear(&mut self) {
        self.hooks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_event_display() {
        assert_eq!(Event::Init.to_string(), "on_init");
        assert_eq!(Event::Reset.to_string(), "on_reset");
        assert_eq!(Event::BeforeSet("x".into()).to_string(), "before_set_x");
        assert_eq!(Event::AfterDelete("y".into()).to_string(), "after_del_y");
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut registry = WrapperRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let order = order.clone();
            hook(move |_| {
                order.borrow_mut().push(1);
                Ok(())
            })
        };
        let second = {
            let order = order.clone();
            hook(move |_| {
                order.borrow_mut().push(2);
                Ok(())
            })
        };

        registry.register(Event::Reset, first);
        registry.register(Event::Reset, second);

        for h in registry.snapshot(&Event::Reset) {
            h(&[]).unwrap();
        }
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unregister_unknown_event() {
        let mut registry = WrapperRegistry::new();
        let h = hook(|_| Ok(()));
        assert_eq!(
            registry.unregister(&Event::Reset, &h),
            Err(ObjectError::NoSuchWrapper(Event::Reset))
        );
    }

    #[test]
    fn test_unregister_unknown_hook() {
        let mut registry = WrapperRegistry::new();
        let registered = hook(|_| Ok(()));
        let stranger = hook(|_| Ok(()));
        registry.register(Event::Reset, registered);
        assert_eq!(
            registry.unregister(&Event::Reset, &stranger),
            Err(ObjectError::NoSuchWrapper(Event::Reset))
        );
    }

    #[test]
    fn test_unregister_removes_first_match() {
        let mut registry = WrapperRegistry::new();
        let h = hook(|_| Ok(()));
        registry.register(Event::Reset, h.clone());
        registry.register(Event::Reset, h.clone());

        registry.unregister(&Event::Reset, &h).unwrap();
        assert_eq!(registry.snapshot(&Event::Reset).len(), 1);

        registry.unregister(&Event::Reset, &h).unwrap();
        assert!(!registry.has(&Event::Reset));
    }

    #[test]
    fn test_snapshot_of_empty_event() {
        let registry = WrapperRegistry::new();
        assert!(registry.snapshot(&Event::Init).is_empty());
    }
}
