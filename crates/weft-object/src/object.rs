//! Object facade
//!
//! [`Object`] composes the five stores behind a shared handle and virtualizes
//! attribute access: wrapper events fire around every member get/set/delete,
//! and reading an interceptable callable member yields an advice proxy
//! instead of the raw callable.
//!
//! # Reentrancy
//!
//! Hooks and advice run on the caller's stack and may perform further
//! operations on the same object. No `RefCell` borrow is ever held across a
//! hook or advice invocation, and every dispatch iterates over a snapshot of
//! the relevant list, so reentrant mutation is safe.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::member::MemberStore;
use crate::meta::MetaStore;
use crate::value::Value;
use crate::weaving::{Advice, InterceptionSet, WeavingRegistry, WeavingRemoval, WeavingSlot};
use crate::wrapper::{Event, Hook, WrapperRegistry};
use crate::{ObjectError, ObjectResult};

/// Reserved prefix for facade-internal field names
///
/// Attribute names starting with this prefix are never stored as members and
/// bypass wrapper dispatch entirely.
pub const INTERNAL_PREFIX: &str = "_";

/// Meta key marking an object as a bridge to a host callable
///
/// When an object's `call` member is another object carrying this meta key,
/// call dispatch invokes the bridge stored under the key instead of the
/// member itself.
pub const EXTERNAL_CALLABLE: &str = "external_callable";

#[derive(Default)]
struct State {
    members: MemberStore,
    meta: MetaStore,
    wrappers: WrapperRegistry,
    interceptable: InterceptionSet,
    weavings: WeavingRegistry,
    /// Facade-internal fields addressed by `_`-prefixed attribute names.
    /// Not one of the five protocol stores; survives `reset`.
    fields: FxHashMap<String, Value>,
}

/// Dynamic object handle
///
/// Cloning an `Object` clones the handle, not the state; all clones observe
/// the same members, meta, wrappers, and weavings.
#[derive(Clone)]
pub struct Object {
    state: Rc<RefCell<State>>,
}

impl Object {
    /// Construct an object with empty stores and fire `on_init`
    pub fn new(args: &[Value]) -> Self {
        let object = Object {
            state: Rc::new(RefCell::new(State::default())),
        };
        // The wrapper registry is necessarily empty at construction, so the
        // init dispatch cannot fail; it fires for lifecycle symmetry with
        // reset.
        let _ = object.fire(&Event::Init, args);
        object
    }

    /// Check whether two handles refer to the same object
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    fn is_self(&self, value: &Value) -> bool {
        matches!(value, Value::Object(other) if self.ptr_eq(other))
    }

    // ========================================================================
    // Wrapper events
    // ========================================================================

    /// Fire every hook registered for an event, in registration order
    ///
    /// All hooks receive identical arguments. An event with no hooks is a
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// A failing hook aborts the remaining invocations and propagates.
    pub fn fire(&self, event: &Event, args: &[Value]) -> ObjectResult<()> {
        let hooks = self.state.borrow().wrappers.snapshot(event);
        for hook in hooks {
            hook(args)?;
        }
        Ok(())
    }

    /// Register a hook for an event
    pub fn add_wrapper(&self, event: Event, hook: Hook) {
        self.state.borrow_mut().wrappers.register(event, hook);
    }

    /// Unregister a previously registered hook
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWrapper` if the event has no hooks or this hook is not
    /// among them.
    pub fn remove_wrapper(&self, event: &Event, hook: &Hook) -> ObjectResult<()> {
        self.state.borrow_mut().wrappers.unregister(event, hook)
    }

    // ========================================================================
    // Members
    // ========================================================================

    /// Read a member
    ///
    /// Fires `before_get` and `after_get` around the read; `before_get`
    /// observes the attempt even when the member turns out to be absent. If
    /// the member is marked interceptable and its value is callable, the
    /// returned value is an advice proxy wrapping the underlying callable.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if the member is absent.
    pub fn get_member(&self, key: &str) -> ObjectResult<Value> {
        self.fire(&Event::BeforeGet(key.to_string()), &[Value::str(key)])?;
        let value = self.state.borrow().members.get(key)?.clone();
        self.fire(
            &Event::AfterGet(key.to_string()),
            &[Value::str(key), value.clone()],
        )?;
        if self.is_interceptable(key) && value.is_callable() {
            return Ok(self.advice_proxy(key, value));
        }
        Ok(value)
    }

    /// Write a member
    ///
    /// Fires `before_set`, applies the write, then fires `after_set`
    /// (apply-then-notify: a failing `after_set` hook leaves the write in
    /// place).
    ///
    /// # Errors
    ///
    /// Returns `SelfReference` if the value is this object.
    pub fn set_member(&self, key: &str, value: Value) -> ObjectResult<()> {
        self.fire(
            &Event::BeforeSet(key.to_string()),
            &[Value::str(key), value.clone()],
        )?;
        if self.is_self(&value) {
            return Err(ObjectError::SelfReference(key.to_string()));
        }
        self.state.borrow_mut().members.set(key, value.clone());
        self.fire(
            &Event::AfterSet(key.to_string()),
            &[Value::str(key), value],
        )?;
        Ok(())
    }

    /// Remove a member
    ///
    /// Fires `before_del` and `after_del` around the removal; `before_del`
    /// observes the attempt even when the member turns out to be absent. The
    /// member is also dropped from the interception set; its weavings are
    /// kept, so re-adding the member re-arms existing advice.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if the member is absent.
    pub fn remove_member(&self, key: &str) -> ObjectResult<()> {
        self.fire(&Event::BeforeDelete(key.to_string()), &[Value::str(key)])?;
        {
            let mut state = self.state.borrow_mut();
            state.members.remove(key)?;
            state.interceptable.remove(key);
        }
        self.fire(&Event::AfterDelete(key.to_string()), &[Value::str(key)])?;
        Ok(())
    }

    /// Check whether a member exists (no events fire)
    pub fn has_member(&self, key: &str) -> bool {
        self.state.borrow().members.has(key)
    }

    /// Member names in insertion order
    pub fn member_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .members
            .iter()
            .map(|(name, _)| name.to_string())
            .collect()
    }

    // ========================================================================
    // Attribute-style access
    // ========================================================================

    /// Read an attribute
    ///
    /// Names with the reserved `_` prefix address facade-internal fields and
    /// bypass wrapper dispatch; everything else reads through
    /// [`Object::get_member`].
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if neither a field nor a member exists.
    pub fn get_attr(&self, name: &str) -> ObjectResult<Value> {
        if name.starts_with(INTERNAL_PREFIX) {
            return self
                .state
                .borrow()
                .fields
                .get(name)
                .cloned()
                .ok_or_else(|| ObjectError::NoSuchMember(name.to_string()));
        }
        self.get_member(name)
    }

    /// Write an attribute
    ///
    /// Assigning the object to itself always fails, on both the internal and
    /// the member path.
    ///
    /// # Errors
    ///
    /// Returns `SelfReference` when the value is this object.
    pub fn set_attr(&self, name: &str, value: Value) -> ObjectResult<()> {
        if self.is_self(&value) {
            return Err(ObjectError::SelfReference(name.to_string()));
        }
        if name.starts_with(INTERNAL_PREFIX) {
            self.state
                .borrow_mut()
                .fields
                .insert(name.to_string(), value);
            return Ok(());
        }
        self.set_member(name, value)
    }

    /// Remove an attribute
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMember` if the name is absent on its path.
    pub fn remove_attr(&self, name: &str) -> ObjectResult<()> {
        if name.starts_with(INTERNAL_PREFIX) {
            return self
                .state
                .borrow_mut()
                .fields
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| ObjectError::NoSuchMember(name.to_string()));
        }
        self.remove_member(name)
    }

    // ========================================================================
    // Meta
    // ========================================================================

    /// Read a meta entry
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMeta` if the entry is absent.
    pub fn get_meta(&self, key: &str) -> ObjectResult<Value> {
        self.state.borrow().meta.get(key).cloned()
    }

    /// Read a meta entry, falling back to an explicit default
    ///
    /// The default is always honored, including `Null` and other falsy
    /// values.
    pub fn get_meta_or(&self, key: &str, default: Value) -> Value {
        self.state.borrow().meta.get_or(key, default)
    }

    /// Insert or overwrite a meta entry
    pub fn set_meta(&self, key: &str, value: Value) {
        self.state.borrow_mut().meta.set(key, value);
    }

    /// Remove a meta entry
    ///
    /// # Errors
    ///
    /// Returns `NoSuchMeta` if the entry is absent.
    pub fn remove_meta(&self, key: &str) -> ObjectResult<()> {
        self.state.borrow_mut().meta.remove(key).map(|_| ())
    }

    /// Check whether a meta entry exists
    pub fn has_meta(&self, key: &str) -> bool {
        self.state.borrow().meta.has(key)
    }

    // ========================================================================
    // Interception & weaving
    // ========================================================================

    /// Mark a member as eligible for call-proxying
    ///
    /// Silently ignored unless the name currently denotes a callable member;
    /// the invariant is enforced here, at mark time.
    pub fn mark_interceptable(&self, key: &str) {
        let mut state = self.state.borrow_mut();
        let eligible = state.members.get(key).map(Value::is_callable).unwrap_or(false);
        if eligible {
            state.interceptable.insert(key);
        }
    }

    /// Unmark a member; no-op when absent
    pub fn unmark_interceptable(&self, key: &str) {
        self.state.borrow_mut().interceptable.remove(key);
    }

    /// Check whether reading a member would yield an advice proxy
    ///
    /// Re-validated against the live member store: the mark alone is not
    /// enough if the member has since been replaced by a non-callable.
    pub fn is_interceptable(&self, key: &str) -> bool {
        let state = self.state.borrow();
        state.interceptable.contains(key)
            && state.members.get(key).map(Value::is_callable).unwrap_or(false)
    }

    /// Register an advice pair for a member
    pub fn add_weaving(&self, key: &str, before: Advice, after: Advice) {
        self.state.borrow_mut().weavings.add(key, before, after);
    }

    /// Remove advice pairs by position
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWeaving` if the member has no registered advice.
    pub fn remove_weaving(&self, key: &str, mode: WeavingRemoval) -> ObjectResult<()> {
        self.state.borrow_mut().weavings.remove(key, mode)
    }

    /// Swap the advice pair at a position
    ///
    /// # Errors
    ///
    /// Returns `NoSuchWeaving` if the member has no registered advice.
    pub fn replace_weaving(
        &self,
        key: &str,
        slot: WeavingSlot,
        before: Advice,
        after: Advice,
    ) -> ObjectResult<()> {
        self.state
            .borrow_mut()
            .weavings
            .replace(key, slot, before, after)
    }

    /// Check whether a member has registered advice
    pub fn has_weaving(&self, key: &str) -> bool {
        self.state.borrow().weavings.has(key)
    }

    /// Build the advice proxy for an interceptable callable member
    ///
    /// The proxy snapshots the weaving list per invocation and runs, for
    /// each registered pair in order, the before-advice, then (once) the
    /// underlying callable, then the after-advice for the same pairs in the
    /// same order. Advice receives the invocation arguments, never the
    /// result; the proxy returns the underlying callable's result. Each
    /// advice function runs exactly once per invocation.
    fn advice_proxy(&self, key: &str, callee: Value) -> Value {
        let object = self.clone();
        let key = key.to_string();
        Value::native(move |args| {
            let pairs = object.state.borrow().weavings.snapshot(&key);
            for (before, _) in &pairs {
                before(args)?;
            }
            let result = callee.invoke(args)?;
            for (_, after) in &pairs {
                after(args)?;
            }
            Ok(result)
        })
    }

    // ========================================================================
    // Call dispatch & lifecycle
    // ========================================================================

    /// Invoke the object
    ///
    /// Resolves the `call` member through [`Object::get_member`], so wrapper
    /// events fire and interception applies. An object-valued `call` member
    /// carrying the [`EXTERNAL_CALLABLE`] meta key dispatches to the bridge
    /// stored under that key; otherwise any invocable value is invoked
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns `NotCallable` if no `call` member exists or its value cannot
    /// be invoked.
    pub fn call(&self, args: &[Value]) -> ObjectResult<Value> {
        if !self.has_member("call") {
            return Err(ObjectError::NotCallable);
        }
        let callee = self.get_member("call")?;
        if let Value::Object(target) = &callee {
            if target.has_meta(EXTERNAL_CALLABLE) {
                let bridge = target.get_meta(EXTERNAL_CALLABLE)?;
                return bridge.invoke(args);
            }
        }
        if callee.is_callable() {
            return callee.invoke(args);
        }
        Err(ObjectError::NotCallable)
    }

    /// Reset the object
    ///
    /// Fires `on_reset`, then clears members, wrappers, meta, the
    /// interception set, and weavings in one step; no intermediate state is
    /// observable. Facade-internal fields are not part of the five stores
    /// and survive. A fresh `on_init` does not fire again.
    ///
    /// # Errors
    ///
    /// A failing `on_reset` hook aborts before anything is cleared.
    pub fn reset(&self) -> ObjectResult<()> {
        self.fire(&Event::Reset, &[])?;
        let mut state = self.state.borrow_mut();
        state.members.clear();
        state.wrappers.clear();
        state.meta.clear();
        state.interceptable.clear();
        state.weavings.clear();
        Ok(())
    }
}

impl Default for Object {
    fn default() -> Self {
        Object::new(&[])
    }
}

impl fmt::Debug for Object {
    /// Renders the member mapping, in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object(")?;
        let state = self.state.borrow();
        for (i, (name, value)) in state.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, value)?;
        }
        write!(f, ")")
    }
}
