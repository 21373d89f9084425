//! Weft object protocol
//!
//! This crate provides the dynamic object representation used as the base
//! for every runtime value in Weft:
//! - Named, runtime-extensible attributes ("members")
//! - Hidden metadata invisible to attribute lookup ("meta")
//! - Lifecycle/access interception hooks fired around mutation ("wrappers")
//! - Ordered before/after advice around callable members ("weaving")
//!
//! Objects are single-threaded shared handles (`Rc<RefCell<..>>`). Hooks and
//! advice run synchronously on the caller's stack and may reenter the object
//! they instrument; every dispatch iterates over a snapshot so in-flight
//! iteration is stable under reentrant mutation.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod member;
pub mod meta;
pub mod object;
pub mod value;
pub mod weaving;
pub mod wrapper;

pub use member::MemberStore;
pub use meta::MetaStore;
pub use object::{Object, EXTERNAL_CALLABLE, INTERNAL_PREFIX};
pub use value::{NativeFn, Value};
pub use weaving::{advice, Advice, AdvicePair, InterceptionSet, WeavingRegistry, WeavingRemoval, WeavingSlot};
pub use wrapper::{hook, Event, Hook, WrapperRegistry};

/// Object protocol errors
///
/// All errors are synchronous and surface immediately to the caller; the
/// core never retries or recovers. A failing hook or advice aborts the
/// remaining hooks for that event and propagates as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectError {
    /// Member lookup or removal on an absent name
    #[error("object has no member '{0}'")]
    NoSuchMember(String),

    /// Meta lookup or removal on an absent name
    #[error("object has no meta attribute '{0}'")]
    NoSuchMeta(String),

    /// Wrapper unregistration for an unknown event or hook
    #[error("no such wrapper for event '{0}'")]
    NoSuchWrapper(Event),

    /// Weaving removal for a member with no registered advice
    #[error("no weaving registered for member '{0}'")]
    NoSuchWeaving(String),

    /// Weaving removal mode string that names no known mode
    #[error("invalid weaving mode '{0}', expected 'first', 'last', or 'all'")]
    InvalidWeavingMode(String),

    /// Attempt to store an object as a member of itself
    #[error("cannot set '{0}' to the object itself")]
    SelfReference(String),

    /// Call dispatch on a value with no call behavior
    #[error("object is not callable")]
    NotCallable,

    /// Failure raised from inside a user hook or advice function
    #[error("hook error: {0}")]
    Hook(String),
}

/// Result alias for object protocol operations
pub type ObjectResult<T> = Result<T, ObjectError>;
