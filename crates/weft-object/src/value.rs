//! Dynamic value representation
//!
//! Every member, meta entry, and hook argument in the protocol is a [`Value`].
//! Values are cheap to clone: scalars are copied, strings and natives are
//! reference-counted, objects are shared handles.

use std::fmt;
use std::rc::Rc;

use crate::object::Object;
use crate::{ObjectError, ObjectResult};

/// Host-native callable stored inside a [`Value`]
///
/// Natives receive positional arguments and may fail; a failure propagates
/// to whoever triggered the invocation.
pub type NativeFn = Rc<dyn Fn(&[Value]) -> ObjectResult<Value>>;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// Absence of a value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Immutable string
    Str(Rc<str>),
    /// Host-native function
    Native(NativeFn),
    /// Object handle
    Object(Object),
}

impl Value {
    /// Create a string value
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    /// Wrap a closure as a native callable value
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> ObjectResult<Value> + 'static,
    {
        Value::Native(Rc::new(f))
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value can be invoked
    ///
    /// Objects count as callable: their facade dispatches through the
    /// `call` member at invocation time.
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Native(_) | Value::Object(_))
    }

    /// Invoke this value with positional arguments
    ///
    /// # Errors
    ///
    /// Returns `NotCallable` for values with no call behavior; otherwise
    /// propagates whatever the callee fails with.
    pub fn invoke(&self, args: &[Value]) -> ObjectResult<Value> {
        match self {
            Value::Native(f) => f(args),
            Value::Object(obj) => obj.call(args),
            _ => Err(ObjectError::NotCallable),
        }
    }

    /// Extract an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract a float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract an object handle
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Native(_) => "native",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    /// Structural equality for scalars and strings, identity for natives
    /// and objects.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "bool({})", b),
            Value::Int(i) => write!(f, "int({})", i),
            Value::Float(x) => write!(f, "float({})", x),
            Value::Str(s) => write!(f, "str({:?})", s),
            Value::Native(_) => write!(f, "<native>"),
            Value::Object(obj) => obj.fmt(f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Native(_) => write!(f, "<native>"),
            Value::Object(_) => write!(f, "<object>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality() {
        assert_eq!(Value::Int(42), Value::Int(42));
        assert_ne!(Value::Int(1), Value::Int(2));
        assert_eq!(Value::str("a"), Value::str("a"));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_native_identity_equality() {
        let a = Value::native(|_| Ok(Value::Null));
        let b = Value::native(|_| Ok(Value::Null));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_invoke_native() {
        let double = Value::native(|args| {
            let n = args[0].as_int().unwrap();
            Ok(Value::Int(n * 2))
        });
        assert_eq!(double.invoke(&[Value::Int(21)]).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_invoke_non_callable() {
        let result = Value::Int(1).invoke(&[]);
        assert_eq!(result, Err(ObjectError::NotCallable));
    }

    #[test]
    fn test_callable_predicate() {
        assert!(Value::native(|_| Ok(Value::Null)).is_callable());
        assert!(Value::Object(Object::new(&[])).is_callable());
        assert!(!Value::Int(0).is_callable());
        assert!(!Value::Null.is_callable());
    }

    #[test]
    fn test_as_float_widens_ints() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::str("x").as_float(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::Int(-7)), "-7");
        assert_eq!(format!("{}", Value::str("hi")), "hi");
    }
}
