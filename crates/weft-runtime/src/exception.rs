//! Object-backed exception values
//!
//! Exceptions carry their type and message as visible members and their
//! recoverability as a hidden meta flag. Fatal exceptions are expected to
//! end the program after reporting; recoverable ones resume the session.

use weft_object::{Object, ObjectResult, Value};

use crate::RuntimeError;

/// Runtime exception value
pub struct Exception {
    object: Object,
}

impl Exception {
    fn build(kind: &str, message: &str, recoverable: bool) -> ObjectResult<Self> {
        let object = Object::new(&[]);
        object.set_member("type", Value::str(kind))?;
        object.set_member("message", Value::str(message))?;
        object.set_meta("recoverable", Value::Bool(recoverable));
        Ok(Exception { object })
    }

    /// Create a fatal exception
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures while seeding the members.
    pub fn fatal(kind: &str, message: &str) -> ObjectResult<Self> {
        Self::build(kind, message, false)
    }

    /// Create a recoverable exception
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures while seeding the members.
    pub fn recoverable(kind: &str, message: &str) -> ObjectResult<Self> {
        Self::build(kind, message, true)
    }

    /// Fatal syntax exception
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures while seeding the members.
    pub fn syntax(message: &str) -> ObjectResult<Self> {
        Self::fatal("SyntaxError", message)
    }

    /// Map a runtime error to an exception value
    ///
    /// Parse failures are fatal syntax exceptions; everything else is
    /// recoverable.
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures while seeding the members.
    pub fn from_error(error: &RuntimeError) -> ObjectResult<Self> {
        match error {
            RuntimeError::Parse(parse) => Self::syntax(&parse.to_string()),
            RuntimeError::DivisionByZero | RuntimeError::Overflow => {
                Self::recoverable("ValueError", &error.to_string())
            }
            other => Self::recoverable("RuntimeError", &other.to_string()),
        }
    }

    /// Exception type name
    pub fn kind(&self) -> String {
        self.object
            .get_member("type")
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "Exception".to_string())
    }

    /// Exception message
    pub fn message(&self) -> String {
        self.object
            .get_member("message")
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Whether execution may continue after reporting
    pub fn is_recoverable(&self) -> bool {
        self.object.get_meta_or("recoverable", Value::Bool(false)) == Value::Bool(true)
    }

    /// The backing object
    pub fn object(&self) -> &Object {
        &self.object
    }
}

impl std::fmt::Display for Exception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}
