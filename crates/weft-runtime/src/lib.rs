//! Weft runtime
//!
//! Collaborators built on top of the object protocol:
//! - Tree-walking evaluator for the expression grammar
//! - Object-backed number type with meta-registered arithmetic
//! - Object-backed exception values and a console error reporter
//! - Call-stack and frame bookkeeping

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod eval;
pub mod exception;
pub mod number;
pub mod report;
pub mod stack;

pub use eval::{eval_expr, evaluate, Session};
pub use exception::Exception;
pub use number::Number;
pub use report::{write_report, Reporter, SourceContext};
pub use stack::{apply_operator, floor_div, Code, Frame, Stack};

use weft_object::ObjectError;
use weft_parser::ParseError;

/// Runtime errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Lexing or parsing failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Object protocol failure
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Arithmetic overflow during evaluation
    #[error("integer overflow")]
    Overflow,

    /// Source with mismatched `{}`/`()` delimiters
    #[error("mismatched delimiters in source")]
    UnbalancedDelimiters,

    /// Frame pop or access on an empty call stack
    #[error("operation on empty call stack")]
    EmptyStack,

    /// Operator character outside the supported set
    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(char),
}

/// Result alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
