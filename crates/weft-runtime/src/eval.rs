//! Tree-walking evaluator
//!
//! Walks the closed [`Expr`] enum with an exhaustive match; there is no
//! name-based visitor dispatch. Division follows floor semantics on
//! integers.

use weft_object::Value;
use weft_parser::{parse, BinOp, Expr};

use crate::stack::{floor_div, Frame, Stack};
use crate::{RuntimeError, RuntimeResult};

/// Evaluate an expression tree
///
/// # Errors
///
/// `DivisionByZero` for a zero divisor, `Overflow` when a result does not
/// fit in `i64`.
pub fn eval_expr(expr: &Expr) -> RuntimeResult<i64> {
    match expr {
        Expr::Number(value, _) => Ok(*value),
        Expr::Binary { op, lhs, rhs, .. } => {
            let a = eval_expr(lhs)?;
            let b = eval_expr(rhs)?;
            match op {
                BinOp::Add => a.checked_add(b).ok_or(RuntimeError::Overflow),
                BinOp::Sub => a.checked_sub(b).ok_or(RuntimeError::Overflow),
                BinOp::Mul => a.checked_mul(b).ok_or(RuntimeError::Overflow),
                BinOp::Div => floor_div(a, b),
            }
        }
    }
}

/// Parse and evaluate source text
///
/// # Errors
///
/// Propagates lexing, parsing, and evaluation failures.
pub fn evaluate(source: &str) -> RuntimeResult<i64> {
    let expr = parse(source)?;
    eval_expr(&expr)
}

/// Persistent evaluation session
///
/// Keeps a call stack with a root frame; every successful evaluation
/// records its result as the root frame's return value.
pub struct Session {
    stack: Stack,
}

impl Session {
    /// Create a session with a fresh root frame
    pub fn new() -> Self {
        let mut stack = Stack::new();
        stack.push_frame(Frame::new());
        Session { stack }
    }

    /// Evaluate one input
    ///
    /// # Errors
    ///
    /// Propagates lexing, parsing, and evaluation failures; the session
    /// stays usable afterwards.
    pub fn eval(&mut self, source: &str) -> RuntimeResult<i64> {
        let result = evaluate(source)?;
        self.stack
            .current_frame()?
            .set_return_value(Value::Int(result));
        Ok(result)
    }

    /// Result of the last successful evaluation, `Null` before the first
    pub fn last_result(&self) -> Value {
        self.stack
            .current_frame()
            .map(Frame::return_value)
            .unwrap_or(Value::Null)
    }

    /// Discard session state
    ///
    /// The root frame's backing object is reset through the protocol (its
    /// `on_reset` wrappers fire), then replaced.
    ///
    /// # Errors
    ///
    /// Propagates a vetoing `on_reset` hook; the session is only replaced
    /// after the reset succeeds.
    pub fn reset(&mut self) -> RuntimeResult<()> {
        if let Ok(frame) = self.stack.current_frame() {
            frame.object().reset()?;
        }
        let mut stack = Stack::new();
        stack.push_frame(Frame::new());
        self.stack = stack;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert_eq!(evaluate("42").unwrap(), 42);
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(evaluate("1 + 2 * 3").unwrap(), 7);
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), 9);
        assert_eq!(evaluate("10 - 2 - 3").unwrap(), 5);
    }

    #[test]
    fn test_floor_division() {
        assert_eq!(evaluate("7 / 2").unwrap(), 3);
        assert_eq!(evaluate("(0 - 7) / 2").unwrap(), -4);
        assert_eq!(evaluate("8 / 4 / 2").unwrap(), 1);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1 / 0"), Err(RuntimeError::DivisionByZero));
        assert_eq!(evaluate("1 / (2 - 2)"), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn test_overflow() {
        let source = format!("{} + 1", i64::MAX);
        assert_eq!(evaluate(&source), Err(RuntimeError::Overflow));
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(evaluate("1 +"), Err(RuntimeError::Parse(_))));
    }

    #[test]
    fn test_session_records_result() {
        let mut session = Session::new();
        assert_eq!(session.last_result(), Value::Null);

        assert_eq!(session.eval("3 * 4").unwrap(), 12);
        assert_eq!(session.last_result(), Value::Int(12));

        // A failed evaluation keeps the previous result.
        assert!(session.eval("1 /").is_err());
        assert_eq!(session.last_result(), Value::Int(12));
    }

    #[test]
    fn test_session_reset() {
        let mut session = Session::new();
        session.eval("1 + 1").unwrap();
        session.reset().unwrap();
        assert_eq!(session.last_result(), Value::Null);
    }
}
