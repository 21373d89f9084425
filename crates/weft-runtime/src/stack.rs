//! Call stack and frame bookkeeping
//!
//! Frames store their local variables as members of a backing object, so
//! wrappers registered on a frame observe local mutation like any other
//! member access; the pending return value lives in meta, hidden from
//! attribute lookup.

use weft_object::{Object, ObjectResult, Value};

use crate::{RuntimeError, RuntimeResult};

/// Operator characters the line-oriented executor understands
const OPS: [char; 4] = ['+', '-', '*', '/'];

/// Apply a single operator character to integer operands
///
/// Arithmetic matches the expression evaluator: checked add/sub/mul and
/// floor division.
///
/// # Errors
///
/// `UnsupportedOperation` for characters outside the operator set,
/// `DivisionByZero` for a zero divisor, `Overflow` when the result does not
/// fit in `i64`.
pub fn apply_operator(op: char, a: i64, b: i64) -> RuntimeResult<i64> {
    match op {
        '+' => a.checked_add(b).ok_or(RuntimeError::Overflow),
        '-' => a.checked_sub(b).ok_or(RuntimeError::Overflow),
        '*' => a.checked_mul(b).ok_or(RuntimeError::Overflow),
        '/' => floor_div(a, b),
        other => Err(RuntimeError::UnsupportedOperation(other)),
    }
}

/// Integer division rounding toward negative infinity
///
/// # Errors
///
/// `DivisionByZero` for a zero divisor, `Overflow` for `i64::MIN / -1`.
pub fn floor_div(a: i64, b: i64) -> RuntimeResult<i64> {
    if b == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(RuntimeError::Overflow)?;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Pre-processed source unit
///
/// Validates delimiter balance up front and records the trimmed non-empty
/// lines plus the last operator character seen.
pub struct Code {
    lines: Vec<String>,
    operator: Option<char>,
}

impl Code {
    /// Validate and split source text
    ///
    /// # Errors
    ///
    /// Returns `UnbalancedDelimiters` when `{}`/`()` nesting does not close.
    pub fn new(source: &str) -> RuntimeResult<Self> {
        let mut define_level = 0i32;
        let mut bracket_level = 0i32;
        let mut operator = None;

        for c in source.chars() {
            match c {
                '{' => define_level += 1,
                '}' => define_level -= 1,
                '(' => bracket_level += 1,
                ')' => bracket_level -= 1,
                _ if OPS.contains(&c) => operator = Some(c),
                _ => {}
            }
        }

        if define_level != 0 || bracket_level != 0 {
            return Err(RuntimeError::UnbalancedDelimiters);
        }

        let lines = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Code { lines, operator })
    }

    /// Trimmed non-empty source lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Last operator character in the source, if any
    pub fn operator(&self) -> Option<char> {
        self.operator
    }
}

/// Function activation record
///
/// Locals are members of the backing object; the return value is meta.
pub struct Frame {
    object: Object,
}

impl Frame {
    /// Create a frame with no locals
    pub fn new() -> Self {
        Frame {
            object: Object::new(&[]),
        }
    }

    /// Bind or overwrite a local variable
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures (e.g. a vetoing wrapper).
    pub fn set_var(&self, name: &str, value: Value) -> ObjectResult<()> {
        self.object.set_member(name, value)
    }

    /// Read a local variable; `None` when unbound
    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.object.get_member(name).ok()
    }

    /// Record the frame's pending return value
    pub fn set_return_value(&self, value: Value) {
        self.object.set_meta("return", value);
    }

    /// The frame's pending return value, `Null` when unset
    pub fn return_value(&self) -> Value {
        self.object.get_meta_or("return", Value::Null)
    }

    /// The backing object
    pub fn object(&self) -> &Object {
        &self.object
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new()
    }
}

/// Call stack of frames
#[derive(Default)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the current frame
    ///
    /// # Errors
    ///
    /// Returns `EmptyStack` when no frame is active.
    pub fn pop_frame(&mut self) -> RuntimeResult<Frame> {
        self.frames.pop().ok_or(RuntimeError::EmptyStack)
    }

    /// The current frame
    ///
    /// # Errors
    ///
    /// Returns `EmptyStack` when no frame is active.
    pub fn current_frame(&self) -> RuntimeResult<&Frame> {
        self.frames.last().ok_or(RuntimeError::EmptyStack)
    }

    /// Check if no frames are active
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of active frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_validation() {
        assert!(Code::new("(1 + 2)").is_ok());
        assert!(Code::new("{ (1) }").is_ok());
        assert!(matches!(
            Code::new("(1 + 2"),
            Err(RuntimeError::UnbalancedDelimiters)
        ));
        assert!(matches!(
            Code::new("fn {"),
            Err(RuntimeError::UnbalancedDelimiters)
        ));
    }

    #[test]
    fn test_code_lines_and_operator() {
        let code = Code::new("  1 + 2  \n\n  3 * 4  ").unwrap();
        assert_eq!(code.lines(), ["1 + 2", "3 * 4"]);
        assert_eq!(code.operator(), Some('*'));

        let code = Code::new("42").unwrap();
        assert_eq!(code.operator(), None);
    }

    #[test]
    fn test_apply_operator() {
        assert_eq!(apply_operator('+', 2, 3).unwrap(), 5);
        assert_eq!(apply_operator('-', 2, 3).unwrap(), -1);
        assert_eq!(apply_operator('*', 2, 3).unwrap(), 6);
        assert_eq!(apply_operator('/', 6, 3).unwrap(), 2);
        assert_eq!(
            apply_operator('/', 1, 0),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(
            apply_operator('%', 1, 1),
            Err(RuntimeError::UnsupportedOperation('%'))
        );
    }

    #[test]
    fn test_operator_arithmetic_matches_evaluator() {
        // Division floors toward negative infinity, as in the evaluator.
        assert_eq!(apply_operator('/', 7, 2).unwrap(), 3);
        assert_eq!(apply_operator('/', -7, 2).unwrap(), -4);
        assert_eq!(apply_operator('/', 7, -2).unwrap(), -4);
        assert_eq!(apply_operator('/', -7, -2).unwrap(), 3);

        // Overflow surfaces instead of wrapping.
        assert_eq!(
            apply_operator('+', i64::MAX, 1),
            Err(RuntimeError::Overflow)
        );
        assert_eq!(
            apply_operator('*', i64::MIN, -1),
            Err(RuntimeError::Overflow)
        );
        assert_eq!(
            apply_operator('/', i64::MIN, -1),
            Err(RuntimeError::Overflow)
        );
    }

    #[test]
    fn test_frame_locals_and_return() {
        let frame = Frame::new();
        frame.set_var("a", Value::Int(114514)).unwrap();
        frame.set_var("b", Value::Int(1919810)).unwrap();

        assert_eq!(frame.get_var("a"), Some(Value::Int(114514)));
        assert_eq!(frame.get_var("missing"), None);

        assert_eq!(frame.return_value(), Value::Null);
        frame.set_return_value(Value::Int(7));
        assert_eq!(frame.return_value(), Value::Int(7));
        // The return value is hidden from attribute access.
        assert!(!frame.object().has_member("return"));
    }

    #[test]
    fn test_stack_push_pop() {
        let mut stack = Stack::new();
        assert!(stack.is_empty());
        assert!(matches!(stack.pop_frame(), Err(RuntimeError::EmptyStack)));
        assert!(matches!(
            stack.current_frame(),
            Err(RuntimeError::EmptyStack)
        ));

        stack.push_frame(Frame::new());
        stack.push_frame(Frame::new());
        assert_eq!(stack.depth(), 2);

        stack.pop_frame().unwrap();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_single_operator_execution() {
        // A frame plus a one-operator code unit, end to end.
        let code = Code::new("*").unwrap();
        let mut stack = Stack::new();
        stack.push_frame(Frame::new());

        let frame = stack.current_frame().unwrap();
        frame.set_var("a", Value::Int(6)).unwrap();
        frame.set_var("b", Value::Int(7)).unwrap();

        let op = code.operator().unwrap();
        let a = frame.get_var("a").and_then(|v| v.as_int()).unwrap();
        let b = frame.get_var("b").and_then(|v| v.as_int()).unwrap();
        frame.set_return_value(Value::Int(apply_operator(op, a, b).unwrap()));

        let frame = stack.pop_frame().unwrap();
        assert_eq!(frame.return_value(), Value::Int(42));
    }
}
