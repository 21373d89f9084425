//! Object-backed number type
//!
//! A `Number` stores its payload as the `value` member and registers its
//! arithmetic as meta entries, so the operations exist on the object but are
//! invisible to attribute lookup.

use weft_object::{Object, ObjectError, ObjectResult, Value};

use crate::{RuntimeError, RuntimeResult};

#[derive(Clone, Copy)]
enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithOp {
    fn meta_key(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Subtract => "subtract",
            ArithOp::Multiply => "multiply",
            ArithOp::Divide => "divide",
        }
    }

    fn apply(self, a: f64, b: f64) -> ObjectResult<f64> {
        match self {
            ArithOp::Add => Ok(a + b),
            ArithOp::Subtract => Ok(a - b),
            ArithOp::Multiply => Ok(a * b),
            ArithOp::Divide => {
                if b == 0.0 {
                    Err(ObjectError::Hook("cannot divide by zero".to_string()))
                } else {
                    Ok(a / b)
                }
            }
        }
    }
}

/// Extract a numeric operand from a raw value or a number-backed object.
fn operand(value: &Value) -> ObjectResult<f64> {
    if let Some(x) = value.as_float() {
        return Ok(x);
    }
    if let Value::Object(object) = value {
        return object
            .get_member("value")?
            .as_float()
            .ok_or_else(|| ObjectError::Hook("non-numeric operand".to_string()));
    }
    Err(ObjectError::Hook("non-numeric operand".to_string()))
}

/// Numeric runtime value
pub struct Number {
    object: Object,
}

impl Number {
    /// Create a number
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures while seeding the payload.
    pub fn new(value: f64) -> ObjectResult<Self> {
        let number = Number {
            object: Object::new(&[]),
        };
        number.object.set_member("value", Value::Float(value))?;
        number.register_arithmetic();
        Ok(number)
    }

    /// Register the arithmetic bridges under hidden meta keys.
    fn register_arithmetic(&self) {
        for op in [
            ArithOp::Add,
            ArithOp::Subtract,
            ArithOp::Multiply,
            ArithOp::Divide,
        ] {
            let lhs = self.object.clone();
            self.object.set_meta(
                op.meta_key(),
                Value::native(move |args| {
                    let a = operand(&Value::Object(lhs.clone()))?;
                    let b = args
                        .first()
                        .ok_or_else(|| ObjectError::Hook("missing operand".to_string()))
                        .and_then(operand)?;
                    Ok(Value::Float(op.apply(a, b)?))
                }),
            );
        }
    }

    /// The numeric payload
    ///
    /// # Errors
    ///
    /// Fails if the `value` member was removed or replaced by a non-number.
    pub fn value(&self) -> ObjectResult<f64> {
        self.object
            .get_member("value")?
            .as_float()
            .ok_or_else(|| ObjectError::Hook("number payload is not numeric".to_string()))
    }

    /// The backing object
    pub fn object(&self) -> &Object {
        &self.object
    }

    fn dispatch(&self, op: ArithOp, other: &Number) -> RuntimeResult<Number> {
        let bridge = self.object.get_meta(op.meta_key())?;
        let result = bridge.invoke(&[Value::Object(other.object.clone())])?;
        let value = result
            .as_float()
            .ok_or_else(|| ObjectError::Hook("arithmetic produced a non-number".to_string()))?;
        Ok(Number::new(value)?)
    }

    /// Addition
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures from the meta bridge.
    pub fn add(&self, other: &Number) -> RuntimeResult<Number> {
        self.dispatch(ArithOp::Add, other)
    }

    /// Subtraction
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures from the meta bridge.
    pub fn subtract(&self, other: &Number) -> RuntimeResult<Number> {
        self.dispatch(ArithOp::Subtract, other)
    }

    /// Multiplication
    ///
    /// # Errors
    ///
    /// Propagates object protocol failures from the meta bridge.
    pub fn multiply(&self, other: &Number) -> RuntimeResult<Number> {
        self.dispatch(ArithOp::Multiply, other)
    }

    /// Division
    ///
    /// # Errors
    ///
    /// Fails with `DivisionByZero` when the divisor is zero.
    pub fn divide(&self, other: &Number) -> RuntimeResult<Number> {
        if other.value()? == 0.0 {
            return Err(RuntimeError::DivisionByZero);
        }
        self.dispatch(ArithOp::Divide, other)
    }
}
