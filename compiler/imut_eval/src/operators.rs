//! Arithmetic and logical operators with loose (JavaScript-like) coercion.

use imut_ir::{BinaryOp, UnaryOp};
use imut_value::{format_number, Value};

/// Evaluate a binary operator. `+` concatenates when either side is a string.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> Value {
    if op == BinaryOp::Add && (left.as_str().is_some() || right.as_str().is_some()) {
        let mut text = to_display_string(left);
        text.push_str(&to_display_string(right));
        return Value::from(text);
    }
    let (a, b) = (to_number(left), to_number(right));
    Value::Number(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
    })
}

pub fn evaluate_unary(operand: &Value, op: UnaryOp) -> Value {
    match op {
        UnaryOp::Neg => Value::Number(-to_number(operand)),
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
    }
}

/// Numeric value of `value`; `NaN` where no number applies.
#[expect(
    clippy::cast_precision_loss,
    reason = "timestamps stay far below 2^53 ms"
)]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Str(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Date(date) => date.millis as f64,
        Value::Undefined | Value::List(_) | Value::Map(_) | Value::Record(_) => f64::NAN,
    }
}

/// String form used by concatenation.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Undefined | Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Map(_) => "[object Map]".to_string(),
        Value::Record(_) => "[object Object]".to_string(),
        Value::Date(date) => date.millis.to_string(),
    }
}
