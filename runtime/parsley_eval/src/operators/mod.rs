//! Binary operator implementations for the evaluator.
//!
//! Provides direct enum-based dispatch for binary operations. The value
//! set is closed, so matching on `(left, right)` pairs keeps every
//! combination visible in one place.

mod money;
mod units;

use parsley_ir::BinaryOp;
use parsley_value::{
    binary_type_mismatch, division_by_zero, integer_overflow, modulo_by_zero, EvalResult, Value,
};

use crate::compare::natural_compare;
use crate::convert::to_template_string;
use crate::exec::{concat, membership};

/// Checked arithmetic operation with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op_name: &'static str) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op_name))
}

/// Evaluate a binary operation on two already-evaluated operands.
///
/// `&&`, `||`, and `??` are accepted here for completeness; the
/// interpreter short-circuits them before the right side is evaluated.
#[expect(clippy::cast_precision_loss, reason = "mixed int/float arithmetic")]
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::And => return Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => return Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Coalesce => return Ok(if left.is_null() { right } else { left }),
        BinaryOp::Concat => return Ok(concat(&left, &right)),
        BinaryOp::In => return membership(&left, &right).map(Value::Bool),
        BinaryOp::NotIn => return membership(&left, &right).map(|found| Value::Bool(!found)),
        _ => {}
    }

    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(*a, *b, op),
        (Value::Int(a), Value::Float(b)) => eval_float_binary(*a as f64, *b, op),
        (Value::Float(a), Value::Int(b)) => eval_float_binary(*a, *b as f64, op),
        (Value::Str(a), Value::Str(b)) => eval_string_binary(a, b, op),
        (Value::Money(a), Value::Money(b)) => money::eval_money_binary(a, b, op),
        (Value::Money(m), Value::Int(_) | Value::Float(_)) => {
            money::eval_money_scalar(m, &right, op)
        }
        (Value::Int(_) | Value::Float(_), Value::Money(m)) => {
            money::eval_scalar_money(&left, m, op)
        }
        (Value::Unit(a), Value::Unit(b)) => units::eval_unit_binary(*a, *b, op),
        (Value::Unit(u), Value::Int(_) | Value::Float(_)) => {
            units::eval_unit_scalar(*u, &right, op)
        }
        (Value::Int(_) | Value::Float(_), Value::Unit(u)) => {
            units::eval_scalar_unit(&left, *u, op)
        }
        _ => eval_fallback(&left, &right, op),
    }
}

/// Operator-level `==`: integers equal floats of the same value.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    matches!(
        evaluate_binary(a.clone(), b.clone(), BinaryOp::Eq),
        Ok(Value::Bool(true))
    )
}

/// Binary operations on integers. Division truncates.
fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "remainder"),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(binary_type_mismatch("integer", op.as_symbol(), "integer")),
    }
}

#[allow(clippy::float_cmp, reason = "operator equality is exact")]
fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div if b == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod if b == 0.0 => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(a < b)),
        BinaryOp::LtEq => Ok(Value::Bool(a <= b)),
        BinaryOp::Gt => Ok(Value::Bool(a > b)),
        BinaryOp::GtEq => Ok(Value::Bool(a >= b)),
        _ => Err(binary_type_mismatch("float", op.as_symbol(), "float")),
    }
}

/// `+` concatenates; ordering comparisons use natural order.
fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> EvalResult {
    let ord = || natural_compare(a, b);
    match op {
        BinaryOp::Add => Ok(Value::string(format!("{a}{b}"))),
        BinaryOp::Eq => Ok(Value::Bool(a == b)),
        BinaryOp::NotEq => Ok(Value::Bool(a != b)),
        BinaryOp::Lt => Ok(Value::Bool(ord().is_lt())),
        BinaryOp::LtEq => Ok(Value::Bool(ord().is_le())),
        BinaryOp::Gt => Ok(Value::Bool(ord().is_gt())),
        BinaryOp::GtEq => Ok(Value::Bool(ord().is_ge())),
        _ => Err(binary_type_mismatch("string", op.as_symbol(), "string")),
    }
}

/// Everything without a dedicated rule: `==`/`!=` compare structurally
/// (different kinds are never equal), and `+` with a string on either side
/// concatenates the other operand's template form.
fn eval_fallback(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right, op) {
        (_, _, BinaryOp::Eq) => Ok(Value::Bool(left == right)),
        (_, _, BinaryOp::NotEq) => Ok(Value::Bool(left != right)),
        (Value::Str(s), other, BinaryOp::Add) => Ok(Value::string(format!(
            "{s}{}",
            to_template_string(other)
        ))),
        (other, Value::Str(s), BinaryOp::Add) => Ok(Value::string(format!(
            "{}{s}",
            to_template_string(other)
        ))),
        _ => Err(binary_type_mismatch(
            left.type_name(),
            op.as_symbol(),
            right.type_name(),
        )),
    }
}

#[cfg(test)]
mod tests;
