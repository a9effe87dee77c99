//! Unit arithmetic.
//!
//! Units combine only within a family. The right operand is converted into
//! the left operand's system first, so results keep the left's system and
//! display suffix.

use parsley_ir::BinaryOp;
use parsley_value::{
    division_by_zero, integer_overflow, unit_family_mismatch, unit_operator, EvalResult,
    UnitValue, Value,
};

/// Unit on both sides.
#[expect(clippy::cast_precision_loss, reason = "inexact unit ratios become floats")]
pub(super) fn eval_unit_binary(a: UnitValue, b: UnitValue, op: BinaryOp) -> EvalResult {
    if a.family != b.family {
        return match op {
            BinaryOp::Eq => Ok(Value::Bool(false)),
            BinaryOp::NotEq => Ok(Value::Bool(true)),
            _ => Err(unit_family_mismatch(
                op.as_symbol(),
                a.family.name(),
                b.family.name(),
            )),
        };
    }
    let l = a.amount;
    let r = b.amount_in(a.system);
    match op {
        BinaryOp::Add => l
            .checked_add(r)
            .map(|amount| Value::Unit(a.with_amount(amount)))
            .ok_or_else(|| integer_overflow("addition")),
        BinaryOp::Sub => l
            .checked_sub(r)
            .map(|amount| Value::Unit(a.with_amount(amount)))
            .ok_or_else(|| integer_overflow("subtraction")),
        // Same-family ratio: dimensionless.
        BinaryOp::Div => {
            if r == 0 {
                return Err(division_by_zero());
            }
            match l.checked_rem(r) {
                Some(0) => Ok(Value::Int(l / r)),
                Some(_) => Ok(Value::Float(l as f64 / r as f64)),
                // i64::MIN / -1
                None => Err(integer_overflow("division")),
            }
        }
        BinaryOp::Eq => Ok(Value::Bool(l == r)),
        BinaryOp::NotEq => Ok(Value::Bool(l != r)),
        BinaryOp::Lt => Ok(Value::Bool(l < r)),
        BinaryOp::LtEq => Ok(Value::Bool(l <= r)),
        BinaryOp::Gt => Ok(Value::Bool(l > r)),
        BinaryOp::GtEq => Ok(Value::Bool(l >= r)),
        _ => Err(unit_operator(op.as_symbol(), "unit", "unit")),
    }
}

/// `unit * n` and `unit / n`, rounded to the nearest sub-unit.
#[expect(clippy::cast_precision_loss, reason = "scaling factor applied in f64")]
pub(super) fn eval_unit_scalar(u: UnitValue, scalar: &Value, op: BinaryOp) -> EvalResult {
    let factor = match scalar {
        Value::Int(n) => *n as f64,
        Value::Float(f) => *f,
        _ => return Err(unit_operator(op.as_symbol(), "unit", scalar.type_name())),
    };
    match op {
        BinaryOp::Mul => {
            if let Value::Int(n) = scalar {
                return u
                    .amount
                    .checked_mul(*n)
                    .map(|amount| Value::Unit(u.with_amount(amount)))
                    .ok_or_else(|| integer_overflow("multiplication"));
            }
            scaled(u, u.amount as f64 * factor, "multiplication")
        }
        BinaryOp::Div => {
            if factor == 0.0 {
                return Err(division_by_zero());
            }
            scaled(u, u.amount as f64 / factor, "division")
        }
        BinaryOp::Eq => Ok(Value::Bool(false)),
        BinaryOp::NotEq => Ok(Value::Bool(true)),
        _ => Err(unit_operator(op.as_symbol(), "unit", scalar.type_name())),
    }
}

/// `n * unit` commutes; no other operator promotes a plain number.
pub(super) fn eval_scalar_unit(scalar: &Value, u: UnitValue, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Mul => eval_unit_scalar(u, scalar, op),
        BinaryOp::Eq => Ok(Value::Bool(false)),
        BinaryOp::NotEq => Ok(Value::Bool(true)),
        _ => Err(unit_operator(op.as_symbol(), scalar.type_name(), "unit")),
    }
}

/// `u` with `amount` rounded to the nearest sub-unit. Non-finite or
/// out-of-range amounts are overflow.
#[expect(
    clippy::cast_possible_truncation,
    reason = "range is checked before the cast"
)]
fn scaled(u: UnitValue, amount: f64, op_name: &'static str) -> EvalResult {
    // 2^63: the first float past i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let amount = amount.round();
    if !amount.is_finite() || amount < -LIMIT || amount >= LIMIT {
        return Err(integer_overflow(op_name));
    }
    Ok(Value::Unit(u.with_amount(amount as i64)))
}
