//! Money arithmetic.
//!
//! Two amounts only combine in the same currency, at the larger of their
//! two scales. Scaling by a plain number rounds half to even.

use parsley_ir::BinaryOp;
use parsley_value::{
    bankers_round, currency_mismatch, division_by_zero, integer_overflow, money_operator,
    EvalResult, Money, Value,
};

/// Money on both sides.
pub(super) fn eval_money_binary(a: &Money, b: &Money, op: BinaryOp) -> EvalResult {
    if a.currency != b.currency {
        return Err(currency_mismatch(&a.currency, &b.currency));
    }
    let scale = a.scale.max(b.scale);
    let (Some(l), Some(r)) = (a.amount_at_scale(scale), b.amount_at_scale(scale)) else {
        return Err(integer_overflow("currency scaling"));
    };
    let money = |amount: Option<i64>, op_name: &'static str| {
        amount
            .map(|amount| Value::money(Money::new(amount, a.currency.clone(), scale)))
            .ok_or_else(|| integer_overflow(op_name))
    };
    match op {
        BinaryOp::Add => money(l.checked_add(r), "addition"),
        BinaryOp::Sub => money(l.checked_sub(r), "subtraction"),
        BinaryOp::Eq => Ok(Value::Bool(l == r)),
        BinaryOp::NotEq => Ok(Value::Bool(l != r)),
        BinaryOp::Lt => Ok(Value::Bool(l < r)),
        BinaryOp::LtEq => Ok(Value::Bool(l <= r)),
        BinaryOp::Gt => Ok(Value::Bool(l > r)),
        BinaryOp::GtEq => Ok(Value::Bool(l >= r)),
        _ => Err(money_operator(op.as_symbol())),
    }
}

/// `money * n` and `money / n`.
#[expect(clippy::cast_precision_loss, reason = "scaling factor applied in f64")]
pub(super) fn eval_money_scalar(m: &Money, scalar: &Value, op: BinaryOp) -> EvalResult {
    let factor = match scalar {
        Value::Int(n) => *n as f64,
        Value::Float(f) => *f,
        _ => return Err(money_operator(op.as_symbol())),
    };
    match op {
        BinaryOp::Mul => {
            if let Value::Int(n) = scalar {
                let amount = m
                    .amount
                    .checked_mul(*n)
                    .ok_or_else(|| integer_overflow("multiplication"))?;
                return Ok(scaled(m, amount));
            }
            rounded(m, m.amount as f64 * factor, "multiplication")
        }
        BinaryOp::Div => {
            if factor == 0.0 {
                return Err(division_by_zero());
            }
            rounded(m, m.amount as f64 / factor, "division")
        }
        BinaryOp::Eq => Ok(Value::Bool(false)),
        BinaryOp::NotEq => Ok(Value::Bool(true)),
        _ => Err(money_operator(op.as_symbol())),
    }
}

/// `n * money` commutes; every other scalar-on-the-left operator is an error.
pub(super) fn eval_scalar_money(scalar: &Value, m: &Money, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Mul => eval_money_scalar(m, scalar, op),
        BinaryOp::Eq => Ok(Value::Bool(false)),
        BinaryOp::NotEq => Ok(Value::Bool(true)),
        _ => Err(money_operator(op.as_symbol())),
    }
}

/// `m` with a float amount rounded half to even; non-finite or
/// out-of-range results are overflow.
fn rounded(m: &Money, amount: f64, op_name: &'static str) -> EvalResult {
    let amount = bankers_round(amount).ok_or_else(|| integer_overflow(op_name))?;
    Ok(scaled(m, amount))
}

fn scaled(m: &Money, amount: i64) -> Value {
    Value::money(Money::new(amount, m.currency.clone(), m.scale))
}
