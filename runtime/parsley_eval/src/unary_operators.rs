//! Unary operator implementations for the evaluator.
//!
//! Direct enum-based dispatch over `(value, op)` pairs.

use parsley_ir::UnaryOp;
use parsley_value::{integer_overflow, invalid_unary_op, EvalResult, Money, Value};

/// Evaluate a prefix operator.
///
/// `!` negates truthiness and applies to every value; `-` applies to
/// integers, floats, money, and units.
pub fn evaluate_unary(value: Value, op: UnaryOp) -> EvalResult {
    match (&value, op) {
        (_, UnaryOp::Not) => Ok(Value::Bool(!value.is_truthy())),

        (Value::Int(n), UnaryOp::Neg) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (Value::Float(f), UnaryOp::Neg) => Ok(Value::Float(-f)),
        (Value::Money(m), UnaryOp::Neg) => {
            let amount = m
                .amount
                .checked_neg()
                .ok_or_else(|| integer_overflow("negation"))?;
            Ok(Value::money(Money::new(amount, m.currency.clone(), m.scale)))
        }
        (Value::Unit(u), UnaryOp::Neg) => u
            .amount
            .checked_neg()
            .map(|amount| Value::Unit(u.with_amount(amount)))
            .ok_or_else(|| integer_overflow("negation")),

        _ => Err(invalid_unary_op(op.as_symbol(), value.type_name())),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use parsley_value::UnitValue;

    mod negation {
        use super::*;

        #[test]
        fn int() {
            assert_eq!(
                evaluate_unary(Value::Int(5), UnaryOp::Neg).unwrap(),
                Value::Int(-5)
            );
        }

        #[test]
        fn int_min_overflows() {
            let err = evaluate_unary(Value::Int(i64::MIN), UnaryOp::Neg).unwrap_err();
            assert_eq!(err.code(), "OP-0003");
        }

        #[test]
        fn float() {
            assert_eq!(
                evaluate_unary(Value::Float(2.5), UnaryOp::Neg).unwrap(),
                Value::Float(-2.5)
            );
        }

        #[test]
        fn money_keeps_currency_and_scale() {
            let money = Value::money(Money::new(1250, "USD", 2));
            assert_eq!(
                evaluate_unary(money, UnaryOp::Neg).unwrap(),
                Value::money(Money::new(-1250, "USD", 2))
            );
        }

        #[test]
        fn unit() {
            let km = UnitValue::from_suffix(2.0, "km").unwrap();
            let negated = evaluate_unary(Value::Unit(km), UnaryOp::Neg).unwrap();
            assert_eq!(negated.to_string(), "-2km");
        }

        #[test]
        fn string_is_an_error() {
            let err = evaluate_unary(Value::string("a"), UnaryOp::Neg).unwrap_err();
            assert_eq!(err.code(), "OP-0004");
        }
    }

    mod not {
        use super::*;

        #[test]
        fn negates_truthiness() {
            assert_eq!(
                evaluate_unary(Value::Bool(true), UnaryOp::Not).unwrap(),
                Value::Bool(false)
            );
            assert_eq!(
                evaluate_unary(Value::Null, UnaryOp::Not).unwrap(),
                Value::Bool(true)
            );
            assert_eq!(
                evaluate_unary(Value::string(""), UnaryOp::Not).unwrap(),
                Value::Bool(true)
            );
            assert_eq!(
                evaluate_unary(Value::Int(3), UnaryOp::Not).unwrap(),
                Value::Bool(false)
            );
        }
    }
}
