#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use parsley_value::{Money, UnitValue};

fn unit(value: f64, suffix: &str) -> Value {
    Value::Unit(UnitValue::from_suffix(value, suffix).unwrap())
}

fn usd(amount: i64, scale: u8) -> Value {
    Value::money(Money::new(amount, "USD", scale))
}

fn eval(left: Value, op: BinaryOp, right: Value) -> Value {
    evaluate_binary(left, right, op).unwrap()
}

fn code(left: Value, op: BinaryOp, right: Value) -> &'static str {
    evaluate_binary(left, right, op).unwrap_err().code()
}

mod numbers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_arithmetic() {
        assert_eq!(eval(Value::Int(7), BinaryOp::Add, Value::Int(3)), Value::Int(10));
        assert_eq!(eval(Value::Int(7), BinaryOp::Div, Value::Int(2)), Value::Int(3));
        assert_eq!(eval(Value::Int(-7), BinaryOp::Mod, Value::Int(3)), Value::Int(-1));
    }

    #[test]
    fn mixed_int_float() {
        assert_eq!(
            eval(Value::Int(1), BinaryOp::Add, Value::Float(0.5)),
            Value::Float(1.5)
        );
        assert_eq!(
            eval(Value::Int(2), BinaryOp::Eq, Value::Float(2.0)),
            Value::Bool(true)
        );
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(code(Value::Int(1), BinaryOp::Div, Value::Int(0)), "OP-0002");
        assert_eq!(code(Value::Int(1), BinaryOp::Mod, Value::Int(0)), "OP-0002");
        assert_eq!(code(Value::Float(1.0), BinaryOp::Div, Value::Int(0)), "OP-0002");
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(
            code(Value::Int(i64::MAX), BinaryOp::Add, Value::Int(1)),
            "OP-0003"
        );
        assert_eq!(
            code(Value::Int(i64::MIN), BinaryOp::Div, Value::Int(-1)),
            "OP-0003"
        );
    }
}

mod strings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concatenation() {
        assert_eq!(
            eval(Value::from("a"), BinaryOp::Add, Value::from("b")),
            Value::from("ab")
        );
        assert_eq!(
            eval(Value::from("n="), BinaryOp::Add, Value::Int(3)),
            Value::from("n=3")
        );
        assert_eq!(
            eval(Value::Float(1.5), BinaryOp::Add, Value::from("x")),
            Value::from("1.5x")
        );
    }

    #[test]
    fn natural_ordering() {
        assert_eq!(
            eval(Value::from("item2"), BinaryOp::Lt, Value::from("item10")),
            Value::Bool(true)
        );
    }

    #[test]
    fn subtraction_is_a_type_error() {
        assert_eq!(code(Value::from("a"), BinaryOp::Sub, Value::from("b")), "OP-0001");
    }
}

mod equality {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cross_variant_is_false() {
        assert_eq!(
            eval(Value::from("1"), BinaryOp::Eq, Value::Int(1)),
            Value::Bool(false)
        );
        assert_eq!(
            eval(Value::Null, BinaryOp::Eq, Value::Bool(false)),
            Value::Bool(false)
        );
        assert_eq!(eval(Value::Null, BinaryOp::Eq, Value::Null), Value::Bool(true));
    }

    #[test]
    fn arrays_compare_structurally() {
        let a = Value::array(vec![Value::Int(1), Value::from("x")]);
        let b = Value::array(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(eval(a, BinaryOp::Eq, b), Value::Bool(true));
    }

    #[test]
    fn values_equal_uses_operator_rules() {
        assert!(values_equal(&Value::Int(3), &Value::Float(3.0)));
        assert!(!values_equal(&Value::Int(3), &Value::from("3")));
    }
}

mod logical {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truthiness() {
        assert_eq!(
            eval(Value::Int(0), BinaryOp::Or, Value::from("x")),
            Value::Bool(true)
        );
        assert_eq!(
            eval(Value::array(vec![]), BinaryOp::And, Value::Bool(true)),
            Value::Bool(false)
        );
    }

    #[test]
    fn coalesce() {
        assert_eq!(eval(Value::Null, BinaryOp::Coalesce, Value::Int(2)), Value::Int(2));
        assert_eq!(
            eval(Value::Bool(false), BinaryOp::Coalesce, Value::Int(2)),
            Value::Bool(false)
        );
    }
}

mod membership {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn in_array_uses_equality() {
        let xs = Value::array(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(eval(Value::Float(2.0), BinaryOp::In, xs.clone()), Value::Bool(true));
        assert_eq!(eval(Value::Int(3), BinaryOp::NotIn, xs), Value::Bool(true));
    }

    #[test]
    fn in_null_is_false() {
        assert_eq!(eval(Value::Int(1), BinaryOp::In, Value::Null), Value::Bool(false));
    }

    #[test]
    fn in_string_needs_a_string() {
        assert_eq!(
            eval(Value::from("ell"), BinaryOp::In, Value::from("hello")),
            Value::Bool(true)
        );
        assert_eq!(code(Value::Int(1), BinaryOp::In, Value::from("1")), "OP-0018");
        assert_eq!(code(Value::Int(1), BinaryOp::In, Value::Int(1)), "OP-0016");
    }
}

mod money {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn addition_promotes_scale() {
        assert_eq!(eval(usd(150, 2), BinaryOp::Add, usd(1, 0)), usd(250, 2));
    }

    #[test]
    fn currencies_never_mix() {
        let gbp = Value::money(Money::new(100, "GBP", 2));
        assert_eq!(code(usd(100, 2), BinaryOp::Add, gbp.clone()), "OP-0019");
        assert_eq!(code(usd(100, 2), BinaryOp::Lt, gbp), "OP-0019");
    }

    #[test]
    fn scaling_rounds_half_to_even() {
        assert_eq!(eval(usd(5, 2), BinaryOp::Div, Value::Int(2)), usd(2, 2));
        assert_eq!(eval(usd(15, 2), BinaryOp::Div, Value::Int(2)), usd(8, 2));
        assert_eq!(eval(usd(100, 2), BinaryOp::Mul, Value::Float(0.125)), usd(12, 2));
    }

    #[test]
    fn scalar_times_money_commutes() {
        assert_eq!(eval(Value::Int(3), BinaryOp::Mul, usd(250, 2)), usd(750, 2));
    }

    #[test]
    fn scaling_out_of_range_overflows() {
        assert_eq!(code(usd(100, 2), BinaryOp::Mul, Value::Float(1e308)), "OP-0003");
        assert_eq!(
            code(usd(100, 2), BinaryOp::Mul, Value::Float(f64::INFINITY)),
            "OP-0003"
        );
        assert_eq!(code(usd(100, 2), BinaryOp::Div, Value::Float(f64::NAN)), "OP-0003");
        assert_eq!(code(usd(i64::MAX, 2), BinaryOp::Mul, Value::Int(2)), "OP-0003");
        assert_eq!(code(Value::Float(1e300), BinaryOp::Mul, usd(1, 2)), "OP-0003");
    }

    #[test]
    fn unsupported_operators() {
        assert_eq!(code(usd(1, 2), BinaryOp::Mul, usd(1, 2)), "OP-0020");
        assert_eq!(code(Value::Int(1), BinaryOp::Add, usd(1, 2)), "OP-0020");
        assert_eq!(code(usd(1, 2), BinaryOp::Div, Value::Int(0)), "OP-0002");
    }
}

mod units {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_system_addition() {
        let sum = eval(unit(1.0, "km"), BinaryOp::Add, unit(500.0, "m"));
        assert_eq!(sum.to_string(), "1.5km");
    }

    #[test]
    fn cross_system_normalises_to_left() {
        let sum = eval(unit(1.0, "ft"), BinaryOp::Add, unit(1.0, "in"));
        let Value::Unit(u) = sum else {
            panic!("expected a unit")
        };
        assert_eq!(u.system, UnitValue::from_suffix(1.0, "ft").unwrap().system);
        assert_eq!(
            eval(unit(1.0, "in"), BinaryOp::Eq, unit(25.4, "mm")),
            Value::Bool(true)
        );
    }

    #[test]
    fn ratio_is_dimensionless() {
        assert_eq!(eval(unit(1.0, "km"), BinaryOp::Div, unit(500.0, "m")), Value::Int(2));
        assert_eq!(
            eval(unit(1.0, "m"), BinaryOp::Div, unit(4.0, "m")),
            Value::Float(0.25)
        );
    }

    #[test]
    fn family_mismatch_fails_every_operator_but_equality() {
        for op in [
            BinaryOp::Add,
            BinaryOp::Sub,
            BinaryOp::Div,
            BinaryOp::Lt,
            BinaryOp::GtEq,
        ] {
            assert_eq!(code(unit(1.0, "m"), op, unit(1.0, "kg")), "UNIT-0001");
        }
        assert_eq!(
            eval(unit(1.0, "m"), BinaryOp::Eq, unit(1.0, "kg")),
            Value::Bool(false)
        );
        assert_eq!(
            eval(unit(1.0, "m"), BinaryOp::NotEq, unit(1.0, "kg")),
            Value::Bool(true)
        );
    }

    #[test]
    fn ratio_of_extremes_overflows() {
        let min = Value::Unit(UnitValue::from_suffix(1.0, "mm").unwrap().with_amount(i64::MIN));
        let minus_one = Value::Unit(UnitValue::from_suffix(1.0, "mm").unwrap().with_amount(-1));
        assert_eq!(code(min, BinaryOp::Div, minus_one), "OP-0003");
    }

    #[test]
    fn scaling_out_of_range_overflows() {
        assert_eq!(code(unit(1.0, "km"), BinaryOp::Mul, Value::Float(1e300)), "OP-0003");
        assert_eq!(
            code(unit(1.0, "km"), BinaryOp::Mul, Value::Float(f64::NEG_INFINITY)),
            "OP-0003"
        );
        assert_eq!(code(unit(1.0, "m"), BinaryOp::Div, Value::Float(1e-300)), "OP-0003");
        assert_eq!(code(unit(1.0, "m"), BinaryOp::Div, Value::Float(f64::NAN)), "OP-0003");
        assert_eq!(
            eval(unit(1.0, "m"), BinaryOp::Div, Value::Float(f64::INFINITY)).to_string(),
            "0m"
        );
    }

    #[test]
    fn no_derived_units() {
        assert_eq!(code(unit(1.0, "m"), BinaryOp::Mul, unit(1.0, "m")), "UNIT-0002");
    }

    #[test]
    fn scalars() {
        assert_eq!(
            eval(Value::Int(3), BinaryOp::Mul, unit(2.0, "kg")),
            eval(unit(2.0, "kg"), BinaryOp::Mul, Value::Int(3))
        );
        assert_eq!(code(Value::Int(3), BinaryOp::Add, unit(2.0, "kg")), "UNIT-0002");
        assert_eq!(code(unit(2.0, "kg"), BinaryOp::Sub, Value::Int(1)), "UNIT-0002");
        assert_eq!(code(Value::Int(3), BinaryOp::Div, unit(2.0, "kg")), "UNIT-0002");
        assert_eq!(
            eval(unit(3.0, "m"), BinaryOp::Div, Value::Int(2)).to_string(),
            "1.5m"
        );
    }
}

mod concat {
    use super::*;
    use pretty_assertions::assert_eq;
    use parsley_value::Dictionary;

    #[test]
    fn dictionaries_merge_keeping_left_positions() {
        let left = Value::dict(Dictionary::from_values([("a", Value::Int(1)), ("b", Value::Int(2))]));
        let right =
            Value::dict(Dictionary::from_values([("b", Value::Int(3)), ("c", Value::Int(4))]));
        let Value::Dict(merged) = eval(left, BinaryOp::Concat, right) else {
            panic!("expected a dictionary")
        };
        assert_eq!(merged.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(merged.get("b").unwrap().ready(), Some(&Value::Int(3)));
    }

    #[test]
    fn scalars_become_single_element_arrays() {
        assert_eq!(
            eval(Value::Int(1), BinaryOp::Concat, Value::array(vec![Value::Int(2)])),
            Value::array(vec![Value::Int(1), Value::Int(2)])
        );
        assert_eq!(
            eval(Value::from("a"), BinaryOp::Concat, Value::from("b")),
            Value::array(vec![Value::from("a"), Value::from("b")])
        );
    }
}
