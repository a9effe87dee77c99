#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

mod truthiness {
    use super::*;

    #[test]
    fn falsy_values() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(!Value::array(vec![]).is_truthy());
        assert!(!Value::dict(Dictionary::new()).is_truthy());
    }

    #[test]
    fn truthy_values() {
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(Value::array(vec![Value::Null]).is_truthy());
        assert!(Value::money(Money::new(0, "USD", 2)).is_truthy());
    }
}

#[test]
fn type_names() {
    assert_eq!(Value::Null.type_name(), "null");
    assert_eq!(Value::Int(1).type_name(), "integer");
    assert_eq!(Value::string("x").type_name(), "string");
    assert_eq!(Value::dict(Dictionary::new()).type_name(), "dictionary");
    assert_eq!(
        Value::Unit(UnitValue::from_suffix(1.0, "m").unwrap()).type_name(),
        "unit"
    );
}

mod floats {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_decimal() {
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(100.0), "100");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(0.0001), "0.0001");
    }

    #[test]
    fn exponent_form() {
        assert_eq!(format_float(1_000_000.0), "1e+06");
        assert_eq!(format_float(1.5e-7), "1.5e-07");
        assert_eq!(format_float(2.5e21), "2.5e+21");
    }

    #[test]
    fn non_finite() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
    }
}

mod money {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_with_symbol_and_code() {
        assert_eq!(Money::new(1250, "USD", 2).to_string(), "$12.50");
        assert_eq!(Money::new(-5, "EUR", 2).to_string(), "€-0.05");
        assert_eq!(Money::new(1250, "CHF", 2).to_string(), "CHF#12.50");
        assert_eq!(Money::new(300, "JPY", 0).to_string(), "¥300");
    }

    #[test]
    fn scale_promotion() {
        let m = Money::new(125, "USD", 2);
        assert_eq!(m.amount_at_scale(4), Some(12_500));
        assert_eq!(m.amount_at_scale(1), Some(125));
        assert_eq!(Money::new(i64::MAX, "USD", 0).amount_at_scale(2), None);
    }

    #[test]
    fn bankers_rounding() {
        assert_eq!(bankers_round(2.5), Some(2));
        assert_eq!(bankers_round(3.5), Some(4));
        assert_eq!(bankers_round(2.4), Some(2));
        assert_eq!(bankers_round(2.6), Some(3));
        assert_eq!(bankers_round(-2.5), Some(-2));
        assert_eq!(bankers_round(-3.5), Some(-4));
    }

    #[test]
    fn rounding_rejects_unrepresentable() {
        assert_eq!(bankers_round(f64::INFINITY), None);
        assert_eq!(bankers_round(f64::NEG_INFINITY), None);
        assert_eq!(bankers_round(f64::NAN), None);
        assert_eq!(bankers_round(1e19), None);
        assert_eq!(bankers_round(-1e19), None);
        assert_eq!(bankers_round(-9_223_372_036_854_775_808.0), Some(i64::MIN));
    }
}

mod units {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_amounts() {
        let km = UnitValue::from_suffix(2.5, "km").unwrap();
        assert_eq!(km.amount, 2_500_000_000);
        assert_eq!(km.family, UnitFamily::Length);
        assert_eq!(km.to_string(), "2.5km");

        let inch = UnitValue::from_suffix(1.0, "in").unwrap();
        assert_eq!(inch.amount, HCN / 36);
        assert_eq!(inch.system, UnitSystem::Us);

        assert!(UnitValue::from_suffix(1.0, "parsec").is_none());
    }

    #[test]
    fn inch_is_exactly_25_4_mm() {
        let inch = UnitValue::from_suffix(1.0, "in").unwrap();
        assert_eq!(inch.amount_in(UnitSystem::Si), 25_400);
        let mm = UnitValue::from_suffix(25.4, "mm").unwrap();
        assert_eq!(mm.amount_in(UnitSystem::Us), HCN / 36);
    }

    #[test]
    fn pound_in_grams() {
        let lb = UnitValue::from_suffix(1.0, "lb").unwrap();
        assert_eq!(lb.amount_in(UnitSystem::Si), 453_592);
    }

    #[test]
    fn equality_across_systems() {
        let a = Value::Unit(UnitValue::from_suffix(1.0, "in").unwrap());
        let b = Value::Unit(UnitValue::from_suffix(25.4, "mm").unwrap());
        assert_eq!(a, b);
    }
}

mod dictionaries {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(dict: &Dictionary) -> Vec<&str> {
        dict.keys().collect()
    }

    #[test]
    fn insertion_order_is_kept() {
        let dict = Dictionary::from_values([
            ("b", Value::Int(1)),
            ("a", Value::Int(2)),
            ("c", Value::Int(3)),
        ]);
        assert_eq!(keys(&dict), vec!["b", "a", "c"]);
        assert_eq!(dict.to_string(), "{b: 1, a: 2, c: 3}");
    }

    #[test]
    fn heap_handles_format_as_their_payload() {
        let dict = Dictionary::from_values([("a", Value::Int(1))]);
        let heap = Heap::new(dict.clone());
        assert_eq!(heap.to_string(), dict.to_string());
        assert_eq!(format!("{heap:?}"), format!("{dict:?}"));
        assert_eq!(Value::dict(dict).to_string(), "{a: 1}");
    }

    #[test]
    fn replacing_keeps_position() {
        let mut dict = Dictionary::from_values([("a", Value::Int(1)), ("b", Value::Int(2))]);
        dict.insert_value("a", Value::string("x"));
        assert_eq!(keys(&dict), vec!["a", "b"]);
        assert_eq!(dict.to_string(), "{a: \"x\", b: 2}");
    }

    #[test]
    fn merge_prefers_right_values() {
        let left = Dictionary::from_values([("a", Value::Int(1)), ("b", Value::Int(2))]);
        let right = Dictionary::from_values([("c", Value::Int(3)), ("a", Value::Int(9))]);
        let merged = left.merged(&right);
        assert_eq!(keys(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged.get("a").and_then(Thunk::ready), Some(&Value::Int(9)));
    }

    #[test]
    fn rename_and_remove() {
        let mut dict = Dictionary::from_values([
            ("a", Value::Int(1)),
            ("b", Value::Int(2)),
            ("c", Value::Int(3)),
        ]);
        assert!(dict.rename("b", "z"));
        assert!(!dict.rename("missing", "y"));
        assert_eq!(keys(&dict), vec!["a", "z", "c"]);
        assert!(dict.remove("a").is_some());
        assert_eq!(keys(&dict), vec!["z", "c"]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn insert_at_moves_existing_key() {
        let mut dict = Dictionary::from_values([("a", Value::Int(1)), ("b", Value::Int(2))]);
        dict.insert_at(0, "b", Thunk::Ready(Value::Int(5)));
        dict.insert_at(99, "c", Thunk::Ready(Value::Int(6)));
        assert_eq!(keys(&dict), vec!["b", "a", "c"]);
    }

    proptest! {
        #[test]
        fn keys_are_unique_and_match_entries(
            ops in prop::collection::vec(("[a-e]", any::<bool>()), 0..40)
        ) {
            let mut dict = Dictionary::new();
            for (key, remove) in &ops {
                if *remove {
                    dict.remove(key);
                } else {
                    dict.insert_value(key.as_str(), Value::Int(1));
                }
            }
            let listed: Vec<&str> = dict.keys().collect();
            let mut deduped = listed.clone();
            deduped.sort_unstable();
            deduped.dedup();
            prop_assert_eq!(listed.len(), deduped.len());
            prop_assert_eq!(dict.iter().count(), dict.len());
            for key in listed {
                prop_assert!(dict.contains_key(key));
            }
        }
    }
}

#[test]
fn inspect_nested_strings_are_quoted() {
    let value = Value::array(vec![Value::string("a"), Value::Int(1), Value::Null]);
    assert_eq!(value.to_string(), "[\"a\", 1, null]");
    assert_eq!(Value::string("a").to_string(), "a");
}
