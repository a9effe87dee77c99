#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use parsley_value::{Dictionary, Table, Value};
use proptest::prelude::*;

use crate::Interpreter;

fn ints(xs: &[i64]) -> Value {
    Value::array(xs.iter().copied().map(Value::Int).collect())
}

fn index(target: &Value, i: i64) -> Result<Value, &'static str> {
    index_value(&Interpreter::default(), target, &Value::Int(i), false).map_err(|e| e.code())
}

fn slice(target: &Value, start: Value, end: Value) -> Result<Value, &'static str> {
    slice_value(target, &start, &end, false).map_err(|e| e.code())
}

mod indexing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_counts_from_end() {
        let xs = ints(&[10, 20, 30]);
        assert_eq!(index(&xs, -1), Ok(Value::Int(30)));
        assert_eq!(index(&xs, -3), Ok(Value::Int(10)));
        assert_eq!(index(&xs, -4), Err("INDEX-0001"));
        assert_eq!(index(&xs, 3), Err("INDEX-0001"));
    }

    #[test]
    fn strings_index_by_character() {
        let s = Value::from("héllo");
        assert_eq!(index(&s, 1), Ok(Value::from("é")));
        assert_eq!(index(&s, -1), Ok(Value::from("o")));
    }

    #[test]
    fn optional_index_yields_null() {
        let interp = Interpreter::default();
        let xs = ints(&[1]);
        assert_eq!(
            index_value(&interp, &xs, &Value::Int(5), true).unwrap(),
            Value::Null
        );
        assert_eq!(
            index_value(&interp, &Value::Null, &Value::Int(0), true).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn missing_dictionary_key_is_null() {
        let dict = Value::dict(Dictionary::from_values([("a", Value::Int(1))]));
        let interp = Interpreter::default();
        assert_eq!(
            index_value(&interp, &dict, &Value::from("a"), false).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            index_value(&interp, &dict, &Value::from("b"), false).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn wrong_index_type() {
        assert_eq!(
            index_value(
                &Interpreter::default(),
                &ints(&[1]),
                &Value::from("a"),
                false
            )
            .unwrap_err()
            .code(),
            "INDEX-0002"
        );
    }

    #[test]
    fn table_rows_are_dictionaries() {
        let row = Dictionary::from_values([("a", Value::Int(1))]);
        let table = Value::table(Table::new(vec!["a".into()], vec![row.clone()]));
        assert_eq!(index(&table, 0), Ok(Value::dict(row)));
        assert_eq!(index(&table, 1), Err("INDEX-0001"));
    }

    #[test]
    fn resolve_index_bounds() {
        assert_eq!(resolve_index(0, 0), None);
        assert_eq!(resolve_index(-1, 2), Some(1));
        assert_eq!(resolve_index(i64::MIN, 2), None);
    }
}

mod slicing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_and_negatives() {
        let xs = ints(&[1, 2, 3, 4]);
        assert_eq!(slice(&xs, Value::Null, Value::Int(2)), Ok(ints(&[1, 2])));
        assert_eq!(slice(&xs, Value::Int(-2), Value::Null), Ok(ints(&[3, 4])));
        assert_eq!(slice(&xs, Value::Null, Value::Null), Ok(xs.clone()));
    }

    #[test]
    fn overruns_clamp() {
        let xs = ints(&[1, 2]);
        assert_eq!(slice(&xs, Value::Int(1), Value::Int(99)), Ok(ints(&[2])));
        assert_eq!(slice(&xs, Value::Int(5), Value::Int(9)), Ok(ints(&[])));
    }

    #[test]
    fn start_after_end() {
        let xs = ints(&[1, 2, 3]);
        assert_eq!(slice(&xs, Value::Int(2), Value::Int(1)), Err("INDEX-0003"));
        assert_eq!(
            slice_value(&xs, &Value::Int(2), &Value::Int(1), true).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn too_negative_is_out_of_bounds() {
        let xs = ints(&[1, 2, 3]);
        assert_eq!(slice(&xs, Value::Int(-9), Value::Null), Err("INDEX-0001"));
    }

    #[test]
    fn strings_and_bad_targets() {
        assert_eq!(
            slice(&Value::from("héllo"), Value::Int(1), Value::Int(3)),
            Ok(Value::from("él"))
        );
        assert_eq!(
            slice(&Value::Int(1), Value::Null, Value::Null),
            Err("INDEX-0004")
        );
        assert_eq!(
            slice(&ints(&[1]), Value::from("a"), Value::Null),
            Err("INDEX-0005")
        );
    }
}

mod collections {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn membership_by_container() {
        let dict = Value::dict(Dictionary::from_values([("k", Value::Null)]));
        assert!(membership(&Value::from("k"), &dict).unwrap());
        assert_eq!(
            membership(&Value::Int(1), &dict).unwrap_err().code(),
            "OP-0017"
        );
        assert!(membership(&Value::Int(2), &ints(&[1, 2])).unwrap());
        assert!(!membership(&Value::Int(2), &Value::Null).unwrap());
    }

    #[test]
    fn concat_arrays() {
        assert_eq!(concat(&ints(&[1]), &ints(&[2, 3])), ints(&[1, 2, 3]));
        assert_eq!(
            concat(&ints(&[1]), &Value::Null),
            Value::array(vec![Value::Int(1), Value::Null])
        );
    }
}

proptest! {
    #[test]
    fn negative_index_matches_offset(xs in prop::collection::vec(any::<i64>(), 1..20), k in 1usize..20) {
        prop_assume!(k <= xs.len());
        let arr = ints(&xs);
        let neg = -i64::try_from(k).unwrap();
        let pos = i64::try_from(xs.len() - k).unwrap();
        prop_assert_eq!(index(&arr, neg), index(&arr, pos));
    }

    #[test]
    fn slicing_never_panics(len in 0usize..10, start in -20i64..20, end in -20i64..20) {
        let arr = ints(&(0..i64::try_from(len).unwrap()).collect::<Vec<_>>());
        let _ = slice_value(&arr, &Value::Int(start), &Value::Int(end), false);
        let optional = slice_value(&arr, &Value::Int(start), &Value::Int(end), true);
        prop_assert!(optional.is_ok());
    }

    #[test]
    fn dict_concat_keeps_left_order(a in 0i64..100, b in 0i64..100) {
        let left = Value::dict(Dictionary::from_values([("x", Value::Int(a)), ("y", Value::Int(a))]));
        let right = Value::dict(Dictionary::from_values([("z", Value::Int(b)), ("x", Value::Int(b))]));
        let Value::Dict(merged) = concat(&left, &right) else {
            panic!("expected a dictionary");
        };
        prop_assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
        prop_assert_eq!(merged.get("x").unwrap().ready(), Some(&Value::Int(b)));
    }
}
