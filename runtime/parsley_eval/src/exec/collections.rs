//! `++` and `in`.

use parsley_value::{membership_container, membership_key, EvalError, Value};

use crate::operators::values_equal;

/// `left ++ right`.
///
/// Two dictionaries merge (right-hand values win, left-hand positions
/// are kept). Any other pair concatenates positionally, with a non-array
/// operand standing in as a one-element array.
pub fn concat(left: &Value, right: &Value) -> Value {
    if let (Value::Dict(a), Value::Dict(b)) = (left, right) {
        return Value::dict(a.merged(b));
    }
    let mut items = as_items(left);
    items.extend(as_items(right));
    Value::array(items)
}

fn as_items(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.to_vec(),
        other => vec![other.clone()],
    }
}

/// `needle in haystack`.
///
/// Arrays test element equality, dictionaries test string keys, strings
/// test substrings. A null haystack contains nothing.
pub fn membership(needle: &Value, haystack: &Value) -> Result<bool, EvalError> {
    match haystack {
        Value::Null => Ok(false),
        Value::Array(items) => Ok(items.iter().any(|item| values_equal(needle, item))),
        Value::Dict(dict) => match needle {
            Value::Str(key) => Ok(dict.contains_key(key)),
            other => Err(membership_key("dictionary", other.type_name())),
        },
        Value::Str(text) => match needle {
            Value::Str(part) => Ok(text.contains(part.as_str())),
            other => Err(membership_key("string", other.type_name())),
        },
        other => Err(membership_container(other.type_name())),
    }
}
