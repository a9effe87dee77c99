//! Conversions out of the value model: template strings and JSON.

use parsley_value::{format_float, Dictionary, Table, Value};
use serde_json::{Map, Number};

use crate::compare::ready_or_null;

/// The text a value renders as when interpolated into output.
///
/// Distinct from inspect (`Display`): null renders as nothing, arrays
/// concatenate their elements, and records render as a JSON object.
/// Expects evaluated entries; [`Interpreter::template_string`] resolves
/// dictionaries first.
///
/// [`Interpreter::template_string`]: crate::Interpreter::template_string
pub(crate) fn to_template_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Str(s) => s.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Array(items) => items.iter().map(to_template_string).collect(),
        Value::Record(_) => to_json(value).to_string(),
        other => other.to_string(),
    }
}

/// JSON form of a value. Dictionaries keep their key order.
///
/// Non-finite floats become `null`; money, units, and other non-JSON
/// values become their inspect string. Deferred entries read as null, so
/// callers pass resolved values ([`Interpreter::to_json`] does).
///
/// [`Interpreter::to_json`]: crate::Interpreter::to_json
pub(crate) fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number(Number::from(*n)),
        Value::Float(f) => {
            Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Dict(dict) => dict_to_json(dict, None),
        Value::Record(record) => dict_to_json(record.data(), None),
        Value::Table(table) => table_to_json(table),
        other => serde_json::Value::String(other.to_string()),
    }
}

/// A table as an array of row objects in column order.
pub(crate) fn table_to_json(table: &Table) -> serde_json::Value {
    serde_json::Value::Array(
        table
            .rows()
            .iter()
            .map(|row| dict_to_json(row, Some(table.columns())))
            .collect(),
    )
}

/// A dictionary as a JSON object, restricted to `columns` when given.
fn dict_to_json(dict: &Dictionary, columns: Option<&[String]>) -> serde_json::Value {
    let mut object = Map::new();
    match columns {
        Some(columns) => {
            for column in columns {
                object.insert(column.clone(), to_json(&ready_or_null(dict.get(column))));
            }
        }
        None => {
            for (key, thunk) in dict.iter() {
                object.insert(key.to_string(), to_json(&ready_or_null(Some(thunk))));
            }
        }
    }
    serde_json::Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsley_value::Money;
    use pretty_assertions::assert_eq;

    #[test]
    fn template_strings() {
        assert_eq!(to_template_string(&Value::Null), "");
        assert_eq!(to_template_string(&Value::string("hi")), "hi");
        assert_eq!(to_template_string(&Value::Float(1e6)), "1e+06");
        assert_eq!(
            to_template_string(&Value::array(vec![
                Value::Int(1),
                Value::string("a"),
                Value::Null
            ])),
            "1a"
        );
        assert_eq!(
            to_template_string(&Value::money(Money::new(1999, "USD", 2))),
            "$19.99"
        );
    }

    #[test]
    fn json_keeps_key_order() {
        let dict = Dictionary::from_values([
            ("z", Value::Int(1)),
            ("a", Value::array(vec![Value::Bool(true), Value::Null])),
        ]);
        assert_eq!(
            to_json(&Value::dict(dict)).to_string(),
            r#"{"z":1,"a":[true,null]}"#
        );
        assert_eq!(to_json(&Value::Float(f64::NAN)), serde_json::Value::Null);
    }
}
