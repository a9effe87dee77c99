//! Methods on dictionaries, arrays, and strings.

use parsley_value::{no_such_method, EvalResult, Value};

use super::helpers::{len_to_value, require_args, require_fn_arg, require_str_arg, str_array};
use crate::Interpreter;

/// Dispatch methods on dictionary values.
///
/// `delete` and `set` return a new dictionary; the receiver is shared
/// and never changes.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Consistent method dispatch signature"
)]
pub fn dispatch_dict_method(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
) -> EvalResult {
    let Value::Dict(dict) = &receiver else {
        unreachable!("dispatch_dict_method called with non-dictionary receiver")
    };

    match method {
        "keys" => {
            require_args("keys", 0, args.len())?;
            Ok(str_array(dict.keys()))
        }
        "values" => {
            require_args("values", 0, args.len())?;
            let values = dict
                .iter()
                .map(|(_, thunk)| interp.force(thunk, &receiver))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(values))
        }
        "has" => {
            require_args("has", 1, args.len())?;
            let key = require_str_arg("has", &args, 0)?;
            Ok(Value::Bool(dict.contains_key(key)))
        }
        "len" => {
            require_args("len", 0, args.len())?;
            len_to_value(dict.len(), "dictionary")
        }
        "delete" => {
            require_args("delete", 1, args.len())?;
            let key = require_str_arg("delete", &args, 0)?;
            let mut copy = (**dict).clone();
            copy.remove(key);
            Ok(Value::dict(copy))
        }
        "set" => {
            require_args("set", 2, args.len())?;
            let key = require_str_arg("set", &args, 0)?;
            let mut copy = (**dict).clone();
            copy.insert_value(key, args[1].clone());
            Ok(Value::dict(copy))
        }
        _ => Err(no_such_method(method, "dictionary")),
    }
}

/// Dispatch methods on array values.
pub fn dispatch_array_method(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
) -> EvalResult {
    let Value::Array(items) = receiver else {
        unreachable!("dispatch_array_method called with non-array receiver")
    };

    match method {
        "len" => {
            require_args("len", 0, args.len())?;
            len_to_value(items.len(), "array")
        }
        "reverse" => {
            require_args("reverse", 0, args.len())?;
            Ok(Value::array(items.iter().rev().cloned().collect()))
        }
        "map" => {
            require_args("map", 1, args.len())?;
            let func = require_fn_arg("map", &args, 0)?;
            let mapped = items
                .iter()
                .map(|item| interp.call(func, vec![item.clone()]))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(mapped))
        }
        "filter" => {
            require_args("filter", 1, args.len())?;
            let func = require_fn_arg("filter", &args, 0)?;
            let mut kept = Vec::new();
            for item in items.iter() {
                if interp.call(func, vec![item.clone()])?.is_truthy() {
                    kept.push(item.clone());
                }
            }
            Ok(Value::array(kept))
        }
        _ => Err(no_such_method(method, "array")),
    }
}

/// Dispatch methods on string values. Lengths count characters.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Consistent method dispatch signature"
)]
pub fn dispatch_string_method(receiver: Value, method: &str, args: Vec<Value>) -> EvalResult {
    let Value::Str(s) = &receiver else {
        unreachable!("dispatch_string_method called with non-string receiver")
    };

    match method {
        "len" => {
            require_args("len", 0, args.len())?;
            len_to_value(s.chars().count(), "string")
        }
        "upper" => {
            require_args("upper", 0, args.len())?;
            Ok(Value::string(s.to_uppercase()))
        }
        "lower" => {
            require_args("lower", 0, args.len())?;
            Ok(Value::string(s.to_lowercase()))
        }
        "trim" => {
            require_args("trim", 0, args.len())?;
            Ok(Value::string(s.trim()))
        }
        _ => Err(no_such_method(method, "string")),
    }
}
