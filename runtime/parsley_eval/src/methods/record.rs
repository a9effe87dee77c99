//! Methods on records.
//!
//! Every method that changes data or errors returns a new record.

use std::collections::BTreeMap;

use parsley_value::{
    no_such_method, unknown_field, Dictionary, EvalResult, FieldError, Record, ValidationCode,
    Value,
};

use super::helpers::{
    require_args, require_args_range, require_dict_arg, require_str_arg, str_array,
};
use super::schema::schema_field_method;
use crate::compare::ready_or_null;
use crate::record::{cast_field_value, validate_record};
use crate::Interpreter;

/// Dispatch methods on record values.
pub fn dispatch_record_method(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
) -> EvalResult {
    let Value::Record(record) = receiver else {
        unreachable!("dispatch_record_method called with non-record receiver")
    };

    match method {
        "get" => {
            require_args("get", 1, args.len())?;
            let field = require_str_arg("get", &args, 0)?;
            if !record.schema().has_field(field) {
                return Err(unknown_field(field, record.schema().name()));
            }
            Ok(ready_or_null(record.get(field)))
        }
        "set" => {
            require_args("set", 2, args.len())?;
            let field = require_str_arg("set", &args, 0)?;
            let type_name = record
                .schema()
                .field(field)
                .map(|f| f.type_name.clone())
                .ok_or_else(|| unknown_field(field, record.schema().name()))?;
            let value = cast_field_value(interp.resolve_deep(&args[1])?, &type_name);
            Ok(Value::record(record.with_field(field, value)?))
        }
        "update" => {
            require_args("update", 1, args.len())?;
            let changes = interp.force_dict(require_dict_arg("update", &args, 0)?)?;
            Ok(Value::record(update(&record, &changes)))
        }
        "validate" => {
            require_args("validate", 0, args.len())?;
            Ok(Value::record(validate_record(&record)))
        }
        "isValid" => {
            require_args("isValid", 0, args.len())?;
            Ok(Value::Bool(record.is_valid()))
        }
        "errors" => {
            require_args("errors", 0, args.len())?;
            Ok(Value::dict(errors_dict(record.errors())))
        }
        "error" | "errorCode" | "hasError" => {
            require_args(method, 1, args.len())?;
            let field = require_str_arg(method, &args, 0)?;
            let found = record.error(field);
            Ok(match method {
                "error" => found.map_or(Value::Null, |e| Value::string(e.message.as_str())),
                "errorCode" => found.map_or(Value::Null, |e| Value::string(e.code.as_str())),
                _ => Value::Bool(found.is_some()),
            })
        }
        "errorList" => {
            require_args("errorList", 0, args.len())?;
            let list = record
                .errors()
                .iter()
                .map(|(field, error)| {
                    Value::dict(Dictionary::from_values([
                        ("field", Value::string(field.as_str())),
                        ("code", Value::string(error.code.as_str())),
                        ("message", Value::string(error.message.as_str())),
                    ]))
                })
                .collect();
            Ok(Value::array(list))
        }
        "withError" => {
            require_args_range("withError", 2, 3, args.len())?;
            let field = require_str_arg("withError", &args, 0)?;
            let error = if args.len() == 2 {
                FieldError::new(
                    ValidationCode::Custom.as_str(),
                    require_str_arg("withError", &args, 1)?,
                )
            } else {
                FieldError::new(
                    require_str_arg("withError", &args, 1)?,
                    require_str_arg("withError", &args, 2)?,
                )
            };
            Ok(Value::record(record.with_error(field, error)))
        }
        "schema" => {
            require_args("schema", 0, args.len())?;
            Ok(Value::Schema(record.schema().clone()))
        }
        "data" | "toDictionary" => {
            require_args(method, 0, args.len())?;
            Ok(Value::dict(record.data().clone()))
        }
        "toDictionaryWithErrors" => {
            require_args("toDictionaryWithErrors", 0, args.len())?;
            let mut dict = record.data().clone();
            if record.is_validated() && !record.errors().is_empty() {
                dict.insert_value("__errors__", Value::dict(errors_dict(record.errors())));
            }
            Ok(Value::dict(dict))
        }
        "keys" => {
            require_args("keys", 0, args.len())?;
            Ok(str_array(record.schema().field_names()))
        }
        "title" | "placeholder" | "meta" | "enumValues" => {
            schema_field_method(record.schema(), method, &args)
        }
        _ => Err(no_such_method(method, "record")),
    }
}

/// Merge `changes` into the record's declared fields, casting each value.
/// Undeclared keys are ignored. Like `set`, the result is unvalidated.
fn update(record: &Record, changes: &Dictionary) -> Record {
    let mut data = record.data().clone();
    for (key, thunk) in changes.iter() {
        if let Some(field) = record.schema().field(key) {
            let value = cast_field_value(ready_or_null(Some(thunk)), &field.type_name);
            data.insert_value(key, value);
        }
    }
    record.with_data(data)
}

/// `{field: {code, message}}`, sorted by field.
fn errors_dict(errors: &BTreeMap<String, FieldError>) -> Dictionary {
    Dictionary::from_values(errors.iter().map(|(field, error)| {
        (
            field.as_str(),
            Value::dict(Dictionary::from_values([
                ("code", Value::string(error.code.as_str())),
                ("message", Value::string(error.message.as_str())),
            ])),
        )
    }))
}
