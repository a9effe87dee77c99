//! Methods on schemas, shared with the record proxies.

use parsley_value::{no_such_method, EvalResult, Heap, Schema, Value};

use super::helpers::{require_args, require_str_arg, str_array};

/// Dispatch methods on schema values.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Consistent method dispatch signature"
)]
pub fn dispatch_schema_method(receiver: Value, method: &str, args: Vec<Value>) -> EvalResult {
    let Value::Schema(schema) = &receiver else {
        unreachable!("dispatch_schema_method called with non-schema receiver")
    };

    match method {
        "fields" => {
            require_args("fields", 0, args.len())?;
            Ok(str_array(schema.field_names()))
        }
        "visibleFields" => {
            require_args("visibleFields", 0, args.len())?;
            Ok(str_array(schema.visible_fields()))
        }
        "primaryKey" => {
            require_args("primaryKey", 0, args.len())?;
            Ok(schema.primary_key().map_or(Value::Null, Value::string))
        }
        "name" => {
            require_args("name", 0, args.len())?;
            Ok(Value::string(schema.name()))
        }
        _ => schema_field_method(schema, method, &args),
    }
}

/// Per-field metadata lookups: `title`, `placeholder`, `meta`, and
/// `enumValues`.
pub(super) fn schema_field_method(
    schema: &Heap<Schema>,
    method: &str,
    args: &[Value],
) -> EvalResult {
    match method {
        "title" => {
            require_args("title", 1, args.len())?;
            Ok(Value::string(schema.title(require_str_arg("title", args, 0)?)))
        }
        "placeholder" => {
            require_args("placeholder", 1, args.len())?;
            Ok(schema.placeholder(require_str_arg("placeholder", args, 0)?))
        }
        "meta" => {
            require_args("meta", 2, args.len())?;
            let field = require_str_arg("meta", args, 0)?;
            let key = require_str_arg("meta", args, 1)?;
            Ok(schema.meta(field, key))
        }
        "enumValues" => {
            require_args("enumValues", 1, args.len())?;
            let field = require_str_arg("enumValues", args, 0)?;
            Ok(str_array(
                schema.enum_values(field).iter().map(String::as_str),
            ))
        }
        _ => Err(no_such_method(method, "schema")),
    }
}
