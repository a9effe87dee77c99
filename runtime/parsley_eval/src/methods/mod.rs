//! Method dispatch for built-in types.
//!
//! The receiver set is closed, so dispatch is a match on the receiver's
//! variant and then on the method name.
//!
//! # Module Structure
//!
//! - [`helpers`]: Argument validation and shared utilities
//! - [`collections`]: Methods on dictionaries, arrays, and strings
//! - [`record`]: Record accessors, validation, and error helpers
//! - [`schema`]: Schema metadata lookups
//! - [`table`]: Table transforms, aggregates, and exports

mod collections;
mod helpers;
mod record;
mod schema;
mod table;

use parsley_value::{no_such_method, EvalResult, Value};

use crate::Interpreter;

/// Call `receiver.method(args)` on a built-in type.
pub fn dispatch_builtin_method(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
) -> EvalResult {
    match &receiver {
        Value::Dict(_) => collections::dispatch_dict_method(interp, receiver, method, args),
        Value::Array(_) => collections::dispatch_array_method(interp, receiver, method, args),
        Value::Str(_) => collections::dispatch_string_method(receiver, method, args),
        Value::Record(_) => record::dispatch_record_method(interp, receiver, method, args),
        Value::Schema(_) => schema::dispatch_schema_method(receiver, method, args),
        Value::Table(_) => table::dispatch_table_method(interp, receiver, method, args),
        _ => Err(no_such_method(method, receiver.type_name())),
    }
}
