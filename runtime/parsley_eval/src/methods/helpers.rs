//! Argument validation and shared utility functions.

use parsley_value::{
    wrong_arg_count, wrong_arg_count_range, wrong_arg_type, Dictionary, EvalError, EvalResult,
    Heap, Value,
};

/// Validate expected argument count.
#[inline]
pub fn require_args(method: &str, expected: usize, actual: usize) -> Result<(), EvalError> {
    if actual == expected {
        Ok(())
    } else {
        Err(wrong_arg_count(method, expected, actual))
    }
}

/// Validate an argument count within `min..=max`.
#[inline]
pub fn require_args_range(
    method: &str,
    min: usize,
    max: usize,
    actual: usize,
) -> Result<(), EvalError> {
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(wrong_arg_count_range(method, min, max, actual))
    }
}

/// Extract a string argument at the given index.
#[inline]
pub fn require_str_arg<'a>(
    method: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.as_str()),
        _ => Err(wrong_arg_type(method, "string")),
    }
}

/// Extract an integer argument at the given index.
#[inline]
pub fn require_int_arg(method: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match args.get(index) {
        Some(Value::Int(n)) => Ok(*n),
        _ => Err(wrong_arg_type(method, "integer")),
    }
}

/// Extract a dictionary argument at the given index.
#[inline]
pub fn require_dict_arg<'a>(
    method: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a Heap<Dictionary>, EvalError> {
    match args.get(index) {
        Some(Value::Dict(d)) => Ok(d),
        _ => Err(wrong_arg_type(method, "a dictionary")),
    }
}

/// Extract a function argument at the given index.
#[inline]
pub fn require_fn_arg<'a>(
    method: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a Value, EvalError> {
    match args.get(index) {
        Some(f @ Value::Function(_)) => Ok(f),
        _ => Err(wrong_arg_type(method, "a function")),
    }
}

/// Every argument from `start` on, as strings.
pub fn require_str_args<'a>(
    method: &str,
    args: &'a [Value],
    start: usize,
) -> Result<Vec<&'a str>, EvalError> {
    (start..args.len())
        .map(|i| require_str_arg(method, args, i))
        .collect()
}

/// Convert a collection length to a Value, with overflow check.
#[inline]
pub fn len_to_value(len: usize, collection_type: &str) -> EvalResult {
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::new(format!("{collection_type} too large")))
}

/// Strings as an array value.
pub fn str_array<'a>(items: impl IntoIterator<Item = &'a str>) -> Value {
    Value::array(items.into_iter().map(Value::string).collect())
}
