//! Indexing and slicing.

use parsley_value::{
    index_out_of_bounds, index_type_mismatch, slice_bound, slice_start_after_end, slice_target,
    EvalResult, Record, Table, Value,
};
use tracing::trace;

use crate::compare::ready_or_null;
use crate::record::validate_record;
use crate::Interpreter;

/// Resolve a possibly negative index against `len`.
///
/// Returns `None` when the index falls outside `0..len`.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index.checked_add(len)? } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// `target[index]`.
///
/// With `optional`, out-of-range positions evaluate to null instead of
/// failing. Missing dictionary keys are always null.
pub fn index_value(
    interp: &Interpreter,
    target: &Value,
    index: &Value,
    optional: bool,
) -> EvalResult {
    match (target, index) {
        (Value::Array(items), Value::Int(i)) => match resolve_index(*i, items.len()) {
            Some(pos) => Ok(items[pos].clone()),
            None => out_of_range(*i, items.len(), optional),
        },
        (Value::Str(s), Value::Int(i)) => {
            let len = s.chars().count();
            match resolve_index(*i, len).and_then(|pos| s.chars().nth(pos)) {
                Some(c) => Ok(Value::string(c.to_string())),
                None => out_of_range(*i, len, optional),
            }
        }
        (Value::Table(table), Value::Int(i)) => match resolve_index(*i, table.len()) {
            Some(pos) => Ok(table_row(table, pos)),
            None => out_of_range(*i, table.len(), optional),
        },
        (Value::Dict(dict), Value::Str(key)) => {
            Ok(interp.dict_get(dict, key)?.unwrap_or(Value::Null))
        }
        (Value::Record(record), Value::Str(field)) => Ok(ready_or_null(record.get(field))),
        (Value::Null, _) if optional => Ok(Value::Null),
        _ => Err(index_type_mismatch(target.type_name(), index.type_name())),
    }
}

fn out_of_range(index: i64, len: usize, optional: bool) -> EvalResult {
    if optional {
        trace!(index, len, "optional index out of range");
        Ok(Value::Null)
    } else {
        Err(index_out_of_bounds(index, len))
    }
}

/// Row `pos` of a table: a record when the table has a schema, else the
/// row dictionary.
///
/// Records rebuilt from database rows come back validated; rows from any
/// other source start unvalidated.
pub(crate) fn table_row(table: &Table, pos: usize) -> Value {
    let row = table.rows()[pos].clone();
    match table.schema() {
        Some(schema) => {
            let record = Record::new(schema.clone(), row);
            if table.is_from_db() {
                Value::record(validate_record(&record))
            } else {
                Value::record(record)
            }
        }
        None => Value::dict(row),
    }
}

/// `target[start:end]` on arrays and strings.
///
/// Null bounds default to the ends; negative bounds count from the end.
/// Bounds past the end clamp to the length. A bound still negative after
/// resolution, or a start after the end, fails unless `optional`.
pub fn slice_value(target: &Value, start: &Value, end: &Value, optional: bool) -> EvalResult {
    let len = match target {
        Value::Array(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        other => return Err(slice_target(other.type_name())),
    };
    let Some((from, to)) = slice_bounds(start, end, len, optional)? else {
        return Ok(Value::Null);
    };
    match target {
        Value::Array(items) => Ok(Value::array(items[from..to].to_vec())),
        Value::Str(s) => Ok(Value::string(
            s.chars().skip(from).take(to - from).collect::<String>(),
        )),
        _ => Err(slice_target(target.type_name())),
    }
}

/// Resolved `(start, end)` in `0..=len`, or `None` for an optional miss.
fn slice_bounds(
    start: &Value,
    end: &Value,
    len: usize,
    optional: bool,
) -> Result<Option<(usize, usize)>, parsley_value::EvalError> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let bound = |value: &Value, which: &'static str, default: i64| match value {
        Value::Null => Ok(default),
        Value::Int(n) if *n < 0 => Ok(n.saturating_add(signed_len)),
        Value::Int(n) => Ok(*n),
        other => Err(slice_bound(which, other.type_name())),
    };
    let from = bound(start, "start", 0)?;
    let to = bound(end, "end", signed_len)?;

    for (resolved, original) in [(from, start), (to, end)] {
        if resolved < 0 {
            if optional {
                return Ok(None);
            }
            let original = original.as_int().unwrap_or(resolved);
            return Err(index_out_of_bounds(original, len));
        }
    }
    if from > to {
        if optional {
            return Ok(None);
        }
        return Err(slice_start_after_end(from, to));
    }
    let clamp = |n: i64| usize::try_from(n).map_or(len, |n| n.min(len));
    Ok(Some((clamp(from), clamp(to))))
}
