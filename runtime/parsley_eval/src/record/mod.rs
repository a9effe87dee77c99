//! Record creation, casting, and validation.
//!
//! # Validation Order
//!
//! Per field, the first failing rule wins: required, then (for non-null
//! values) type, format, length/value constraints, and enum membership.
//! A validated record therefore carries at most one error per field.

mod formats;

use std::collections::BTreeMap;

use parsley_value::{
    format_float, Dictionary, FieldError, Heap, Record, Schema, SchemaField, StringKind,
    TypeFamily, ValidationCode, Value,
};
use tracing::debug;

use crate::compare::ready_or_null;

/// Bind `data` to `schema`.
///
/// Every declared field, in declaration order, gets the supplied value
/// cast to the field's type, else the field default, else null. Keys the
/// schema does not declare are dropped. The result is unvalidated.
///
/// `data` must hold forced entries; [`crate::Interpreter::create_record`]
/// forces a literal dictionary first.
pub fn create_record(schema: &Heap<Schema>, data: &Dictionary) -> Record {
    let mut fields = Dictionary::new();
    for field in schema.fields() {
        let value = match data.get(&field.name) {
            Some(thunk) => cast_field_value(ready_or_null(Some(thunk)), &field.type_name),
            None => field.default.clone().unwrap_or(Value::Null),
        };
        fields.insert_value(field.name.clone(), value);
    }
    Record::new(schema.clone(), fields)
}

/// Cast `value` toward the declared type `type_name`.
///
/// Values that cannot be cast are kept as they are and left for
/// validation to report.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "float-to-int casts truncate toward zero"
)]
pub fn cast_field_value(value: Value, type_name: &str) -> Value {
    match (TypeFamily::of(type_name), &value) {
        (TypeFamily::Integer, Value::Float(f)) => Value::Int(f.trunc() as i64),
        (TypeFamily::Integer, Value::Str(s)) => {
            s.trim().parse::<i64>().map_or(value, Value::Int)
        }
        (TypeFamily::Integer, Value::Bool(b)) => Value::Int(i64::from(*b)),

        (TypeFamily::Float, Value::Int(n)) => Value::Float(*n as f64),
        (TypeFamily::Float, Value::Str(s)) => s.trim().parse::<f64>().map_or(value, Value::Float),

        (TypeFamily::Boolean, Value::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Value::Bool(true),
            "false" | "0" | "no" | "" => Value::Bool(false),
            _ => value,
        },
        (TypeFamily::Boolean, Value::Int(n)) => Value::Bool(*n != 0),

        (TypeFamily::String(_), Value::Int(n)) => Value::string(n.to_string()),
        (TypeFamily::String(_), Value::Float(f)) => Value::string(format_float(*f)),
        (TypeFamily::String(_), Value::Bool(b)) => Value::string(b.to_string()),

        _ => value,
    }
}

/// Validate every field and return a validated copy of `record`.
pub fn validate_record(record: &Record) -> Record {
    let schema = record.schema();
    let mut errors = BTreeMap::new();
    for field in schema.fields() {
        let value = ready_or_null(record.get(&field.name));
        if let Some(error) = validate_field(field, &value) {
            errors.insert(field.name.clone(), error);
        }
    }
    debug!(
        schema = schema.name(),
        errors = errors.len(),
        "validated record"
    );
    record.with_validation(errors)
}

fn validate_field(field: &SchemaField, value: &Value) -> Option<FieldError> {
    let title = field.title();
    let error = |code: ValidationCode, message: String| Some(FieldError::new(code.as_str(), message));

    if value.is_null() {
        if field.required {
            return error(ValidationCode::Required, format!("{title} is required"));
        }
        return None;
    }

    let family = field.family();
    let type_ok = match family {
        TypeFamily::Integer => matches!(value, Value::Int(_)),
        TypeFamily::Float => matches!(value, Value::Int(_) | Value::Float(_)),
        TypeFamily::Boolean => matches!(value, Value::Bool(_)),
        TypeFamily::String(_) => matches!(value, Value::Str(_)),
        TypeFamily::Other => true,
    };
    if !type_ok {
        return error(
            ValidationCode::Type,
            format!("{title} must be a {}", family.description()),
        );
    }

    if let Value::Str(s) = value {
        if !s.is_empty() {
            if let TypeFamily::String(kind) = family {
                if kind != StringKind::Plain && !formats::is_valid(kind, s) {
                    return error(
                        ValidationCode::Format,
                        format!("{title} is not a valid {}", kind.description()),
                    );
                }
            }
            if field.pattern.as_ref().is_some_and(|re| !re.is_match(s)) {
                return error(
                    ValidationCode::Format,
                    format!("{title} has an invalid format"),
                );
            }
        }
    }

    if let Some(found) = check_constraints(field, value, &title) {
        return Some(found);
    }

    if let Value::Str(s) = value {
        if !field.enum_values.is_empty() && !field.enum_values.iter().any(|v| v == s.as_str()) {
            return error(
                ValidationCode::Enum,
                format!("{title} must be one of: {}", field.enum_values.join(", ")),
            );
        }
    }
    None
}

/// Length bounds on strings (in characters), value bounds on numbers.
#[expect(clippy::cast_precision_loss, reason = "bounds compared as f64 for floats")]
fn check_constraints(field: &SchemaField, value: &Value, title: &str) -> Option<FieldError> {
    let error = |code: ValidationCode, message: String| Some(FieldError::new(code.as_str(), message));
    match value {
        Value::Str(s) => {
            let length = s.chars().count();
            if let Some(min) = field.min_length.filter(|min| length < *min) {
                return error(
                    ValidationCode::MinLength,
                    format!("{title} must be at least {min} characters"),
                );
            }
            if let Some(max) = field.max_length.filter(|max| length > *max) {
                return error(
                    ValidationCode::MaxLength,
                    format!("{title} must be at most {max} characters"),
                );
            }
        }
        Value::Int(_) | Value::Float(_) => {
            let n = value.as_f64().unwrap_or(0.0);
            if let Some(min) = field.min_value.filter(|min| n < *min as f64) {
                return error(
                    ValidationCode::MinValue,
                    format!("{title} must be at least {min}"),
                );
            }
            if let Some(max) = field.max_value.filter(|max| n > *max as f64) {
                return error(
                    ValidationCode::MaxValue,
                    format!("{title} must be at most {max}"),
                );
            }
        }
        _ => {}
    }
    None
}
