//! Schema-bound records.
//!
//! A `Record` is a snapshot. Every operation that changes data or errors
//! returns a new record; the receiver is never touched. A snapshot is
//! either unvalidated or validated, and a validated snapshot's error map
//! is authoritative until the next data change produces a fresh,
//! unvalidated snapshot.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{unknown_field, EvalError};
use crate::schema::Schema;
use crate::value::{Dictionary, Heap, Thunk, Value};

/// Validation error codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    Required,
    Type,
    Format,
    Enum,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    /// Attached by application code through `withError`.
    Custom,
}

impl ValidationCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Type => "TYPE",
            Self::Format => "FORMAT",
            Self::Enum => "ENUM",
            Self::MinLength => "MIN_LENGTH",
            Self::MaxLength => "MAX_LENGTH",
            Self::MinValue => "MIN_VALUE",
            Self::MaxValue => "MAX_VALUE",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field's validation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// A [`ValidationCode`] string, or any code supplied to `withError`.
    pub code: String,
    pub message: String,
}

impl FieldError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A schema-bound, validatable data snapshot.
#[derive(Clone)]
pub struct Record {
    schema: Heap<Schema>,
    /// Exactly the schema's fields, in declaration order.
    data: Dictionary,
    /// Sorted by field name; at most one error per field.
    errors: BTreeMap<String, FieldError>,
    validated: bool,
}

impl Record {
    /// An unvalidated record. `data` must already hold exactly the schema's
    /// fields; `parsley_eval::create_record` is the usual way in.
    pub fn new(schema: Heap<Schema>, data: Dictionary) -> Self {
        Record {
            schema,
            data,
            errors: BTreeMap::new(),
            validated: false,
        }
    }

    pub fn schema(&self) -> &Heap<Schema> {
        &self.schema
    }

    pub fn data(&self) -> &Dictionary {
        &self.data
    }

    pub fn get(&self, field: &str) -> Option<&Thunk> {
        self.data.get(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys()
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Validated with no errors. An unvalidated record is never valid.
    pub fn is_valid(&self) -> bool {
        self.validated && self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// A copy with `field` set to `value`, unvalidated, errors cleared.
    pub fn with_field(&self, field: &str, value: Value) -> Result<Record, EvalError> {
        if !self.schema.has_field(field) {
            return Err(unknown_field(field, self.schema.name()));
        }
        let mut data = self.data.clone();
        data.insert_value(field, value);
        Ok(Record::new(self.schema.clone(), data))
    }

    /// A copy with new data, unvalidated, errors cleared.
    #[must_use]
    pub fn with_data(&self, data: Dictionary) -> Record {
        Record::new(self.schema.clone(), data)
    }

    /// A copy of this data marked validated with `errors`.
    #[must_use]
    pub fn with_validation(&self, errors: BTreeMap<String, FieldError>) -> Record {
        Record {
            schema: self.schema.clone(),
            data: self.data.clone(),
            errors,
            validated: true,
        }
    }

    /// A copy with one more error attached; the copy counts as validated.
    #[must_use]
    pub fn with_error(&self, field: &str, error: FieldError) -> Record {
        let mut errors = self.errors.clone();
        errors.insert(field.to_string(), error);
        self.with_validation(errors)
    }

    /// `unvalidated`, `valid`, or `N errors`.
    pub fn status(&self) -> String {
        if !self.validated {
            "unvalidated".to_string()
        } else if self.errors.is_empty() {
            "valid".to_string()
        } else {
            format!("{} errors", self.errors.len())
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(&self.schema, &other.schema)
            && self.validated == other.validated
            && self.data == other.data
            && self.errors == other.errors
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("schema", &self.schema.name())
            .field("data", &self.data)
            .field("errors", &self.errors)
            .field("validated", &self.validated)
            .finish()
    }
}

/// `User({name: "Ann", age: 3}) [valid]`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) [{}]",
            self.schema.name(),
            self.data,
            self.status()
        )
    }
}
