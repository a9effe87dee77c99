//! Schema declaration.
//!
//! The parser hands over one [`FieldDecl`] per field: type name, nullable
//! marker, inline options, enum list, and metadata. [`Schema::declare`]
//! resolves aliases, applies options, and rejects contradictory ones.

use regex::Regex;
use rustc_hash::FxHashMap;

use super::{Schema, SchemaField};
use crate::Value;

/// Declaration-time schema errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field '{field}': auto and required cannot be combined")]
    AutoRequired { field: String },

    #[error("field '{field}': invalid regex pattern: {message}")]
    InvalidPattern { field: String, message: String },

    #[error("field '{field}': pattern must be a string, got {got}")]
    PatternType { field: String, got: &'static str },

    #[error("field '{field}': unknown option '{option}'")]
    UnknownOption { field: String, option: String },

    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },
}

impl SchemaError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AutoRequired { .. } => "SCHEMA-0001",
            Self::InvalidPattern { .. } | Self::PatternType { .. } => "SCHEMA-0002",
            Self::UnknownOption { .. } => "SCHEMA-0003",
            Self::DuplicateField { .. } => "SCHEMA-0004",
        }
    }
}

/// One field as written in a schema declaration.
#[derive(Clone, Debug, Default)]
pub struct FieldDecl {
    name: String,
    type_name: String,
    nullable: bool,
    default: Option<Value>,
    options: Vec<(String, Value)>,
    enum_values: Vec<String>,
    metadata: Vec<(String, Value)>,
}

impl FieldDecl {
    /// `name: type`. A trailing `?` on the type marks the field nullable.
    pub fn new(name: impl Into<String>, type_name: &str) -> Self {
        let (type_name, nullable) = match type_name.strip_suffix('?') {
            Some(base) => (base, true),
            None => (type_name, false),
        };
        FieldDecl {
            name: name.into(),
            type_name: type_name.to_string(),
            nullable,
            ..FieldDecl::default()
        }
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// `name: type = value`
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Inline option: `min`, `max`, `unique`, `auto`, `required`,
    /// `readOnly`, `pattern`, or `default`.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.push((key.into(), value));
        self
    }

    #[must_use]
    pub fn enum_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Metadata entry such as `title` or `placeholder`.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.push((key.into(), value));
        self
    }
}

/// Types whose `min`/`max` bound length rather than value.
fn bounds_length(type_name: &str) -> bool {
    matches!(
        type_name.to_ascii_lowercase().as_str(),
        "string" | "text" | "email" | "url" | "phone" | "slug"
    )
}

fn build_field(decl: FieldDecl) -> Result<SchemaField, SchemaError> {
    let FieldDecl {
        name,
        type_name: declared_type,
        nullable,
        default,
        options,
        enum_values,
        metadata,
    } = decl;

    let type_name = if declared_type.eq_ignore_ascii_case("id") {
        "ulid".to_string()
    } else {
        declared_type.clone()
    };

    let mut field = SchemaField {
        primary: name == "id",
        name,
        type_name,
        nullable,
        required: false,
        auto: false,
        read_only: false,
        unique: false,
        default,
        pattern: None,
        min_length: None,
        max_length: None,
        min_value: None,
        max_value: None,
        enum_values,
        metadata: metadata.into_iter().collect::<FxHashMap<_, _>>(),
    };

    let mut explicit_required = None;
    // Options of the wrong value type are ignored, matching how untyped
    // declarations have always behaved.
    for (key, value) in options {
        match (key.as_str(), value) {
            ("min", Value::Int(n)) => {
                if bounds_length(&declared_type) {
                    field.min_length = Some(usize::try_from(n).unwrap_or(0));
                } else {
                    field.min_value = Some(n);
                }
            }
            ("max", Value::Int(n)) => {
                if bounds_length(&declared_type) {
                    field.max_length = Some(usize::try_from(n).unwrap_or(0));
                } else {
                    field.max_value = Some(n);
                }
            }
            ("unique", Value::Bool(b)) => field.unique = b,
            ("auto", Value::Bool(b)) => field.auto = b,
            ("required", Value::Bool(b)) => explicit_required = Some(b),
            ("readOnly", Value::Bool(b)) => field.read_only = b,
            ("pattern", Value::Str(source)) => match Regex::new(&source) {
                Ok(re) => field.pattern = Some(re),
                Err(e) => {
                    return Err(SchemaError::InvalidPattern {
                        field: field.name,
                        message: e.to_string(),
                    })
                }
            },
            ("pattern", other) => {
                return Err(SchemaError::PatternType {
                    field: field.name,
                    got: other.type_name(),
                })
            }
            ("default", value) => field.default = Some(value),
            ("min" | "max" | "unique" | "auto" | "required" | "readOnly", _) => {}
            (_, _) => {
                return Err(SchemaError::UnknownOption {
                    field: field.name,
                    option: key.clone(),
                })
            }
        }
    }

    field.required = explicit_required.unwrap_or(!field.auto && !field.nullable);
    if field.auto && field.required {
        return Err(SchemaError::AutoRequired { field: field.name });
    }
    Ok(field)
}

impl Schema {
    /// Build a schema from its field declarations, in order.
    pub fn declare(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDecl>,
    ) -> Result<Schema, SchemaError> {
        let mut schema = Schema {
            name: name.into(),
            fields: Vec::new(),
            index: FxHashMap::default(),
        };
        for decl in fields {
            let field = build_field(decl)?;
            if schema.index.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField { field: field.name });
            }
            schema
                .index
                .insert(field.name.clone(), schema.fields.len());
            schema.fields.push(field);
        }
        Ok(schema)
    }
}
