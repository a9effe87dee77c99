//! Declared schemas.
//!
//! A `Schema` is built once by [`Schema::declare`] and then shared by every
//! record and table bound to it. Nothing about a schema changes after
//! declaration, including field metadata.

mod declare;

use std::fmt;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::Value;

pub use declare::{FieldDecl, SchemaError};

/// String subtypes with a built-in format check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StringKind {
    Plain,
    Email,
    Url,
    Phone,
    Slug,
    Uuid,
    Ulid,
}

impl StringKind {
    /// Noun used in "is not a valid ..." messages.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Plain => "string",
            Self::Email => "email address",
            Self::Url => "URL",
            Self::Phone => "phone number",
            Self::Slug => "slug",
            Self::Uuid => "UUID",
            Self::Ulid => "ULID",
        }
    }
}

/// Base type of a field, as far as casting and validation care.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeFamily {
    Integer,
    Float,
    Boolean,
    String(StringKind),
    /// Anything else (datetime, money, json, enum, ...): passed through.
    Other,
}

impl TypeFamily {
    /// Classify a declared type name. Case-insensitive; a trailing `?` is
    /// ignored.
    pub fn of(type_name: &str) -> Self {
        let lower = type_name.to_ascii_lowercase();
        match lower.trim_end_matches('?') {
            "int" | "integer" | "bigint" => Self::Integer,
            "float" | "number" => Self::Float,
            "bool" | "boolean" => Self::Boolean,
            "string" | "text" => Self::String(StringKind::Plain),
            "email" => Self::String(StringKind::Email),
            "url" => Self::String(StringKind::Url),
            "phone" => Self::String(StringKind::Phone),
            "slug" => Self::String(StringKind::Slug),
            "uuid" => Self::String(StringKind::Uuid),
            "ulid" => Self::String(StringKind::Ulid),
            _ => Self::Other,
        }
    }

    /// Noun used in "must be a ..." messages.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
            Self::String(_) | Self::Other => "string",
        }
    }
}

/// One declared field.
#[derive(Clone, Debug)]
pub struct SchemaField {
    pub name: String,
    /// Declared type name after alias resolution (`id` becomes `ulid`).
    pub type_name: String,
    pub nullable: bool,
    pub required: bool,
    /// Generated by the database or server; never required on input.
    pub auto: bool,
    pub read_only: bool,
    pub unique: bool,
    /// The field named `id`.
    pub primary: bool,
    pub default: Option<Value>,
    pub pattern: Option<Regex>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub enum_values: Vec<String>,
    /// Presentation hints: `title`, `placeholder`, `hidden`, and anything else.
    pub metadata: FxHashMap<String, Value>,
}

impl SchemaField {
    pub fn family(&self) -> TypeFamily {
        TypeFamily::of(&self.type_name)
    }

    /// Display title: metadata `title` if it is a string, else the
    /// title-cased field name.
    pub fn title(&self) -> String {
        match self.metadata.get("title") {
            Some(Value::Str(title)) => title.to_string(),
            _ => title_case(&self.name),
        }
    }

    /// Whether metadata marks the field `hidden: true`.
    pub fn is_hidden(&self) -> bool {
        matches!(self.metadata.get("hidden"), Some(Value::Bool(true)))
    }
}

/// A named, ordered set of fields.
#[derive(Clone, Debug)]
pub struct Schema {
    name: String,
    fields: Vec<SchemaField>,
    index: FxHashMap<String, usize>,
}

impl Schema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Name of the primary key field, if the schema has one.
    pub fn primary_key(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.primary)
            .map(|f| f.name.as_str())
    }

    /// Display title for `field`; undeclared names are title-cased.
    pub fn title(&self, field: &str) -> String {
        self.field(field)
            .map_or_else(|| title_case(field), SchemaField::title)
    }

    /// Metadata value `key` of `field`, or `Null`.
    pub fn meta(&self, field: &str, key: &str) -> Value {
        self.field(field)
            .and_then(|f| f.metadata.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn placeholder(&self, field: &str) -> Value {
        self.meta(field, "placeholder")
    }

    /// Fields meant for forms: not `auto`, not hidden.
    pub fn visible_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.auto && !f.is_hidden())
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn enum_values(&self, field: &str) -> &[String] {
        self.field(field)
            .map_or(&[][..], |f| f.enum_values.as_slice())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@schema {} {{ ", self.name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", field.name, field.type_name)?;
            if field.nullable {
                f.write_str("?")?;
            }
        }
        f.write_str(" }")
    }
}

/// `firstName` / `first_name` / `first-name` to `First Name`.
///
/// Underscores and hyphens become spaces; a lowercase-to-uppercase
/// transition starts a new word. Each word is capitalised and the rest of
/// it lowercased.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut word_start = true;
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            out.push(' ');
            word_start = true;
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
            word_start = true;
        }
        if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    out
}
