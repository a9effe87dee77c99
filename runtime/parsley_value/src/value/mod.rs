//! Runtime values for the Parsley runtime.
//!
//! # Factory Methods
//!
//! Heap payloads are only created through the factory methods on `Value`
//! (`Value::string`, `Value::array`, `Value::dict`, ...). `Heap::new` is
//! crate-private.
//!
//! # Equality
//!
//! `PartialEq` here is structural and never evaluates anything: deferred
//! dictionary entries compare by identity. Operator-level `==`, which
//! forces entries and compares integers with floats, lives in
//! `parsley_eval`.

mod dictionary;
mod function;
mod heap;
mod money;
mod unit;

use std::fmt;

pub use dictionary::{Dictionary, Thunk};
pub use function::FunctionValue;
pub use heap::Heap;
pub use money::{bankers_round, Money};
pub use unit::{UnitFamily, UnitSystem, UnitValue, HCN};

use crate::errors::EvalError;
use crate::record::Record;
use crate::schema::Schema;
use crate::table::Table;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    // Scalars (inline)
    Null,
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    Float(f64),
    /// Amount with a family, system, and display hint.
    Unit(UnitValue),

    // Heap types
    Str(Heap<String>),
    /// Fixed-point currency amount.
    Money(Heap<Money>),
    /// Ordered sequence. Bindings that share an array share one allocation.
    Array(Heap<Vec<Value>>),
    /// Ordered mapping of lazily evaluated entries.
    Dict(Heap<Dictionary>),
    Table(Heap<Table>),
    Record(Heap<Record>),
    /// A declared schema; calling it binds data to it.
    Schema(Heap<Schema>),
    Function(FunctionValue),
    /// An error captured as data.
    Error(Heap<EvalError>),
}

impl Value {
    // Factory methods

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn money(money: Money) -> Self {
        Value::Money(Heap::new(money))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn dict(dict: Dictionary) -> Self {
        Value::Dict(Heap::new(dict))
    }

    #[inline]
    pub fn table(table: Table) -> Self {
        Value::Table(Heap::new(table))
    }

    #[inline]
    pub fn record(record: Record) -> Self {
        Value::Record(Heap::new(record))
    }

    #[inline]
    pub fn schema(schema: Schema) -> Self {
        Value::Schema(Heap::new(schema))
    }

    #[inline]
    pub fn error(error: EvalError) -> Self {
        Value::Error(Heap::new(error))
    }

    // Accessors

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer or float as `f64`.
    #[expect(clippy::cast_precision_loss, reason = "numeric widening for comparison")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Stable, user-facing type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Unit(_) => "unit",
            Value::Str(_) => "string",
            Value::Money(_) => "money",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Table(_) => "table",
            Value::Record(_) => "record",
            Value::Schema(_) => "schema",
            Value::Function(_) => "function",
            Value::Error(_) => "error",
        }
    }

    /// Truthiness for conditions and `!`.
    ///
    /// Null, false, zero, and empty strings/arrays/dictionaries are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
            Value::Unit(_)
            | Value::Money(_)
            | Value::Table(_)
            | Value::Record(_)
            | Value::Schema(_)
            | Value::Function(_)
            | Value::Error(_) => true,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "value equality is exact")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Unit(a), Value::Unit(b)) => {
                a.family == b.family && a.amount == b.amount_in(a.system)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Money(a), Value::Money(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Schema(a), Value::Schema(b)) => Heap::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Unit(u) => write!(f, "Unit({u})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Money(m) => write!(f, "Money({m})"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Dict(dict) => write!(f, "Dict({dict:?})"),
            Value::Table(table) => write!(f, "{table:?}"),
            Value::Record(record) => write!(f, "{record:?}"),
            Value::Schema(schema) => write!(f, "Schema({})", schema.name()),
            Value::Function(func) => write!(f, "{func:?}"),
            Value::Error(e) => write!(f, "Error({e})"),
        }
    }
}

/// Inspect representation: strings are raw at the top level and quoted
/// inside collections.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Unit(u) => write!(f, "{u}"),
            Value::Str(s) => f.write_str(s),
            Value::Money(m) => write!(f, "{m}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", Nested(item))?;
                }
                f.write_str("]")
            }
            Value::Dict(dict) => write!(f, "{dict}"),
            Value::Table(table) => write!(f, "{table}"),
            Value::Record(record) => write!(f, "{record}"),
            Value::Schema(schema) => write!(f, "Schema({})", schema.name()),
            Value::Function(func) => write!(f, "{func}"),
            Value::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// A value displayed inside a collection.
pub(crate) struct Nested<'a>(pub(crate) &'a Value);

impl fmt::Display for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            other => write!(f, "{other}"),
        }
    }
}

/// Shortest round-trip formatting, switching to exponent form when the
/// decimal exponent is below -4 or at least 6 (`1e+06`, `1.5e-07`).
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    let sci = format!("{x:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..6).contains(&exp) {
        return format!("{x}");
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

#[cfg(test)]
mod tests;
