//! Value-level errors.
//!
//! Type and arity failures are never host-language panics: they come back
//! as `Err(EvalError)` from every operation and are folded into
//! `Value::Error` at the `evaluate` boundary, so one failing expression
//! does not abort the surrounding document.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the structured data for each failure and a
//! stable code (`INDEX-0001`, `UNIT-0001`, ...). Factory functions such as
//! `index_out_of_bounds()` are the public API; they fill in both `kind`
//! and `message`.

use std::fmt;

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    IntegerOverflow {
        operation: String,
    },

    // Type/Operator
    BinaryTypeMismatch {
        left: String,
        op: String,
        right: String,
    },
    InvalidUnaryOp {
        op: String,
        type_name: String,
    },
    MembershipContainer {
        type_name: String,
    },
    MembershipKey {
        container: &'static str,
        got: String,
    },
    CurrencyMismatch {
        left: String,
        right: String,
    },
    MoneyOperator {
        op: String,
    },

    // Units
    UnitFamilyMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },
    UnitOperator {
        op: String,
        left: String,
        right: String,
    },

    // Index/slice
    IndexOutOfBounds {
        index: i64,
        length: usize,
    },
    IndexType {
        target: String,
        index: String,
    },
    SliceStartAfterEnd {
        start: i64,
        end: i64,
    },
    SliceTarget {
        type_name: String,
    },
    SliceBound {
        which: &'static str,
        got: String,
    },

    // Bindings
    UndefinedVariable {
        name: String,
    },
    ImmutableBinding {
        name: String,
    },
    ProtectedBinding {
        name: String,
    },

    // Calls and methods
    NotCallable {
        type_name: String,
    },
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    WrongArgType {
        name: String,
        expected: String,
    },
    UndefinedMethod {
        method: String,
        type_name: String,
    },
    UnknownField {
        field: String,
        schema: String,
    },
    RecursionLimit {
        depth: usize,
    },

    // Table
    NegativeLimit {
        which: &'static str,
        value: i64,
    },
    RowShapeMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    ColumnLengthMismatch {
        expected: usize,
        got: usize,
    },
    UnknownColumn {
        column: String,
    },
    MixedAggregate {
        method: String,
        column: String,
    },
    SortDirection {
        direction: String,
    },
    DuplicateColumn {
        column: String,
    },

    /// Catch-all for errors raised with a free-form message.
    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// Stable code identifying this error family.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BinaryTypeMismatch { .. } => "OP-0001",
            Self::DivisionByZero | Self::ModuloByZero => "OP-0002",
            Self::IntegerOverflow { .. } => "OP-0003",
            Self::InvalidUnaryOp { .. } => "OP-0004",
            Self::MembershipContainer { .. } => "OP-0016",
            Self::MembershipKey { container, .. } => {
                if *container == "dictionary" {
                    "OP-0017"
                } else {
                    "OP-0018"
                }
            }
            Self::CurrencyMismatch { .. } => "OP-0019",
            Self::MoneyOperator { .. } => "OP-0020",
            Self::UnitFamilyMismatch { .. } => "UNIT-0001",
            Self::UnitOperator { .. } => "UNIT-0002",
            Self::IndexOutOfBounds { .. } => "INDEX-0001",
            Self::IndexType { .. } => "INDEX-0002",
            Self::SliceStartAfterEnd { .. } => "INDEX-0003",
            Self::SliceTarget { .. } => "INDEX-0004",
            Self::SliceBound { .. } => "INDEX-0005",
            Self::UndefinedVariable { .. } => "NAME-0001",
            Self::ImmutableBinding { .. } => "NAME-0002",
            Self::ProtectedBinding { .. } => "NAME-0003",
            Self::NotCallable { .. } => "CALL-0001",
            Self::ArityMismatch { .. } => "CALL-0002",
            Self::WrongArgType { .. } => "CALL-0003",
            Self::UndefinedMethod { .. } => "CALL-0004",
            Self::UnknownField { .. } => "RECORD-0001",
            Self::RecursionLimit { .. } => "CALL-0005",
            Self::NegativeLimit { .. } => "TABLE-0001",
            Self::RowShapeMismatch { .. } => "TABLE-0002",
            Self::ColumnLengthMismatch { .. } => "TABLE-0003",
            Self::UnknownColumn { .. } => "TABLE-0004",
            Self::MixedAggregate { .. } => "TABLE-0005",
            Self::SortDirection { .. } => "TABLE-0006",
            Self::DuplicateColumn { .. } => "TABLE-0007",
            Self::Custom { .. } => "ERROR-0000",
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),

            Self::BinaryTypeMismatch { left, op, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }
            Self::InvalidUnaryOp { op, type_name } => {
                write!(f, "operator `{op}` cannot be applied to {type_name}")
            }
            Self::MembershipContainer { type_name } => {
                write!(f, "`in` requires an array, dictionary, or string, got {type_name}")
            }
            Self::MembershipKey { container, got } => {
                write!(f, "`in` on a {container} requires a string, got {got}")
            }
            Self::CurrencyMismatch { left, right } => {
                write!(f, "cannot combine {left} and {right} amounts")
            }
            Self::MoneyOperator { op } => {
                write!(f, "operator `{op}` is not supported for money")
            }

            Self::UnitFamilyMismatch { op, left, right } => {
                write!(f, "cannot apply `{op}` to {left} and {right} units")
            }
            Self::UnitOperator { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }

            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index {index} out of range for length {length}")
            }
            Self::IndexType { target, index } => {
                write!(f, "cannot index {target} with {index}")
            }
            Self::SliceStartAfterEnd { start, end } => {
                write!(f, "slice start {start} is greater than end {end}")
            }
            Self::SliceTarget { type_name } => write!(f, "cannot slice {type_name}"),
            Self::SliceBound { which, got } => {
                write!(f, "slice {which} must be an integer, got {got}")
            }

            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::ImmutableBinding { name } => {
                write!(f, "cannot assign to immutable variable: {name}")
            }
            Self::ProtectedBinding { name } => {
                write!(f, "cannot redefine protected name: {name}")
            }

            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if expected == "1" {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::WrongArgType { name, expected } => {
                write!(f, "{name} expects {expected}")
            }
            Self::UndefinedMethod { method, type_name } => {
                write!(f, "no method '{method}' on type {type_name}")
            }
            Self::UnknownField { field, schema } => {
                write!(f, "field '{field}' is not declared in schema {schema}")
            }
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth of {depth} exceeded")
            }

            Self::NegativeLimit { which, value } => {
                write!(f, "limit {which} must not be negative, got {value}")
            }
            Self::RowShapeMismatch { expected, got } => write!(
                f,
                "row columns [{}] do not match table columns [{}]",
                got.join(", "),
                expected.join(", ")
            ),
            Self::ColumnLengthMismatch { expected, got } => {
                write!(f, "column has {got} values but table has {expected} rows")
            }
            Self::UnknownColumn { column } => write!(f, "unknown column: {column}"),
            Self::DuplicateColumn { column } => write!(f, "column already exists: {column}"),
            Self::MixedAggregate { method, column } => write!(
                f,
                "{method}() cannot mix money and plain numbers in column '{column}'"
            ),
            Self::SortDirection { direction } => {
                write!(f, "sort direction must be \"asc\" or \"desc\", got \"{direction}\"")
            }

            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A value-level evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
}

impl EvalError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
        }
    }

    /// Create an error from a structured kind.
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Stable error code, e.g. `INDEX-0001`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for EvalError {}

// Factory functions

/// Division by zero.
#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

/// Modulo by zero.
#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

/// Checked integer arithmetic overflowed.
#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

/// Operator applied to an unsupported pair of operand types.
#[cold]
pub fn binary_type_mismatch(left: &str, op: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch {
        left: left.to_string(),
        op: op.to_string(),
        right: right.to_string(),
    })
}

/// Prefix operator applied to an unsupported operand.
#[cold]
pub fn invalid_unary_op(op: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidUnaryOp {
        op: op.to_string(),
        type_name: type_name.to_string(),
    })
}

/// Right side of `in` is not a container.
#[cold]
pub fn membership_container(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MembershipContainer {
        type_name: type_name.to_string(),
    })
}

/// Left side of `in` must be a string for dictionary and string containers.
#[cold]
pub fn membership_key(container: &'static str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MembershipKey {
        container,
        got: got.to_string(),
    })
}

/// Two money values in different currencies.
#[cold]
pub fn currency_mismatch(left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CurrencyMismatch {
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Operator not defined for money.
#[cold]
pub fn money_operator(op: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MoneyOperator { op: op.to_string() })
}

/// Two units from different measurement families.
#[cold]
pub fn unit_family_mismatch(op: &str, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnitFamilyMismatch {
        op: op.to_string(),
        left,
        right,
    })
}

/// Operator not defined between a unit and the other operand.
#[cold]
pub fn unit_operator(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnitOperator {
        op: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    })
}

/// Index outside `[-len, len)`.
#[cold]
pub fn index_out_of_bounds(index: i64, length: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, length })
}

/// Unsupported `target[index]` combination.
#[cold]
pub fn index_type_mismatch(target: &str, index: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexType {
        target: target.to_string(),
        index: index.to_string(),
    })
}

/// Resolved slice start lies after the resolved end.
#[cold]
pub fn slice_start_after_end(start: i64, end: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SliceStartAfterEnd { start, end })
}

/// Target of a slice is not an array or string.
#[cold]
pub fn slice_target(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SliceTarget {
        type_name: type_name.to_string(),
    })
}

/// Slice bound is not an integer.
#[cold]
pub fn slice_bound(which: &'static str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SliceBound {
        which,
        got: got.to_string(),
    })
}

/// Identifier resolves in no enclosing scope.
#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

/// Assignment to an immutable binding.
#[cold]
pub fn cannot_assign_immutable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableBinding {
        name: name.to_string(),
    })
}

/// Redefinition of a protected name.
#[cold]
pub fn protected_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ProtectedBinding {
        name: name.to_string(),
    })
}

/// Call on a non-function value.
#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

/// Wrong argument count for a function or method.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    })
}

/// Wrong argument count where an inclusive range is accepted.
#[cold]
pub fn wrong_arg_count_range(name: &str, min: usize, max: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected: format!("{min} to {max}"),
        got,
    })
}

/// Wrong argument type for a function or method.
#[cold]
pub fn wrong_arg_type(name: &str, expected: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgType {
        name: name.to_string(),
        expected: expected.to_string(),
    })
}

/// Method not defined on the receiver's type.
#[cold]
pub fn no_such_method(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

/// Field not declared by the record's schema.
#[cold]
pub fn unknown_field(field: &str, schema: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownField {
        field: field.to_string(),
        schema: schema.to_string(),
    })
}

/// Function calls nested deeper than the interpreter allows.
#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

/// Negative `limit` or `offset`.
#[cold]
pub fn negative_limit(which: &'static str, value: i64) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NegativeLimit { which, value })
}

/// Row keys differ from the table's columns.
#[cold]
pub fn row_shape_mismatch(expected: &[String], got: Vec<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RowShapeMismatch {
        expected: expected.to_vec(),
        got,
    })
}

/// Array column source has the wrong length.
#[cold]
pub fn column_length_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ColumnLengthMismatch { expected, got })
}

/// Column name not present in the table.
#[cold]
pub fn unknown_column(column: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownColumn {
        column: column.to_string(),
    })
}

/// Aggregate over a column holding both money and plain numbers.
#[cold]
pub fn mixed_aggregate(method: &str, column: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MixedAggregate {
        method: method.to_string(),
        column: column.to_string(),
    })
}

/// `orderBy` direction other than asc/desc.
#[cold]
pub fn sort_direction(direction: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SortDirection {
        direction: direction.to_string(),
    })
}

/// New column name already present in the table.
#[cold]
pub fn duplicate_column(column: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateColumn {
        column: column.to_string(),
    })
}
