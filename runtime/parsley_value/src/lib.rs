//! Parsley Value - the data model shared by every part of the runtime.
//!
//! # Contents
//!
//! - [`Value`]: the closed sum type for every runtime datum
//! - [`Environment`]: parent-linked lexical scopes
//! - [`Dictionary`] / [`Thunk`]: ordered mappings whose entries are
//!   evaluated on read
//! - [`Record`] / [`Schema`]: schema-bound, validatable snapshots
//! - [`Table`]: rows plus a column list, optionally schema-bound
//! - [`EvalError`] / [`EvalResult`]: value-level errors
//!
//! Operations that need to evaluate expressions (forcing thunks, calling
//! functions, validation) live in `parsley_eval`; this crate only owns the
//! shapes and their invariants.

mod environment;
pub mod errors;
mod record;
mod schema;
mod table;
mod value;

pub use environment::{AssignError, Environment, Mutability, Visibility};
pub use errors::*;
pub use record::{FieldError, Record, ValidationCode};
pub use schema::{
    title_case, FieldDecl, Schema, SchemaError, SchemaField, StringKind, TypeFamily,
};
pub use table::Table;
pub use value::{
    bankers_round, format_float, Dictionary, FunctionValue, Heap, Money, Thunk, UnitFamily,
    UnitSystem, UnitValue, Value, HCN,
};
