//! Parsley Eval - tree-walking evaluator for the Parsley runtime.
//!
//! # Architecture
//!
//! - [`Interpreter`]: evaluates `parsley_ir` expressions against an
//!   [`Environment`]; forces dictionary entries and calls functions
//! - `evaluate_binary` / `evaluate_unary`: direct enum-based operator
//!   dispatch, including money and unit arithmetic
//! - `exec`: indexing, slicing, concatenation, and membership
//! - `record`: casting and validation of schema-bound records
//! - `table`: the table engine (transforms, aggregates, exports)
//! - `sql`: records and tables from driver rows
//!
//! Every failure is an [`EvalError`]; [`evaluate`] folds it into
//! `Value::Error` so a host can keep rendering the rest of a document.

mod compare;
mod convert;
pub mod exec;
mod interpreter;
mod methods;
mod operators;
pub mod record;
pub mod sql;
mod stack;
pub mod table;
mod unary_operators;

use std::sync::Once;

pub use parsley_ir::{BinaryOp, Expr, ExprRef, UnaryOp};
pub use parsley_value::{
    Dictionary, Environment, EvalError, EvalResult, Heap, Record, Schema, Table, Thunk, Value,
};

pub use compare::compare_values;
pub use interpreter::{EvalOptions, Interpreter};
pub use methods::dispatch_builtin_method;
pub use operators::evaluate_binary;
pub use record::{cast_field_value, create_record, validate_record};
pub use unary_operators::evaluate_unary;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=parsley_eval=debug` or `RUST_LOG=parsley=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Evaluate `expr` in `env` with default options.
///
/// Errors come back as `Value::Error` rather than `Err`.
pub fn evaluate(expr: &Expr, env: &Environment) -> Value {
    Interpreter::default().evaluate(expr, env)
}
