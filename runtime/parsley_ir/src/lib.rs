//! Parsley IR - the expression tree handed to the runtime by the parser.
//!
//! Parsing is not part of this workspace. The runtime only needs a tree it
//! can walk, and dictionary entries keep their unevaluated expressions
//! around, so nodes are shared through [`ExprRef`] rather than owned.

mod expr;
mod ops;

pub use expr::{Expr, ExprRef};
pub use ops::{BinaryOp, UnaryOp};
