//! Closures.

use std::fmt;
use std::sync::Arc;

use parsley_ir::ExprRef;

use super::Heap;
use crate::Environment;

/// A function value: parameters, body, and the scope it was defined in.
///
/// Calls run in a fresh child of `env`, never of the caller's scope.
#[derive(Clone)]
pub struct FunctionValue {
    params: Heap<Vec<String>>,
    body: ExprRef,
    env: Environment,
}

impl FunctionValue {
    pub fn new(params: Vec<String>, body: ExprRef, env: Environment) -> Self {
        FunctionValue {
            params: Heap::new(params),
            body,
            env,
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> &ExprRef {
        &self.body
    }

    /// The captured defining scope.
    pub fn env(&self) -> &Environment {
        &self.env
    }
}

/// Identity: the same literal closed over the same scope.
impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body) && Environment::ptr_eq(&self.env, &other.env)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("params", &*self.params)
            .field("body", &format_args!("{}", self.body))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({})", self.params.join(", "))
    }
}
