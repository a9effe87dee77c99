//! Tree-walking interpreter.
//!
//! All evaluation goes through [`Interpreter::eval`]. Dictionary entries
//! are stored unevaluated with their defining scope and evaluated on every
//! read through [`Interpreter::force`], with `this` bound to the owning
//! dictionary.
//!
//! Nothing here is memoized: reading the same entry twice evaluates its
//! expression twice.

mod function_call;

use std::cell::Cell;

use parsley_ir::{BinaryOp, Expr, ExprRef};
use parsley_value::{
    cannot_assign_immutable, protected_binding, undefined_variable, AssignError, Dictionary,
    Environment, EvalError, EvalResult, FunctionValue, Heap, Money, Mutability, Record, Schema,
    Thunk, UnitValue, Value, Visibility,
};
use tracing::debug;

use crate::compare::ready_or_null;
use crate::convert::{to_json, to_template_string};
use crate::exec::{index_value, slice_value};
use crate::methods::dispatch_builtin_method;
use crate::record::create_record;
use crate::stack::with_stack;
use crate::{evaluate_binary, evaluate_unary};

/// Interpreter-wide switches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalOptions {
    /// Out-of-range indexes and slices evaluate to null everywhere, as if
    /// every site were written `xs[?i]`.
    pub null_on_bounds_error: bool,
}

/// Evaluates expressions. Holds no program state of its own; all bindings
/// live in the [`Environment`] passed to each call.
#[derive(Debug, Default)]
pub struct Interpreter {
    options: EvalOptions,
    /// Current function call nesting.
    depth: Cell<usize>,
}

/// Map a scope failure for `name` to its evaluation error.
pub(crate) fn assign_error(name: &str, error: AssignError) -> EvalError {
    match error {
        AssignError::Immutable => cannot_assign_immutable(name),
        AssignError::Undefined => undefined_variable(name),
        AssignError::Protected => protected_binding(name),
    }
}

impl Interpreter {
    pub fn new(options: EvalOptions) -> Self {
        Interpreter {
            options,
            depth: Cell::new(0),
        }
    }

    pub fn options(&self) -> EvalOptions {
        self.options
    }

    /// Evaluate `expr`, folding any error into `Value::Error`.
    pub fn evaluate(&self, expr: &Expr, env: &Environment) -> Value {
        match self.eval(expr, env) {
            Ok(value) => value,
            Err(error) => {
                debug!(code = error.code(), %error, "expression evaluated to an error");
                Value::error(error)
            }
        }
    }

    /// Evaluate `expr` in `env`.
    pub fn eval(&self, expr: &Expr, env: &Environment) -> EvalResult {
        with_stack(|| self.eval_inner(expr, env))
    }

    fn eval_inner(&self, expr: &Expr, env: &Environment) -> EvalResult {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::string(s.as_str())),
            Expr::Money {
                amount,
                currency,
                scale,
            } => Ok(Value::money(Money::new(*amount, currency.as_str(), *scale))),
            Expr::Unit { value, suffix } => UnitValue::from_suffix(*value, suffix)
                .map(Value::Unit)
                .ok_or_else(|| EvalError::new(format!("unknown unit suffix: {suffix}"))),

            Expr::Ident(name) => env.resolve(name).ok_or_else(|| undefined_variable(name)),
            Expr::This => env.resolve("this").ok_or_else(|| undefined_variable("this")),

            Expr::Array(items) => Ok(Value::array(self.eval_all(items, env)?)),
            Expr::Dict(entries) => {
                let mut dict = Dictionary::new();
                for (key, value) in entries {
                    dict.insert(
                        key.as_str(),
                        Thunk::Deferred {
                            expr: value.clone(),
                            env: env.clone(),
                        },
                    );
                }
                Ok(Value::dict(dict))
            }

            Expr::Prefix { op, operand } => evaluate_unary(self.eval(operand, env)?, *op),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, env),

            Expr::Index {
                target,
                index,
                optional,
            } => {
                let target = self.eval(target, env)?;
                let index = self.eval(index, env)?;
                index_value(
                    self,
                    &target,
                    &index,
                    *optional || self.options.null_on_bounds_error,
                )
            }
            Expr::Slice { target, start, end } => {
                let target = self.eval(target, env)?;
                let start = self.eval_opt(start.as_ref(), env)?;
                let end = self.eval_opt(end.as_ref(), env)?;
                slice_value(&target, &start, &end, self.options.null_on_bounds_error)
            }
            Expr::Member { target, name } => {
                let target = self.eval(target, env)?;
                self.member(&target, name)
            }

            Expr::Call { callee, args } => {
                let callee = self.eval(callee, env)?;
                let args = self.eval_all(args, env)?;
                self.call(&callee, args)
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver, env)?;
                let args = self.eval_all(args, env)?;
                dispatch_builtin_method(self, receiver, method, args)
            }
            Expr::Lambda { params, body } => Ok(Value::Function(FunctionValue::new(
                params.clone(),
                body.clone(),
                env.clone(),
            ))),

            Expr::Let {
                name,
                value,
                export,
                immutable,
            } => {
                let value = self.eval(value, env)?;
                let visibility = if *export {
                    Visibility::Exported
                } else {
                    Visibility::Local
                };
                let mutability = if *immutable {
                    Mutability::Immutable
                } else {
                    Mutability::Mutable
                };
                env.declare(name.as_str(), value, visibility, mutability)
                    .map_err(|e| assign_error(name, e))?;
                Ok(Value::Null)
            }
            Expr::Assign { name, value } => {
                let value = self.eval(value, env)?;
                env.assign(name, value).map_err(|e| assign_error(name, e))?;
                Ok(Value::Null)
            }

            Expr::Block(items) => {
                let scope = env.enclosed();
                let mut last = Value::Null;
                for item in items {
                    last = self.eval(item, &scope)?;
                }
                Ok(last)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond, env)?.is_truthy() {
                    self.eval(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch, env)
                } else {
                    Ok(Value::Null)
                }
            }
        }
    }

    fn eval_all(&self, exprs: &[ExprRef], env: &Environment) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|expr| self.eval(expr, env)).collect()
    }

    fn eval_opt(&self, expr: Option<&ExprRef>, env: &Environment) -> EvalResult {
        expr.map_or(Ok(Value::Null), |expr| self.eval(expr, env))
    }

    /// Logical operators short-circuit; equality and membership see fully
    /// forced dictionaries.
    fn eval_binary(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        env: &Environment,
    ) -> EvalResult {
        match op {
            BinaryOp::And => {
                if !self.eval(left, env)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right, env)?.is_truthy()))
            }
            BinaryOp::Or => {
                if self.eval(left, env)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right, env)?.is_truthy()))
            }
            BinaryOp::Coalesce => {
                let value = self.eval(left, env)?;
                if value.is_null() {
                    self.eval(right, env)
                } else {
                    Ok(value)
                }
            }
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::In | BinaryOp::NotIn => {
                let left = self.resolve_deep(&self.eval(left, env)?)?;
                let right = self.resolve_deep(&self.eval(right, env)?)?;
                evaluate_binary(left, right, op)
            }
            // String concatenation renders the other side as text.
            BinaryOp::Add => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
                    return evaluate_binary(self.resolve_deep(&left)?, self.resolve_deep(&right)?, op);
                }
                evaluate_binary(left, right, op)
            }
            _ => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                evaluate_binary(left, right, op)
            }
        }
    }

    /// `target.name`: dictionary keys and record fields, else a
    /// zero-argument method (`table.count`, `record.isValid`).
    fn member(&self, target: &Value, name: &str) -> EvalResult {
        match target {
            Value::Dict(dict) => Ok(self.dict_get(dict, name)?.unwrap_or(Value::Null)),
            Value::Record(record) if record.schema().has_field(name) => {
                Ok(ready_or_null(record.get(name)))
            }
            Value::Null => Ok(Value::Null),
            _ => dispatch_builtin_method(self, target.clone(), name, Vec::new()),
        }
    }

    /// The value of a dictionary or record entry.
    ///
    /// Deferred entries run in a child of their defining scope with `this`
    /// bound to `owner`.
    pub fn force(&self, thunk: &Thunk, owner: &Value) -> EvalResult {
        match thunk {
            Thunk::Ready(value) => Ok(value.clone()),
            Thunk::Deferred { expr, env } => {
                let scope = env.enclosed();
                scope
                    .define("this", owner.clone())
                    .map_err(|e| assign_error("this", e))?;
                self.eval(expr, &scope)
            }
        }
    }

    /// `dict[key]`, or `None` if the key is absent.
    pub fn dict_get(
        &self,
        dict: &Heap<Dictionary>,
        key: &str,
    ) -> Result<Option<Value>, EvalError> {
        let Some(thunk) = dict.get(key) else {
            return Ok(None);
        };
        let owner = Value::Dict(dict.clone());
        self.force(thunk, &owner).map(Some)
    }

    /// A copy of `dict` with every entry evaluated, nested dictionaries
    /// included. Table rows and record data are stored this way.
    pub fn force_dict(&self, dict: &Heap<Dictionary>) -> Result<Dictionary, EvalError> {
        let owner = Value::Dict(dict.clone());
        let mut forced = Dictionary::new();
        for (key, thunk) in dict.iter() {
            let entry = self.force(thunk, &owner)?;
            forced.insert_value(key, self.resolve_deep(&entry)?);
        }
        Ok(forced)
    }

    /// `value` with every nested dictionary entry evaluated.
    pub fn resolve_deep(&self, value: &Value) -> EvalResult {
        match value {
            Value::Dict(dict) => {
                let mut resolved = Dictionary::new();
                for (key, thunk) in dict.iter() {
                    let entry = self.force(thunk, value)?;
                    resolved.insert_value(key, self.resolve_deep(&entry)?);
                }
                Ok(Value::dict(resolved))
            }
            Value::Array(items) => Ok(Value::array(
                items
                    .iter()
                    .map(|item| self.resolve_deep(item))
                    .collect::<Result<_, _>>()?,
            )),
            other => Ok(other.clone()),
        }
    }

    /// The text `value` renders as in output, with every dictionary entry
    /// evaluated first.
    pub fn template_string(&self, value: &Value) -> Result<String, EvalError> {
        Ok(to_template_string(&self.resolve_deep(value)?))
    }

    /// JSON form of `value`, with every dictionary entry evaluated first.
    pub fn to_json(&self, value: &Value) -> Result<serde_json::Value, EvalError> {
        Ok(to_json(&self.resolve_deep(value)?))
    }

    /// Bind a dictionary to `schema`, evaluating its entries first.
    pub fn create_record(
        &self,
        schema: &Heap<Schema>,
        data: &Heap<Dictionary>,
    ) -> Result<Record, EvalError> {
        Ok(create_record(schema, &self.force_dict(data)?))
    }
}
