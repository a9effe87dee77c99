//! Function and schema application.

use parsley_value::{
    not_callable, recursion_limit_exceeded, wrong_arg_count, wrong_arg_type, Dictionary,
    EvalResult, FunctionValue, Heap, Schema, Table, Value,
};
use tracing::trace;

use super::{assign_error, Interpreter};
use crate::record::create_record;

/// Nesting depth at which calls fail instead of recursing further.
pub(crate) const MAX_CALL_DEPTH: usize = 10_000;

impl Interpreter {
    /// Apply `callee` to already-evaluated arguments.
    pub fn call(&self, callee: &Value, args: Vec<Value>) -> EvalResult {
        match callee {
            Value::Function(func) => self.call_function(func, args),
            Value::Schema(schema) => self.call_schema(schema, args),
            other => Err(not_callable(other.type_name())),
        }
    }

    /// Run `func` in a fresh child of the scope it was defined in.
    pub fn call_function(&self, func: &FunctionValue, args: Vec<Value>) -> EvalResult {
        if args.len() != func.params().len() {
            return Err(wrong_arg_count("function", func.params().len(), args.len()));
        }
        let depth = self.depth.get();
        if depth >= MAX_CALL_DEPTH {
            return Err(recursion_limit_exceeded(MAX_CALL_DEPTH));
        }

        let scope = func.env().enclosed();
        for (param, arg) in func.params().iter().zip(args) {
            scope
                .define(param.as_str(), arg)
                .map_err(|e| assign_error(param, e))?;
        }

        self.depth.set(depth + 1);
        let result = self.eval(func.body(), &scope);
        self.depth.set(depth);
        result
    }

    /// `Schema(data)`: bind a dictionary, array of dictionaries, record, or
    /// table to `schema`.
    fn call_schema(&self, schema: &Heap<Schema>, args: Vec<Value>) -> EvalResult {
        let [arg] = <[Value; 1]>::try_from(args)
            .map_err(|args| wrong_arg_count(schema.name(), 1, args.len()))?;
        trace!(schema = schema.name(), arg = arg.type_name(), "binding to schema");

        match &arg {
            Value::Dict(dict) => Ok(Value::record(self.create_record(schema, dict)?)),
            Value::Array(items) => {
                let rows = items
                    .iter()
                    .map(|item| match item {
                        Value::Dict(dict) => Ok(create_record(schema, &self.force_dict(dict)?)
                            .data()
                            .clone()),
                        _ => Err(wrong_arg_type(schema.name(), "array of dictionaries")),
                    })
                    .collect::<Result<Vec<Dictionary>, _>>()?;
                Ok(Value::table(
                    Table::new(field_columns(schema), rows).with_schema(schema.clone()),
                ))
            }
            Value::Record(record) => Ok(Value::record(create_record(schema, record.data()))),
            Value::Table(table) => {
                let rows = table
                    .rows()
                    .iter()
                    .map(|row| create_record(schema, row).data().clone())
                    .collect();
                Ok(Value::table(
                    table
                        .derive(field_columns(schema), rows)
                        .with_schema(schema.clone()),
                ))
            }
            _ => Err(wrong_arg_type(schema.name(), "dictionary, array, record, or table")),
        }
    }
}

fn field_columns(schema: &Schema) -> Vec<String> {
    schema.field_names().map(str::to_string).collect()
}
