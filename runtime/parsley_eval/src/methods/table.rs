//! Methods on tables. Argument parsing lives here; the transforms
//! themselves are in [`crate::table`].

use parsley_value::{
    no_such_method, wrong_arg_count, wrong_arg_type, EvalError, EvalResult, Value,
};

use super::helpers::{
    len_to_value, require_args, require_args_range, require_dict_arg, require_fn_arg,
    require_int_arg, require_str_arg, require_str_args, str_array,
};
use crate::exec::table_row;
use crate::table::{self, aggregate, export, ColumnPosition, ColumnSource, SortKey};
use crate::Interpreter;

/// Dispatch methods on table values.
pub fn dispatch_table_method(
    interp: &Interpreter,
    receiver: Value,
    method: &str,
    args: Vec<Value>,
) -> EvalResult {
    let Value::Table(t) = receiver else {
        unreachable!("dispatch_table_method called with non-table receiver")
    };

    match method {
        "where" => {
            require_args("where", 1, args.len())?;
            let predicate = require_fn_arg("where", &args, 0)?;
            Ok(Value::table(table::filter(interp, &t, predicate)?))
        }
        "orderBy" => {
            require_args_range("orderBy", 1, 2, args.len())?;
            let keys = sort_keys(&args)?;
            Ok(Value::table(table::order_by(&t, &keys)))
        }
        "select" => {
            require_args("select", 1, args.len())?;
            let Some(Value::Array(names)) = args.first() else {
                return Err(wrong_arg_type("select", "an array of column names"));
            };
            let columns = require_str_args("select", names, 0)?;
            Ok(Value::table(table::select(&t, &columns)))
        }
        "limit" => {
            require_args_range("limit", 1, 2, args.len())?;
            let count = require_int_arg("limit", &args, 0)?;
            let offset = if args.len() == 2 {
                require_int_arg("limit", &args, 1)?
            } else {
                0
            };
            Ok(Value::table(table::limit(&t, count, offset)?))
        }
        "count" | "rowCount" => {
            require_args(method, 0, args.len())?;
            len_to_value(t.len(), "table")
        }
        "columnCount" => {
            require_args("columnCount", 0, args.len())?;
            len_to_value(t.columns().len(), "table")
        }
        "columns" => {
            require_args("columns", 0, args.len())?;
            Ok(str_array(t.columns().iter().map(String::as_str)))
        }
        "column" => {
            require_args("column", 1, args.len())?;
            let name = require_str_arg("column", &args, 0)?;
            Ok(Value::array(table::column_values(&t, name)?))
        }
        "rows" => {
            require_args("rows", 0, args.len())?;
            Ok(Value::array((0..t.len()).map(|i| table_row(&t, i)).collect()))
        }
        "appendRow" => {
            require_args("appendRow", 1, args.len())?;
            let row = require_dict_arg("appendRow", &args, 0)?;
            Ok(Value::table(table::append_row(interp, &t, row)?))
        }
        "insertRowAt" => {
            require_args("insertRowAt", 2, args.len())?;
            let index = require_int_arg("insertRowAt", &args, 0)?;
            let row = require_dict_arg("insertRowAt", &args, 1)?;
            Ok(Value::table(table::insert_row_at(interp, &t, index, row)?))
        }
        "appendCol" => {
            require_args("appendCol", 2, args.len())?;
            let name = require_str_arg("appendCol", &args, 0)?;
            let source = column_source("appendCol", &args[1])?;
            Ok(Value::table(table::add_column(
                interp,
                &t,
                name,
                &source,
                ColumnPosition::End,
            )?))
        }
        "insertColAfter" | "insertColBefore" => {
            require_args(method, 3, args.len())?;
            let anchor = require_str_arg(method, &args, 0)?;
            let name = require_str_arg(method, &args, 1)?;
            let source = column_source(method, &args[2])?;
            let position = if method == "insertColAfter" {
                ColumnPosition::After(anchor)
            } else {
                ColumnPosition::Before(anchor)
            };
            Ok(Value::table(table::add_column(
                interp, &t, name, &source, position,
            )?))
        }
        "renameCol" => {
            require_args("renameCol", 2, args.len())?;
            let old = require_str_arg("renameCol", &args, 0)?;
            let new = require_str_arg("renameCol", &args, 1)?;
            Ok(Value::table(table::rename_column(&t, old, new)?))
        }
        "dropCol" => {
            if args.is_empty() {
                return Err(wrong_arg_count("dropCol", 1, 0));
            }
            let names = require_str_args("dropCol", &args, 0)?;
            Ok(Value::table(table::drop_columns(&t, &names)?))
        }
        "unique" => {
            require_args_range("unique", 0, 1, args.len())?;
            if args.is_empty() {
                Ok(Value::table(table::unique_rows(&t)))
            } else {
                let column = require_str_arg("unique", &args, 0)?;
                Ok(Value::array(table::unique_values(&t, column)?))
            }
        }
        "groupBy" => {
            require_args("groupBy", 1, args.len())?;
            let column = require_str_arg("groupBy", &args, 0)?;
            Ok(Value::dict(table::group_by(&t, column)?))
        }
        "map" => {
            require_args("map", 1, args.len())?;
            let func = require_fn_arg("map", &args, 0)?;
            Ok(Value::array(table::map_rows(interp, &t, func)?))
        }
        "find" => {
            require_args("find", 1, args.len())?;
            let predicate = require_fn_arg("find", &args, 0)?;
            table::find_row(interp, &t, predicate)
        }
        "any" | "all" => {
            require_args(method, 1, args.len())?;
            let predicate = require_fn_arg(method, &args, 0)?;
            let found = if method == "any" {
                table::any_row(interp, &t, predicate)?
            } else {
                table::all_rows(interp, &t, predicate)?
            };
            Ok(Value::Bool(found))
        }
        "sum" | "avg" | "min" | "max" => {
            require_args(method, 1, args.len())?;
            let column = require_str_arg(method, &args, 0)?;
            match method {
                "sum" => aggregate::sum(&t, column),
                "avg" => aggregate::avg(&t, column),
                "min" => aggregate::min(&t, column),
                _ => aggregate::max(&t, column),
            }
        }
        "toHTML" | "toCSV" | "toMarkdown" | "toJSON" => {
            require_args(method, 0, args.len())?;
            let text = match method {
                "toHTML" => export::to_html(&t),
                "toCSV" => export::to_csv(&t),
                "toMarkdown" => export::to_markdown(&t),
                _ => export::to_json_string(&t),
            };
            Ok(Value::string(text))
        }
        _ => Err(no_such_method(method, "table")),
    }
}

/// `orderBy("col")`, `orderBy("col", "desc")`, `orderBy(["a", "b"])`, or
/// `orderBy([["a", "asc"], ["b", "desc"]])`.
fn sort_keys(args: &[Value]) -> Result<Vec<SortKey>, EvalError> {
    match args {
        [Value::Str(column)] => Ok(vec![SortKey::ascending(column.as_str())]),
        [Value::Str(column), Value::Str(direction)] => {
            Ok(vec![SortKey::with_direction(column.as_str(), direction)?])
        }
        [Value::Array(keys)] if !keys.is_empty() => keys
            .iter()
            .map(|key| match key {
                Value::Str(column) => Ok(SortKey::ascending(column.as_str())),
                Value::Array(pair) => match pair.as_slice() {
                    [Value::Str(column)] => Ok(SortKey::ascending(column.as_str())),
                    [Value::Str(column), Value::Str(direction)] => {
                        SortKey::with_direction(column.as_str(), direction)
                    }
                    _ => Err(wrong_arg_type("orderBy", "[column, direction] pairs")),
                },
                _ => Err(wrong_arg_type("orderBy", "column names or [column, direction] pairs")),
            })
            .collect(),
        _ => Err(wrong_arg_type("orderBy", "a column name or an array of columns")),
    }
}

/// An array of values (one per row) or a function of the row.
fn column_source(method: &str, arg: &Value) -> Result<ColumnSource, EvalError> {
    match arg {
        Value::Array(values) => Ok(ColumnSource::Values(values.to_vec())),
        Value::Function(_) => Ok(ColumnSource::Compute(arg.clone())),
        _ => Err(wrong_arg_type(method, "an array or function")),
    }
}
