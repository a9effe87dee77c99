//! The table engine.
//!
//! Every transform returns a new [`Table`]; the receiver is never touched.
//! Rows hold evaluated entries only, so reading a cell never runs user
//! code. Predicates and column functions receive the row as scripts see
//! it through indexing: a record when the table has a schema, else a
//! dictionary.
//!
//! Transforms that keep each row's shape (`where`, `orderBy`, `limit`,
//! row insertion, `groupBy`) keep the schema binding. Transforms that
//! change the column set (`select`, column insertion, `renameCol`,
//! `dropCol`) return a plain table.

pub mod aggregate;
pub mod export;

use std::cmp::Ordering;

use parsley_value::{
    column_length_mismatch, duplicate_column, index_out_of_bounds, negative_limit,
    row_shape_mismatch, sort_direction, unknown_column, wrong_arg_type, Dictionary, EvalError,
    EvalResult, Heap, Table, Thunk, Value,
};
use tracing::trace;

use crate::compare::{compare_values, ready_or_null};
use crate::convert::to_template_string;
use crate::exec::table_row;
use crate::operators::values_equal;
use crate::record::create_record;
use crate::Interpreter;

/// One `orderBy` key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            descending: false,
        }
    }

    /// A key with an explicit `"asc"` or `"desc"` (any case).
    pub fn with_direction(column: impl Into<String>, direction: &str) -> Result<Self, EvalError> {
        let descending = match direction.to_ascii_lowercase().as_str() {
            "asc" => false,
            "desc" => true,
            _ => return Err(sort_direction(direction)),
        };
        Ok(SortKey {
            column: column.into(),
            descending,
        })
    }
}

/// Values for a new column.
#[derive(Clone, Debug)]
pub enum ColumnSource {
    /// One value per existing row, in row order.
    Values(Vec<Value>),
    /// A function called once per row.
    Compute(Value),
}

/// Where a new column goes in the column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnPosition<'a> {
    End,
    After(&'a str),
    Before(&'a str),
}

/// The value of `column` in `row`, or null.
pub(crate) fn cell(row: &Dictionary, column: &str) -> Value {
    ready_or_null(row.get(column))
}

/// Build a table from an array of dictionaries.
///
/// Columns come from the first row's keys, in that row's order.
pub fn from_values(interp: &Interpreter, items: &[Value]) -> Result<Table, EvalError> {
    let rows = items
        .iter()
        .map(|item| match item {
            Value::Dict(dict) => interp.force_dict(dict),
            _ => Err(wrong_arg_type("table", "an array of dictionaries")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::from_rows(rows))
}

/// Apply `func` to each row in turn.
fn each_row<'a>(
    interp: &'a Interpreter,
    table: &'a Table,
    func: &'a Value,
) -> impl Iterator<Item = (usize, EvalResult)> + 'a {
    (0..table.len()).map(move |i| (i, interp.call(func, vec![table_row(table, i)])))
}

/// `where(fn)`: rows for which `predicate` is truthy.
pub fn filter(interp: &Interpreter, table: &Table, predicate: &Value) -> Result<Table, EvalError> {
    let mut rows = Vec::new();
    for (i, result) in each_row(interp, table, predicate) {
        if result?.is_truthy() {
            rows.push(table.rows()[i].clone());
        }
    }
    Ok(table.with_rows(rows))
}

/// `orderBy`: stable sort, earlier keys first.
pub fn order_by(table: &Table, keys: &[SortKey]) -> Table {
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| {
        for key in keys {
            let ord = compare_values(&cell(a, &key.column), &cell(b, &key.column));
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    table.with_rows(rows)
}

/// `select(columns)`: project rows onto `columns`; missing cells are null.
pub fn select(table: &Table, columns: &[&str]) -> Table {
    let rows = table
        .rows()
        .iter()
        .map(|row| Dictionary::from_values(columns.iter().map(|&c| (c, cell(row, c)))))
        .collect();
    Table::new(columns.iter().map(|c| (*c).to_string()).collect(), rows)
}

/// `limit(n, offset)`: at most `n` rows starting at `offset`, clamped to
/// the table.
pub fn limit(table: &Table, count: i64, offset: i64) -> Result<Table, EvalError> {
    let count = usize::try_from(count).map_err(|_| negative_limit("count", count))?;
    let offset = usize::try_from(offset).map_err(|_| negative_limit("offset", offset))?;
    let start = offset.min(table.len());
    let end = start.saturating_add(count).min(table.len());
    Ok(table.with_rows(table.rows()[start..end].to_vec()))
}

/// Force `row` and check it against the table's columns.
///
/// A non-empty table only takes rows whose keys are exactly its columns;
/// the row is stored in column order. A schema-bound table casts the row
/// through the schema.
fn prepare_row(
    interp: &Interpreter,
    table: &Table,
    row: &Heap<Dictionary>,
) -> Result<(Vec<String>, Dictionary), EvalError> {
    let forced = interp.force_dict(row)?;
    if let Some(schema) = table.schema() {
        let columns = table.columns().to_vec();
        return Ok((columns, create_record(schema, &forced).data().clone()));
    }
    if table.is_empty() && table.columns().is_empty() {
        let columns = forced.keys().map(str::to_string).collect();
        return Ok((columns, forced));
    }
    let same_shape = forced.len() == table.columns().len()
        && table.columns().iter().all(|c| forced.contains_key(c));
    if !same_shape {
        return Err(row_shape_mismatch(
            table.columns(),
            forced.keys().map(str::to_string).collect(),
        ));
    }
    let ordered = Dictionary::from_values(
        table
            .columns()
            .iter()
            .map(|c| (c.as_str(), cell(&forced, c))),
    );
    Ok((table.columns().to_vec(), ordered))
}

/// `appendRow(row)`.
pub fn append_row(
    interp: &Interpreter,
    table: &Table,
    row: &Heap<Dictionary>,
) -> Result<Table, EvalError> {
    let (columns, row) = prepare_row(interp, table, row)?;
    let mut rows = table.rows().to_vec();
    rows.push(row);
    Ok(table.derive(columns, rows))
}

/// `insertRowAt(index, row)`. `index` may equal the row count (append) or
/// be negative (counted from the end).
pub fn insert_row_at(
    interp: &Interpreter,
    table: &Table,
    index: i64,
    row: &Heap<Dictionary>,
) -> Result<Table, EvalError> {
    let len = table.len();
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 {
        index.saturating_add(signed_len)
    } else {
        index
    };
    let pos = usize::try_from(resolved)
        .ok()
        .filter(|pos| *pos <= len)
        .ok_or_else(|| index_out_of_bounds(index, len))?;
    let (columns, row) = prepare_row(interp, table, row)?;
    let mut rows = table.rows().to_vec();
    rows.insert(pos, row);
    Ok(table.derive(columns, rows))
}

/// `appendCol`, `insertColAfter`, and `insertColBefore`.
pub fn add_column(
    interp: &Interpreter,
    table: &Table,
    name: &str,
    source: &ColumnSource,
    position: ColumnPosition<'_>,
) -> Result<Table, EvalError> {
    if table.has_column(name) {
        return Err(duplicate_column(name));
    }
    let anchor = |column: &str| {
        table
            .columns()
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| unknown_column(column))
    };
    let at = match position {
        ColumnPosition::End => table.columns().len(),
        ColumnPosition::After(column) => anchor(column)? + 1,
        ColumnPosition::Before(column) => anchor(column)?,
    };

    let values = match source {
        ColumnSource::Values(values) if values.len() == table.len() => values
            .iter()
            .map(|value| interp.resolve_deep(value))
            .collect::<Result<Vec<_>, _>>()?,
        ColumnSource::Values(values) => {
            return Err(column_length_mismatch(table.len(), values.len()))
        }
        ColumnSource::Compute(func) => each_row(interp, table, func)
            .map(|(_, result)| result.and_then(|value| interp.resolve_deep(&value)))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let mut columns = table.columns().to_vec();
    columns.insert(at, name.to_string());
    let rows = table
        .rows()
        .iter()
        .zip(values)
        .map(|(row, value)| {
            let mut row = row.clone();
            let slot = match position {
                ColumnPosition::End => row.len(),
                ColumnPosition::After(c) => row.position(c).map_or(row.len(), |p| p + 1),
                ColumnPosition::Before(c) => row.position(c).unwrap_or(row.len()),
            };
            row.insert_at(slot, name, Thunk::Ready(value));
            row
        })
        .collect();
    Ok(Table::new(columns, rows))
}

/// `renameCol(old, new)`.
pub fn rename_column(table: &Table, old: &str, new: &str) -> Result<Table, EvalError> {
    if !table.has_column(old) {
        return Err(unknown_column(old));
    }
    if old != new && table.has_column(new) {
        return Err(duplicate_column(new));
    }
    let columns = table
        .columns()
        .iter()
        .map(|c| if c == old { new.to_string() } else { c.clone() })
        .collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.rename(old, new);
            row
        })
        .collect();
    Ok(Table::new(columns, rows))
}

/// `dropCol(names...)`.
pub fn drop_columns(table: &Table, names: &[&str]) -> Result<Table, EvalError> {
    if let Some(missing) = names.iter().find(|n| !table.has_column(n)) {
        return Err(unknown_column(missing));
    }
    let columns = table
        .columns()
        .iter()
        .filter(|c| !names.contains(&c.as_str()))
        .cloned()
        .collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            for name in names {
                row.remove(name);
            }
            row
        })
        .collect();
    Ok(Table::new(columns, rows))
}

/// `column(name)`: the column's values in row order.
pub fn column_values(table: &Table, column: &str) -> Result<Vec<Value>, EvalError> {
    if !table.has_column(column) {
        return Err(unknown_column(column));
    }
    Ok(table.rows().iter().map(|row| cell(row, column)).collect())
}

/// `unique(column)`: distinct values of a column in first-seen order.
pub fn unique_values(table: &Table, column: &str) -> Result<Vec<Value>, EvalError> {
    let mut seen: Vec<Value> = Vec::new();
    for value in column_values(table, column)? {
        if !seen.iter().any(|v| values_equal(v, &value)) {
            seen.push(value);
        }
    }
    Ok(seen)
}

/// `unique()`: the table without duplicate rows, first occurrence kept.
pub fn unique_rows(table: &Table) -> Table {
    let mut rows: Vec<Dictionary> = Vec::new();
    for row in table.rows() {
        if !rows.contains(row) {
            rows.push(row.clone());
        }
    }
    table.with_rows(rows)
}

/// `groupBy(column)`: a dictionary from each distinct value (as its
/// template string) to the table of rows holding it, in first-seen order.
pub fn group_by(table: &Table, column: &str) -> Result<Dictionary, EvalError> {
    if !table.has_column(column) {
        return Err(unknown_column(column));
    }
    let mut groups: Vec<(String, Vec<Dictionary>)> = Vec::new();
    for row in table.rows() {
        let key = to_template_string(&cell(row, column));
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, rows)) => rows.push(row.clone()),
            None => groups.push((key, vec![row.clone()])),
        }
    }
    trace!(column, groups = groups.len(), "grouped table");
    Ok(Dictionary::from_values(
        groups
            .into_iter()
            .map(|(key, rows)| (key, Value::table(table.with_rows(rows)))),
    ))
}

/// `map(fn)`: one result per row.
pub fn map_rows(interp: &Interpreter, table: &Table, func: &Value) -> Result<Vec<Value>, EvalError> {
    each_row(interp, table, func)
        .map(|(_, result)| result)
        .collect()
}

/// `find(fn)`: the first row for which `predicate` is truthy, or null.
pub fn find_row(interp: &Interpreter, table: &Table, predicate: &Value) -> EvalResult {
    for (i, result) in each_row(interp, table, predicate) {
        if result?.is_truthy() {
            return Ok(table_row(table, i));
        }
    }
    Ok(Value::Null)
}

/// `any(fn)` / `all(fn)`.
pub fn any_row(interp: &Interpreter, table: &Table, predicate: &Value) -> Result<bool, EvalError> {
    for (_, result) in each_row(interp, table, predicate) {
        if result?.is_truthy() {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn all_rows(interp: &Interpreter, table: &Table, predicate: &Value) -> Result<bool, EvalError> {
    for (_, result) in each_row(interp, table, predicate) {
        if !result?.is_truthy() {
            return Ok(false);
        }
    }
    Ok(true)
}
