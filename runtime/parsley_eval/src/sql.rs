//! Records and tables from database driver rows.
//!
//! Column order is the query's column order. Tables built here are marked
//! database-sourced, so records read back out of them arrive validated.

use parsley_value::{Dictionary, Heap, Record, Schema, Table, Value};

use crate::record::{create_record, validate_record};

/// A scalar as a database driver returns it.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlScalar {
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Null,
}

impl From<SqlScalar> for Value {
    fn from(scalar: SqlScalar) -> Self {
        match scalar {
            SqlScalar::Int(n) => Value::Int(n),
            SqlScalar::Float(f) => Value::Float(f),
            SqlScalar::Text(s) => Value::string(s),
            SqlScalar::Bytes(bytes) => Value::string(String::from_utf8_lossy(&bytes)),
            SqlScalar::Bool(b) => Value::Bool(b),
            SqlScalar::Null => Value::Null,
        }
    }
}

/// Pair column names with one row's values. Extra values without a column
/// are dropped; missing values are null.
fn row_dict(columns: &[String], row: Vec<SqlScalar>) -> Dictionary {
    let mut values = row.into_iter();
    Dictionary::from_values(columns.iter().map(|column| {
        (
            column.as_str(),
            values.next().map_or(Value::Null, Value::from),
        )
    }))
}

/// A table from a query result.
///
/// With a schema, each row is cast through it and the table's columns are
/// the schema's fields.
pub fn table_from_rows(
    columns: &[String],
    rows: Vec<Vec<SqlScalar>>,
    schema: Option<&Heap<Schema>>,
) -> Table {
    let dicts = rows.into_iter().map(|row| row_dict(columns, row));
    let table = match schema {
        Some(schema) => Table::new(
            schema.field_names().map(str::to_string).collect(),
            dicts
                .map(|row| create_record(schema, &row).data().clone())
                .collect(),
        )
        .with_schema(schema.clone()),
        None => Table::new(columns.to_vec(), dicts.collect()),
    };
    table.from_database()
}

/// One row bound to `schema` and validated.
pub fn record_from_row(schema: &Heap<Schema>, columns: &[String], row: Vec<SqlScalar>) -> Record {
    validate_record(&create_record(schema, &row_dict(columns, row)))
}
