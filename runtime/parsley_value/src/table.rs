//! Tables: rows plus an ordered column list.

use std::fmt;

use crate::schema::Schema;
use crate::value::{Dictionary, Heap};

/// An ordered sequence of rows with named columns.
///
/// With a schema, every row holds exactly the schema's fields and
/// `columns` is the schema's field order. Without one, rows may vary in
/// shape and only `columns` is addressable positionally.
#[derive(Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Dictionary>,
    schema: Option<Heap<Schema>>,
    /// Rows came back from a database query.
    from_db: bool,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Dictionary>) -> Self {
        Table {
            columns,
            rows,
            schema: None,
            from_db: false,
        }
    }

    /// Columns are taken from the first row's keys, in that row's order.
    /// Keys starting with `__` are internal and never become columns.
    pub fn from_rows(rows: Vec<Dictionary>) -> Self {
        let columns = rows
            .first()
            .map(|row| {
                row.keys()
                    .filter(|k| !k.starts_with("__"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Table::new(columns, rows)
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Heap<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Mark the rows as database-sourced.
    #[must_use]
    pub fn from_database(mut self) -> Self {
        self.from_db = true;
        self
    }

    /// A table with new columns and rows but this table's schema and
    /// provenance. Every transform builds its result through this.
    #[must_use]
    pub fn derive(&self, columns: Vec<String>, rows: Vec<Dictionary>) -> Table {
        Table {
            columns,
            rows,
            schema: self.schema.clone(),
            from_db: self.from_db,
        }
    }

    /// Same columns, new rows.
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Dictionary>) -> Table {
        self.derive(self.columns.clone(), rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Dictionary] {
        &self.rows
    }

    pub fn schema(&self) -> Option<&Heap<Schema>> {
        self.schema.as_ref()
    }

    pub fn is_from_db(&self) -> bool {
        self.from_db
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        let same_schema = match (&self.schema, &other.schema) {
            (None, None) => true,
            (Some(a), Some(b)) => Heap::ptr_eq(a, b),
            _ => false,
        };
        same_schema
            && self.from_db == other.from_db
            && self.columns == other.columns
            && self.rows == other.rows
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("schema", &self.schema.as_ref().map(|s| s.name().to_string()))
            .field("from_db", &self.from_db)
            .finish()
    }
}

/// `Table(3 rows)` or `Table<User>(3 rows)`.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "Table<{}>({} rows)", schema.name(), self.rows.len()),
            None => write!(f, "Table({} rows)", self.rows.len()),
        }
    }
}
