//! Polymorphic operations over values: indexing, slicing, concatenation,
//! and membership.
//!
//! - `index`: `target[i]` for arrays, strings, tables, dictionaries, and records
//! - `collections`: `++` and `in`

mod collections;
mod index;

pub use collections::{concat, membership};
pub(crate) use index::table_row;
pub use index::{index_value, resolve_index, slice_value};

#[cfg(test)]
mod tests;
