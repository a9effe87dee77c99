//! Table rendering: HTML, CSV, Markdown, and JSON.
//!
//! Cells render as template strings, so null cells are empty.

use std::fmt::Write as _;

use parsley_value::{Dictionary, Table};

use super::cell;
use crate::convert::{table_to_json, to_template_string};

fn cell_text(row: &Dictionary, column: &str) -> String {
    to_template_string(&cell(row, column))
}

/// Escape text content for HTML.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `<table>` with a `<thead>` (when there are columns) and a `<tbody>`.
pub fn to_html(table: &Table) -> String {
    let mut out = String::from("<table>\n");
    if !table.columns().is_empty() {
        out.push_str("  <thead>\n    <tr>");
        for column in table.columns() {
            let _ = write!(out, "<th>{}</th>", escape_html(column));
        }
        out.push_str("</tr>\n  </thead>\n");
    }
    out.push_str("  <tbody>\n");
    for row in table.rows() {
        out.push_str("    <tr>");
        for column in table.columns() {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell_text(row, column)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n</table>");
    out
}

/// Quote a CSV field if it contains a comma, quote, or line break.
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// RFC 4180 CSV with a header row and CRLF line endings.
pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();
    let header: Vec<String> = table.columns().iter().map(|c| escape_csv(c)).collect();
    out.push_str(&header.join(","));
    out.push_str("\r\n");
    for row in table.rows() {
        let fields: Vec<String> = table
            .columns()
            .iter()
            .map(|c| escape_csv(&cell_text(row, c)))
            .collect();
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

/// Pipes are escaped and line breaks collapse to spaces.
fn escape_markdown(s: &str) -> String {
    s.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .replace('|', "\\|")
}

/// A GitHub-style pipe table, one line per row.
pub fn to_markdown(table: &Table) -> String {
    let line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
    let mut lines = vec![
        line(table.columns().iter().map(|c| escape_markdown(c)).collect()),
        line(table.columns().iter().map(|_| "---".to_string()).collect()),
    ];
    for row in table.rows() {
        lines.push(line(
            table
                .columns()
                .iter()
                .map(|c| escape_markdown(&cell_text(row, c)))
                .collect(),
        ));
    }
    lines.join("\n")
}

/// A JSON array of row objects in column order.
pub fn to_json_string(table: &Table) -> String {
    table_to_json(table).to_string()
}
