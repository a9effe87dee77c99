//! Column aggregates: `sum`, `avg`, `min`, and `max`.
//!
//! Money never mixes with plain numbers in one aggregate, and every money
//! value in a column must share one currency. Numeric strings count as
//! numbers; other strings are skipped by `sum` and `avg`.

use std::cmp::Ordering;

use parsley_value::{
    bankers_round, currency_mismatch, integer_overflow, mixed_aggregate, EvalError, EvalResult,
    Money, Table, Value,
};
use tracing::debug;

use super::cell;
use crate::compare::compare_values;

/// `"42"` as an integer, `"4.2"` as a float, anything else as `None`.
fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::Int(n));
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

/// Non-null values of `column`, numeric strings parsed.
///
/// With `keep_other`, values that are not numbers (booleans, non-numeric
/// strings) are kept as they are for ordering; otherwise they are
/// skipped.
fn gather(
    table: &Table,
    column: &str,
    method: &str,
    keep_other: bool,
) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::with_capacity(table.len());
    let mut currency: Option<String> = None;
    let mut plain = false;
    for row in table.rows() {
        let value = match cell(row, column) {
            Value::Null => continue,
            Value::Str(s) => match parse_number(&s) {
                Some(n) => n,
                None if keep_other => Value::Str(s),
                None => continue,
            },
            v @ (Value::Int(_) | Value::Float(_) | Value::Money(_)) => v,
            other if keep_other => other,
            _ => continue,
        };
        match &value {
            Value::Money(m) => match &currency {
                None => currency = Some(m.currency.clone()),
                Some(c) if *c != m.currency => return Err(currency_mismatch(c, &m.currency)),
                Some(_) => {}
            },
            Value::Int(_) | Value::Float(_) => plain = true,
            _ => {}
        }
        if plain && currency.is_some() {
            return Err(mixed_aggregate(method, column));
        }
        values.push(value);
    }
    Ok(values)
}

/// Total of same-currency amounts at the largest scale among them.
fn money_total(values: &[Value]) -> Result<Option<Money>, EvalError> {
    let amounts: Vec<&Money> = values
        .iter()
        .filter_map(|v| match v {
            Value::Money(m) => Some(&**m),
            _ => None,
        })
        .collect();
    let Some(first) = amounts.first() else {
        return Ok(None);
    };
    let scale = amounts.iter().map(|m| m.scale).max().unwrap_or(first.scale);
    let mut total: i64 = 0;
    for money in &amounts {
        total = money
            .amount_at_scale(scale)
            .and_then(|amount| total.checked_add(amount))
            .ok_or_else(|| integer_overflow("sum"))?;
    }
    Ok(Some(Money::new(total, first.currency.clone(), scale)))
}

fn numeric_sum(values: &[Value]) -> EvalResult {
    if values.iter().any(|v| matches!(v, Value::Float(_))) {
        return Ok(Value::Float(values.iter().filter_map(Value::as_f64).sum()));
    }
    let mut total: i64 = 0;
    for value in values {
        if let Value::Int(n) = value {
            total = total
                .checked_add(*n)
                .ok_or_else(|| integer_overflow("sum"))?;
        }
    }
    Ok(Value::Int(total))
}

fn log_failure<'a>(method: &'a str, column: &'a str) -> impl FnOnce(&EvalError) + 'a {
    move |error| debug!(method, column, %error, "table aggregate failed")
}

/// `sum(column)`: an integer, a float if any value is fractional, or
/// money. An empty column sums to `0`.
pub fn sum(table: &Table, column: &str) -> EvalResult {
    let values = gather(table, column, "sum", false).inspect_err(log_failure("sum", column))?;
    match money_total(&values).inspect_err(log_failure("sum", column))? {
        Some(total) => Ok(Value::money(total)),
        None => numeric_sum(&values),
    }
}

/// `avg(column)`: a float, or money rounded half to even. Null when the
/// column has no numbers.
#[expect(clippy::cast_precision_loss, reason = "averages are computed in f64")]
pub fn avg(table: &Table, column: &str) -> EvalResult {
    let values = gather(table, column, "avg", false).inspect_err(log_failure("avg", column))?;
    if values.is_empty() {
        return Ok(Value::Null);
    }
    let count = values.len() as f64;
    if let Some(total) = money_total(&values).inspect_err(log_failure("avg", column))? {
        let amount = bankers_round(total.amount as f64 / count)
            .ok_or_else(|| integer_overflow("average"))
            .inspect_err(log_failure("avg", column))?;
        return Ok(Value::money(Money::new(amount, total.currency, total.scale)));
    }
    let sum: f64 = values.iter().filter_map(Value::as_f64).sum();
    Ok(Value::Float(sum / count))
}

fn extreme(table: &Table, column: &str, method: &str, wanted: Ordering) -> EvalResult {
    let values = gather(table, column, method, true).inspect_err(log_failure(method, column))?;
    Ok(values
        .into_iter()
        .reduce(|best, v| {
            if compare_values(&v, &best) == wanted {
                v
            } else {
                best
            }
        })
        .unwrap_or(Value::Null))
}

/// `min(column)`: nulls skipped, numeric strings compared as numbers.
pub fn min(table: &Table, column: &str) -> EvalResult {
    extreme(table, column, "min", Ordering::Less)
}

/// `max(column)`: nulls skipped, numeric strings compared as numbers.
pub fn max(table: &Table, column: &str) -> EvalResult {
    extreme(table, column, "max", Ordering::Greater)
}
