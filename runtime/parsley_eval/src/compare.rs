//! Value ordering for sorting, `min`/`max`, and string comparison.

use std::cmp::Ordering;

use parsley_value::{Thunk, Value};

/// Rank of a value's type when two different types are compared.
///
/// Null sorts first, then numbers, strings, booleans, units, money,
/// arrays, and dictionaries; everything else sorts last.
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::Str(_) => 2,
        Value::Bool(_) => 3,
        Value::Unit(_) => 5,
        Value::Money(_) => 6,
        Value::Array(_) => 7,
        Value::Dict(_) => 8,
        Value::Table(_)
        | Value::Record(_)
        | Value::Schema(_)
        | Value::Function(_)
        | Value::Error(_) => 9,
    }
}

/// Total order over values, used by `orderBy`, `min`, and `max`.
///
/// Integers and floats compare numerically, strings in natural order
/// (`"a2" < "a10"`), money by amount within one currency and by currency
/// code across currencies. Values of different kinds order by kind.
#[expect(clippy::cast_precision_loss, reason = "mixed int/float comparison")]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.total_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f64).total_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.total_cmp(&(*y as f64)),
        (Value::Str(x), Value::Str(y)) => natural_compare(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Money(x), Value::Money(y)) => {
            if x.currency != y.currency {
                return x.currency.cmp(&y.currency);
            }
            let scale = x.scale.max(y.scale);
            match (x.amount_at_scale(scale), y.amount_at_scale(scale)) {
                (Some(l), Some(r)) => l.cmp(&r),
                _ => x.to_f64().total_cmp(&y.to_f64()),
            }
        }
        (Value::Unit(x), Value::Unit(y)) if x.family == y.family => {
            x.amount.cmp(&y.amount_in(x.system))
        }
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare strings so that embedded digit runs order numerically.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let l_digits = l_run.trim_start_matches('0');
                let r_digits = r_run.trim_start_matches('0');
                let ord = l_digits
                    .len()
                    .cmp(&r_digits.len())
                    .then_with(|| l_digits.cmp(r_digits))
                    .then_with(|| l_run.len().cmp(&r_run.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Read a ready entry. Table rows and record data only ever hold forced
/// entries, so a deferred one reads as null.
pub(crate) fn ready_or_null(thunk: Option<&Thunk>) -> Value {
    thunk.and_then(Thunk::ready).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsley_value::Money;

    #[test]
    fn natural_order_of_digit_runs() {
        assert_eq!(natural_compare("a2", "a10"), Ordering::Less);
        assert_eq!(natural_compare("item10b", "item10a"), Ordering::Greater);
        assert_eq!(natural_compare("x", "x"), Ordering::Equal);
        assert_eq!(natural_compare("a", "ab"), Ordering::Less);
        assert_eq!(natural_compare("07", "7"), Ordering::Greater);
    }

    #[test]
    fn mixed_numbers_and_kinds() {
        assert_eq!(
            compare_values(&Value::Int(2), &Value::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Null, &Value::Int(0)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Int(100), &Value::string("1")),
            Ordering::Less
        );
    }

    #[test]
    fn money_across_scales() {
        let a = Value::money(Money::new(150, "USD", 2));
        let b = Value::money(Money::new(15, "USD", 1));
        assert_eq!(compare_values(&a, &b), Ordering::Equal);
    }
}
