//! Built-in string format checks.

use std::sync::OnceLock;

use parsley_value::StringKind;
use regex::Regex;

const EMAIL: &str = r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$";
const URL: &str = r"^https?://[^\s/$.?#].[^\s]*$";
const PHONE: &str = r"^[\d\s\+\-\(\)\.]+$";
const SLUG: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static URL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static PHONE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static SLUG_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, s: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}

/// Whether `s` is well-formed for `kind`. Plain strings always are.
pub(crate) fn is_valid(kind: StringKind, s: &str) -> bool {
    match kind {
        StringKind::Plain => true,
        StringKind::Email => matches(&EMAIL_RE, EMAIL, s),
        StringKind::Url => matches(&URL_RE, URL, s),
        StringKind::Phone => matches(&PHONE_RE, PHONE, s),
        StringKind::Slug => matches(&SLUG_RE, SLUG, s),
        StringKind::Uuid => is_uuid(s),
        StringKind::Ulid => is_ulid(s),
    }
}

/// `8-4-4-4-12` hex digits.
fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => c.is_ascii_hexdigit(),
        })
}

/// 26 characters of Crockford base32 (no I, L, O, or U).
fn is_ulid(s: &str) -> bool {
    s.len() == 26
        && s.chars().all(|c| {
            let c = c.to_ascii_uppercase();
            c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'L' | 'O' | 'U'))
        })
}
