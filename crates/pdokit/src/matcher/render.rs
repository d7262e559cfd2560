//! Rendering of parsed matchers into raw WHERE fragments.

use super::ast::Matcher;
use crate::quote::Quoter;

/// Whether `s` is a plain decimal number (optional sign, digits, optional
/// fraction and exponent). Such values are safe to emit unquoted.
pub fn is_numeric(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < b.len() && matches!(b[i], b'e' | b'E') {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}

/// Numeric values pass through, NULL becomes `NULL`, everything else is
/// quoted by the connection.
pub fn secure_value(value: Option<&str>, quoter: &dyn Quoter) -> String {
    match value {
        None => "NULL".to_string(),
        Some(v) if is_numeric(v) => v.to_string(),
        Some(v) => quoter.quote(v),
    }
}

/// Render `matcher` against an already masked (or raw) column expression.
pub fn render_matcher(column: &str, matcher: &Matcher, quoter: &dyn Quoter) -> String {
    match matcher {
        Matcher::Between { negated, low, high } => {
            let not = if *negated { "NOT " } else { "" };
            format!("{column} {not}BETWEEN {low} AND {high}")
        }
        Matcher::Bitwise { op, operand } => format!("{column} {op} {operand}"),
        Matcher::Compare { op, operand } => {
            format!("{column} {op} {}", secure_value(Some(operand), quoter))
        }
        Matcher::Like { negated, pattern } => {
            let not = if *negated { "NOT " } else { "" };
            format!("{column} {not}LIKE {}", secure_value(Some(pattern), quoter))
        }
        Matcher::NullLiteral { negated: false } => format!("{column} IS NULL"),
        Matcher::NullLiteral { negated: true } => format!("{column} IS NOT NULL"),
        Matcher::Equals(value) => format!("{column} = {}", secure_value(Some(value), quoter)),
    }
}
