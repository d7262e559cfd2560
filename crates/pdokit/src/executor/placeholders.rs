//! Rewriting of `:name` placeholders to positional `?` markers.

use crate::error::{PdoError, PdoResult};
use crate::osql::{Param, Statement};

/// Rewrite every `:name` placeholder in `stmt.query` to `?` and return the
/// parameters in order of appearance.
///
/// Quoted literals (`'..'`, `".."`) and backtick identifiers are copied
/// through untouched. A name that occurs twice is bound twice.
pub fn to_positional(stmt: &Statement) -> PdoResult<(String, Vec<&Param>)> {
    let sql = stmt.query.as_str();
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut binds = Vec::with_capacity(stmt.parameters.len());
    let mut quote: Option<u8> = None;
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' && q != b'`' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' | b'"' | b'`' => {
                quote = Some(b);
                i += 1;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' if bytes.get(i + 1).is_some_and(|c| is_name_start(*c)) => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && is_name_char(bytes[end]) {
                    end += 1;
                }
                let name = &sql[start..end];
                let param = stmt.parameters.get(name).ok_or_else(|| {
                    PdoError::invalid_argument(format!("no value bound for placeholder :{name}"))
                })?;
                out.push_str(&sql[copied..i]);
                out.push('?');
                binds.push(param);
                copied = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    out.push_str(&sql[copied.min(sql.len())..]);
    Ok((out, binds))
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osql::{Param, ParamMap};
    use crate::value::Value;

    fn stmt(sql: &str, names: &[&str]) -> Statement {
        let mut params = ParamMap::new();
        for (i, name) in names.iter().enumerate() {
            params.bind_named(name, Param::new(Value::Int(i as i64)));
        }
        Statement::new(sql, params)
    }

    #[test]
    fn test_rewrites_in_order_of_appearance() {
        let s = stmt("SELECT * FROM t WHERE b = :b AND a = :a LIMIT :limit", &["a", "b", "limit"]);
        let (sql, binds) = to_positional(&s).unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE b = ? AND a = ? LIMIT ?");
        let values: Vec<_> = binds.iter().map(|p| p.value.clone()).collect();
        assert_eq!(values, [Value::Int(1), Value::Int(0), Value::Int(2)]);
    }

    #[test]
    fn test_skips_quoted_regions() {
        let s = stmt("SELECT ':x', `a:b`, \"it\\\":s\" FROM t WHERE a = :a", &["a"]);
        let (sql, binds) = to_positional(&s).unwrap();
        assert_eq!(sql, "SELECT ':x', `a:b`, \"it\\\":s\" FROM t WHERE a = ?");
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn test_missing_parameter_is_an_error() {
        let s = stmt("SELECT * FROM t WHERE a = :a", &[]);
        assert!(to_positional(&s).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_leaves_casts_and_times_alone() {
        let s = stmt("SELECT '10:30', a::text FROM t", &[]);
        let (sql, _) = to_positional(&s).unwrap();
        assert_eq!(sql, "SELECT '10:30', a::text FROM t");
    }
}
