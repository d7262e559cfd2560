//! Value quoting and identifier masking for raw SQL fragments.

/// Connection-level quoting primitive.
pub trait Quoter: Send + Sync {
    /// Quote a string literal, including the surrounding quotes.
    fn quote(&self, value: &str) -> String;
}

/// Quoting with MySQL's escape rules.
///
/// Single quotes are doubled rather than backslash-escaped, so the literal
/// stays closed under `NO_BACKSLASH_ESCAPES` as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlQuoter;

impl Quoter for MySqlQuoter {
    fn quote(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("''"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }
}

/// Wrap an identifier in backticks, doubling any backtick inside it.
pub fn mask_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_quote() {
        let q = MySqlQuoter;
        assert_eq!(q.quote("test"), "'test'");
        assert_eq!(q.quote("it's"), "'it''s'");
        assert_eq!(q.quote("a\\b\n"), r"'a\\b\n'");
    }

    #[test]
    fn test_quote_survives_no_backslash_escapes() {
        let q = MySqlQuoter;
        for input in ["' OR 1=1 -- ", "\\' OR 1=1 -- ", "a'b'c", "\\"] {
            let quoted = q.quote(input);
            let body = &quoted[1..quoted.len() - 1];
            // Read with backslashes as plain characters, every quote in the
            // body must be part of a doubled pair.
            assert_eq!(body.matches('\'').count() % 2, 0, "{quoted}");
            assert!(!body.replace("''", "").contains('\''), "{quoted}");
        }
        assert_eq!(q.quote("' OR 1=1 -- "), "''' OR 1=1 -- '");
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("age"), "`age`");
        assert_eq!(mask_identifier("we`ird"), "`we``ird`");
    }
}
