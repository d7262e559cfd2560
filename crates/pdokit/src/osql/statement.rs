use super::param::ParamMap;
use serde::Serialize;
use std::fmt;

/// A rendered statement: SQL text with `:name` placeholders plus its bound
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statement {
    pub query: String,
    pub parameters: ParamMap,
}

impl Statement {
    pub fn new(query: impl Into<String>, parameters: ParamMap) -> Self {
        Self {
            query: query.into(),
            parameters,
        }
    }

    /// A statement with no parameters.
    pub fn raw(query: impl Into<String>) -> Self {
        Self::new(query, ParamMap::new())
    }

    /// Leading SQL keyword, upper-cased (`SELECT`, `INSERT`, ...).
    pub fn kind(&self) -> String {
        self.query
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}
