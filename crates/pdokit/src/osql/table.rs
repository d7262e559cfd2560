//! Table references and joins.

use crate::error::{PdoError, PdoResult};
use std::fmt;

/// How a joined table is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Natural,
    Left,
    Right,
}

impl JoinType {
    /// Parse `natural` / `left` / `right`, case-insensitively.
    pub fn parse(kind: &str) -> PdoResult<Self> {
        match kind.trim().to_ascii_uppercase().as_str() {
            "NATURAL" | "" => Ok(JoinType::Natural),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            _ => Err(PdoError::invalid_argument(format!("invalid join type: {kind}"))),
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            JoinType::Natural => " JOIN ",
            JoinType::Left => " LEFT JOIN ",
            JoinType::Right => " RIGHT JOIN ",
        }
    }
}

/// A declared join: `JOIN t ON left = right`, or `JOIN t USING (left)` when
/// no right key is given.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub left_key: String,
    pub right_key: Option<String>,
    pub kind: JoinType,
}

impl Join {
    pub fn new(
        table: impl Into<String>,
        left_key: impl Into<String>,
        right_key: Option<&str>,
        kind: JoinType,
    ) -> Self {
        Self {
            table: table.into(),
            left_key: left_key.into(),
            right_key: right_key.map(str::to_string),
            kind,
        }
    }

    pub fn render(&self) -> String {
        let kw = self.kind.keyword();
        match &self.right_key {
            Some(right) => format!("{kw}{} ON {} = {right}", self.table, self.left_key),
            None => format!("{kw}{} USING ({})", self.table, self.left_key),
        }
    }
}

/// A table with an optional alias and its own joins.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    name: String,
    alias: Option<String>,
    joins: Vec<Join>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            joins: Vec::new(),
        }
    }

    /// `TableRef::aliased("users", "u")` renders `users AS u`.
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(name).as_(alias)
    }

    /// Set the alias.
    pub fn as_(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Attach a natural join.
    pub fn join(self, table: impl Into<String>, left_key: impl Into<String>, right_key: Option<&str>) -> Self {
        self.join_with(Join::new(table, left_key, right_key, JoinType::Natural))
    }

    /// `JOIN t USING (col)`.
    pub fn join_using(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.join_with(Join::new(table, column, None, JoinType::Natural))
    }

    pub fn join_with(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias, unless it just repeats the name.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|a| !a.is_empty() && *a != self.name)
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub(crate) fn check(&self) -> PdoResult<()> {
        if self.name.trim().is_empty() {
            return Err(PdoError::invalid_argument("table name is empty"));
        }
        Ok(())
    }

    /// `name` or `name AS alias`, without joins.
    pub fn render_target(&self) -> PdoResult<String> {
        self.check()?;
        Ok(match self.alias() {
            Some(alias) => format!("{} AS {alias}", self.name),
            None => self.name.clone(),
        })
    }

    /// FROM-clause fragment: target followed by the table's joins.
    pub fn render(&self) -> PdoResult<String> {
        let mut sql = self.render_target()?;
        for join in &self.joins {
            sql.push_str(&join.render());
        }
        Ok(sql)
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::new(name)
    }
}

impl From<String> for TableRef {
    fn from(name: String) -> Self {
        TableRef::new(name)
    }
}

impl From<&String> for TableRef {
    fn from(name: &String) -> Self {
        TableRef::new(name.clone())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(sql) => f.write_str(&sql),
            Err(_) => f.write_str("<invalid table>"),
        }
    }
}
