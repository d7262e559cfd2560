//! AND/OR combinations of conditions.

use super::condition::Condition;
use super::param::ParamMap;
use crate::error::{PdoError, PdoResult};
use std::fmt;

/// Boolean connective between predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

impl BoolOp {
    /// Parse `and` / `or`, case-insensitively.
    pub fn parse(op: &str) -> PdoResult<Self> {
        match op.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(BoolOp::And),
            "OR" => Ok(BoolOp::Or),
            _ => Err(PdoError::invalid_argument(format!(
                "invalid group operation: {op}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }

    pub(crate) fn separator(&self) -> &'static str {
        match self {
            BoolOp::And => " AND ",
            BoolOp::Or => " OR ",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can appear in a WHERE list.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Condition(Condition),
    Group(ConditionGroup),
    /// Pre-rendered SQL without parameters.
    Raw(String),
}

impl Predicate {
    /// Render as a top-level predicate.
    pub fn render(&self, params: &mut ParamMap) -> String {
        match self {
            Predicate::Condition(c) => c.render(params),
            Predicate::Group(g) => g.render(params),
            Predicate::Raw(sql) => sql.clone(),
        }
    }

    /// Render as a child of a group: groups and raw fragments get one pair
    /// of parentheses.
    pub(crate) fn render_nested(&self, params: &mut ParamMap) -> String {
        match self {
            Predicate::Condition(c) => c.render(params),
            Predicate::Group(_) | Predicate::Raw(_) => {
                let sql = self.render(params);
                if sql.is_empty() { sql } else { format!("({sql})") }
            }
        }
    }
}

impl From<Condition> for Predicate {
    fn from(c: Condition) -> Self {
        Predicate::Condition(c)
    }
}

impl From<ConditionGroup> for Predicate {
    fn from(g: ConditionGroup) -> Self {
        Predicate::Group(g)
    }
}

/// An AND/OR group of conditions and nested groups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    operation: BoolOp,
    children: Vec<Predicate>,
}

impl ConditionGroup {
    /// Create an empty group from an operation string (`and` / `or`).
    pub fn new(operation: &str) -> PdoResult<Self> {
        Ok(Self::with_op(BoolOp::parse(operation)?))
    }

    pub fn with_op(operation: BoolOp) -> Self {
        Self {
            operation,
            children: Vec::new(),
        }
    }

    /// Empty AND group.
    pub fn and() -> Self {
        Self::with_op(BoolOp::And)
    }

    /// Empty OR group.
    pub fn or() -> Self {
        Self::with_op(BoolOp::Or)
    }

    pub fn operation(&self) -> BoolOp {
        self.operation
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a condition or nested group.
    pub fn push(&mut self, predicate: impl Into<Predicate>) {
        self.children.push(predicate.into());
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, predicate: impl Into<Predicate>) -> Self {
        self.push(predicate);
        self
    }

    /// Render children joined by the group's operation; empty children are
    /// skipped.
    pub fn render(&self, params: &mut ParamMap) -> String {
        self.children
            .iter()
            .map(|c| c.render_nested(params))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(self.operation.separator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: &str, v: i64) -> Condition {
        Condition::eq(field, v).unwrap()
    }

    #[test]
    fn test_and_group() {
        let mut params = ParamMap::new();
        let g = ConditionGroup::and().with(cond("a", 1)).with(cond("b", 2));
        assert_eq!(g.render(&mut params), "a = :c_a_0 AND b = :c_b_0");
    }

    #[test]
    fn test_nested_group_gets_one_paren_pair() {
        let mut params = ParamMap::new();
        let inner = ConditionGroup::or().with(cond("b", 2)).with(cond("c", 3));
        let g = ConditionGroup::and().with(cond("a", 1)).with(inner);
        assert_eq!(g.render(&mut params), "a = :c_a_0 AND (b = :c_b_0 OR c = :c_c_0)");
    }

    #[test]
    fn test_empty_children_skipped() {
        let mut params = ParamMap::new();
        let g = ConditionGroup::or()
            .with(ConditionGroup::and())
            .with(cond("a", 1));
        assert_eq!(g.render(&mut params), "a = :c_a_0");
        assert_eq!(ConditionGroup::and().render(&mut params), "");
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!(ConditionGroup::new("or").unwrap().operation(), BoolOp::Or);
        assert_eq!(ConditionGroup::new("And").unwrap().operation(), BoolOp::And);
        assert!(ConditionGroup::new("xor").unwrap_err().is_invalid_argument());
    }
}
