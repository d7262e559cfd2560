//! Clause state and rendering shared by every statement builder.

use super::group::{BoolOp, Predicate};
use super::param::{Param, ParamMap};
use super::statement::Statement;
use super::table::Join;
use crate::error::{PdoError, PdoResult};
use crate::value::Value;

/// Joins, WHERE entries and LIMIT/OFFSET accumulated by a builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    pub(crate) conditions: Vec<(BoolOp, Predicate)>,
    pub(crate) joins: Vec<Join>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
}

impl Clauses {
    pub(crate) fn push(&mut self, op: BoolOp, predicate: Predicate) -> PdoResult<()> {
        if op == BoolOp::Or && self.conditions.is_empty() {
            return Err(PdoError::state("cannot OR onto an empty condition list"));
        }
        self.conditions.push((op, predicate));
        Ok(())
    }

    pub(crate) fn set_limit(&mut self, limit: Option<i64>) -> PdoResult<()> {
        self.limit = check_positive("limit", limit)?;
        Ok(())
    }

    pub(crate) fn set_offset(&mut self, offset: Option<i64>) -> PdoResult<()> {
        self.offset = check_positive("offset", offset)?;
        Ok(())
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// ` WHERE ...`, or `""` when nothing renders.
    ///
    /// Each entry after the first is joined with its own operator; the first
    /// entry's operator is ignored.
    pub fn render_conditions(&self, params: &mut ParamMap) -> String {
        let mut sql = String::new();
        for (op, predicate) in &self.conditions {
            let fragment = predicate.render_nested(params);
            if fragment.is_empty() {
                continue;
            }
            if !sql.is_empty() {
                sql.push_str(op.separator());
            }
            sql.push_str(&fragment);
        }
        if sql.is_empty() { sql } else { format!(" WHERE {sql}") }
    }

    pub fn render_joins(&self) -> String {
        self.joins.iter().map(Join::render).collect()
    }

    pub fn render_limit(&self, params: &mut ParamMap) -> String {
        render_bound(" LIMIT", "limit", self.limit, params)
    }

    pub fn render_offset(&self, params: &mut ParamMap) -> String {
        render_bound(" OFFSET", "offset", self.offset, params)
    }

    /// `<WHERE><LIMIT><OFFSET>`, the tail shared by INSERT, UPDATE and DELETE.
    pub(crate) fn render_tail(&self, params: &mut ParamMap) -> String {
        let mut sql = self.render_conditions(params);
        sql.push_str(&self.render_limit(params));
        sql.push_str(&self.render_offset(params));
        sql
    }
}

fn check_positive(what: &str, n: Option<i64>) -> PdoResult<Option<i64>> {
    match n {
        Some(n) if n <= 0 => Err(PdoError::invalid_argument(format!(
            "{what} must be a positive integer, got {n}"
        ))),
        other => Ok(other),
    }
}

fn render_bound(keyword: &str, name: &str, n: Option<i64>, params: &mut ParamMap) -> String {
    match n {
        Some(n) => {
            let key = params.bind_named(name, Param::new(Value::Int(n)));
            format!("{keyword} :{key}")
        }
        None => String::new(),
    }
}

/// Base trait for all statement builders.
pub trait Query {
    /// Accumulated clause state.
    fn clauses(&self) -> &Clauses;

    /// Render the statement and its parameters.
    fn render(&self) -> PdoResult<Statement>;

    /// Debug helper returning only the SQL text.
    fn to_sql(&self) -> PdoResult<String> {
        Ok(self.render()?.query)
    }

    fn render_conditions(&self, params: &mut ParamMap) -> String {
        self.clauses().render_conditions(params)
    }

    fn render_joins(&self) -> String {
        self.clauses().render_joins()
    }

    fn render_limit(&self, params: &mut ParamMap) -> String {
        self.clauses().render_limit(params)
    }

    fn render_offset(&self, params: &mut ParamMap) -> String {
        self.clauses().render_offset(params)
    }
}

/// Generate the WHERE / LIMIT / OFFSET methods for a builder with a
/// `clauses: Clauses` field.
///
/// Usage:
/// ```ignore
/// impl Select {
///     impl_clause_methods!();
/// }
/// ```
macro_rules! impl_clause_methods {
    () => {
        /// Add a predicate; same as [`and`](Self::and).
        pub fn where_(self, predicate: impl Into<$crate::osql::Predicate>) -> Self {
            self.and(predicate)
        }

        /// Add a predicate joined with AND.
        pub fn and(mut self, predicate: impl Into<$crate::osql::Predicate>) -> Self {
            self.clauses.conditions.push(($crate::osql::BoolOp::And, predicate.into()));
            self
        }

        /// Add a predicate joined with OR. Fails if nothing precedes it.
        pub fn or(
            mut self,
            predicate: impl Into<$crate::osql::Predicate>,
        ) -> $crate::error::PdoResult<Self> {
            self.clauses.push($crate::osql::BoolOp::Or, predicate.into())?;
            Ok(self)
        }

        /// Add a raw SQL predicate joined with AND.
        pub fn where_raw(self, sql: impl Into<String>) -> Self {
            self.and($crate::osql::Predicate::Raw(sql.into()))
        }

        /// Set LIMIT. `None` clears it; zero or negative is rejected.
        pub fn limit(mut self, limit: impl Into<Option<i64>>) -> $crate::error::PdoResult<Self> {
            self.clauses.set_limit(limit.into())?;
            Ok(self)
        }

        /// Set OFFSET. `None` clears it; zero or negative is rejected.
        pub fn offset(mut self, offset: impl Into<Option<i64>>) -> $crate::error::PdoResult<Self> {
            self.clauses.set_offset(offset.into())?;
            Ok(self)
        }
    };
}

/// Generate the JOIN methods for builders that render joins.
macro_rules! impl_join_methods {
    () => {
        /// `JOIN table ON left = right`, or `JOIN table USING (left)`.
        pub fn join(self, table: &str, left_key: &str, right_key: Option<&str>) -> Self {
            self.join_with($crate::osql::Join::new(
                table,
                left_key,
                right_key,
                $crate::osql::JoinType::Natural,
            ))
        }

        /// `LEFT JOIN table ON left = right`.
        pub fn left_join(self, table: &str, left_key: &str, right_key: Option<&str>) -> Self {
            self.join_with($crate::osql::Join::new(
                table,
                left_key,
                right_key,
                $crate::osql::JoinType::Left,
            ))
        }

        /// `RIGHT JOIN table ON left = right`.
        pub fn right_join(self, table: &str, left_key: &str, right_key: Option<&str>) -> Self {
            self.join_with($crate::osql::Join::new(
                table,
                left_key,
                right_key,
                $crate::osql::JoinType::Right,
            ))
        }

        pub fn join_with(mut self, join: $crate::osql::Join) -> Self {
            self.clauses.joins.push(join);
            self
        }
    };
}

pub(crate) use impl_clause_methods;
pub(crate) use impl_join_methods;
