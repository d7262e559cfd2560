//! UPDATE statement builder.

use super::insert::{check_column, set_value};
use super::param::{Param, ParamMap, sanitize_key};
use super::query::{Clauses, Query, impl_clause_methods, impl_join_methods};
use super::statement::Statement;
use super::table::TableRef;
use crate::error::{PdoError, PdoResult};
use crate::executor::{Executor, WriteResult};
use crate::value::Value;
use std::time::Instant;

/// UPDATE statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    table: Option<TableRef>,
    values: Vec<(String, Value)>,
    clauses: Clauses,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    impl_clause_methods!();
    impl_join_methods!();

    /// Set the table to update.
    pub fn in_(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set a column value; a repeated column keeps its first position.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        set_value(&mut self.values, column.into(), value.into());
        self
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Run the UPDATE.
    pub async fn execute(&self, exec: &impl Executor) -> PdoResult<WriteResult> {
        let stmt = self.render()?;
        let start = Instant::now();
        let outcome = exec.execute(&stmt).await?;
        Ok(WriteResult {
            affected: outcome.affected,
            elapsed: start.elapsed(),
        })
    }
}

impl Query for Update {
    fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    fn render(&self) -> PdoResult<Statement> {
        let table = self.table.as_ref().ok_or_else(PdoError::no_table)?;
        let target = table.render_target()?;
        if self.values.is_empty() {
            return Err(PdoError::state("UPDATE requires at least one SET column"));
        }
        let mut params = ParamMap::new();
        let mut assignments = Vec::with_capacity(self.values.len());
        for (column, value) in &self.values {
            check_column(column)?;
            let key = params.bind_named(&sanitize_key(column), Param::new(value.clone()));
            assignments.push(format!("{column}=:{key}"));
        }
        let mut sql = format!("UPDATE {target}");
        sql.push_str(&self.clauses.render_joins());
        sql.push_str(" SET ");
        sql.push_str(&assignments.join(", "));
        sql.push_str(&self.clauses.render_tail(&mut params));
        Ok(Statement::new(sql, params))
    }
}
