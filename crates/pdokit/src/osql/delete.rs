//! DELETE statement builder.

use super::param::ParamMap;
use super::query::{Clauses, Query, impl_clause_methods};
use super::statement::Statement;
use super::table::TableRef;
use crate::error::{PdoError, PdoResult};
use crate::executor::{Executor, WriteResult};
use std::time::Instant;

/// DELETE statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    table: Option<TableRef>,
    clauses: Clauses,
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    impl_clause_methods!();

    /// Set the table to delete from.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Run the DELETE.
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

impl Query for Delete {
    fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    fn render(&self) -> PdoResult<Statement> {
        let table = self.table.as_ref().ok_or_else(PdoError::no_table)?;
        let mut params = ParamMap::new();
        let mut sql = format!("DELETE FROM {}", table.render_target()?);
        sql.push_str(&self.clauses.render_tail(&mut params));
        Ok(Statement::new(sql, params))
    }
}
