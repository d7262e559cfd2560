//! INSERT statement builder.

use super::param::{Param, ParamMap, sanitize_key};
use super::query::{Clauses, Query, impl_clause_methods};
use super::statement::Statement;
use super::table::TableRef;
use crate::error::{PdoError, PdoResult};
use crate::executor::{Executor, InsertResult};
use crate::value::Value;
use std::time::Instant;

/// INSERT statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    table: Option<TableRef>,
    values: Vec<(String, Value)>,
    clauses: Clauses,
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    impl_clause_methods!();

    /// Set the target table.
    pub fn into(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set a column value. Setting the same column again replaces the value
    /// but keeps its original position.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        set_value(&mut self.values, column.into(), value.into());
        self
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }

    /// Run the INSERT.
    pub async fn execute(&self, exec: &impl Executor) -> PdoResult<InsertResult> {
        let stmt = self.render()?;
        let start = Instant::now();
        let outcome = exec.execute(&stmt).await?;
        Ok(InsertResult {
            affected: outcome.affected,
            last_insert_id: outcome.last_insert_id,
            elapsed: start.elapsed(),
        })
    }
}

impl Query for Insert {
    fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    fn render(&self) -> PdoResult<Statement> {
        let table = self.table.as_ref().ok_or_else(PdoError::no_table)?;
        table.check()?;
        let mut params = ParamMap::new();
        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        for (column, value) in &self.values {
            check_column(column)?;
            let key = params.bind_named(&sanitize_key(column), Param::new(value.clone()));
            columns.push(column.as_str());
            placeholders.push(format!(":{key}"));
        }
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUE ({})",
            table.name(),
            columns.join(","),
            placeholders.join(",")
        );
        sql.push_str(&self.clauses.render_tail(&mut params));
        Ok(Statement::new(sql, params))
    }
}

pub(crate) fn set_value(values: &mut Vec<(String, Value)>, column: String, value: Value) {
    match values.iter_mut().find(|(c, _)| *c == column) {
        Some(slot) => slot.1 = value,
        None => values.push((column, value)),
    }
}

pub(crate) fn check_column(column: &str) -> PdoResult<()> {
    if column.trim().is_empty() {
        return Err(PdoError::invalid_argument("column name is empty"));
    }
    Ok(())
}
