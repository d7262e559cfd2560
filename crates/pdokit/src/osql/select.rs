//! SELECT statement builder.

use super::param::ParamMap;
use super::query::{Clauses, Query, impl_clause_methods, impl_join_methods};
use super::statement::Statement;
use super::table::TableRef;
use crate::error::{PdoError, PdoResult};
use crate::executor::{Executor, SelectResult};
use crate::row::{FromRow, Row};
use std::fmt;
use std::time::Instant;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Parse `asc` / `desc`, case-insensitively.
    pub fn parse(direction: &str) -> PdoResult<Self> {
        match direction.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            _ => Err(PdoError::invalid_argument(format!(
                "invalid order direction: {direction}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything accepted by [`Select::get`]: one field expression or a list.
pub trait IntoFields {
    fn into_fields(self) -> Vec<String>;
}

impl IntoFields for &str {
    fn into_fields(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoFields for String {
    fn into_fields(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoFields for &[&str] {
    fn into_fields(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoFields for [&str; N] {
    fn into_fields(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoFields for Vec<&str> {
    fn into_fields(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoFields for Vec<String> {
    fn into_fields(self) -> Vec<String> {
        self
    }
}

/// SELECT statement builder.
///
/// ```ignore
/// let stmt = select()
///     .get(["id", "name"])?
///     .from("users")
///     .where_(Condition::gt("age", 18)?)
///     .order("name", Direction::Asc)
///     .limit(10)?
///     .render()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    fields: Vec<String>,
    tables: Vec<TableRef>,
    clauses: Clauses,
    group_by: Option<String>,
    order_by: Vec<(String, Direction)>,
    count_rows: bool,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    impl_clause_methods!();
    impl_join_methods!();

    /// Set the selected fields. Empty field names are rejected.
    pub fn get(mut self, fields: impl IntoFields) -> PdoResult<Self> {
        let fields = fields.into_fields();
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(PdoError::invalid_argument("field name is empty"));
        }
        self.fields = fields;
        Ok(self)
    }

    /// Add a table to the FROM list. Repeated calls are comma-separated.
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.tables.push(table.into());
        self
    }

    /// Toggle `SQL_CALC_FOUND_ROWS`; [`fetch`](Self::fetch) then reports the
    /// total row count ignoring LIMIT.
    pub fn count_rows(mut self, enabled: bool) -> Self {
        self.count_rows = enabled;
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by = Some(field.into());
        self
    }

    pub fn order(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    /// Like [`order`](Self::order) with the direction given as text.
    pub fn order_by(self, field: impl Into<String>, direction: &str) -> PdoResult<Self> {
        Ok(self.order(field, Direction::parse(direction)?))
    }

    pub fn is_counting_rows(&self) -> bool {
        self.count_rows
    }

    fn render_fields(&self) -> String {
        if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        }
    }

    fn render_tables(&self) -> PdoResult<String> {
        if self.tables.is_empty() {
            return Err(PdoError::no_table());
        }
        let tables = self
            .tables
            .iter()
            .map(TableRef::render)
            .collect::<PdoResult<Vec<_>>>()?;
        Ok(tables.join(", "))
    }

    fn render_group(&self) -> String {
        match &self.group_by {
            Some(field) => format!(" GROUP BY {field}"),
            None => String::new(),
        }
    }

    fn render_order(&self) -> String {
        if self.order_by.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self
            .order_by
            .iter()
            .map(|(field, dir)| format!("{field} {dir}"))
            .collect();
        format!(" ORDER BY {}", items.join(", "))
    }

    /// Run the query and collect its rows, with `found_rows` filled in when
    /// counting was requested.
    pub async fn fetch(&self, exec: &impl Executor) -> PdoResult<SelectResult> {
        let stmt = self.render()?;
        let start = Instant::now();
        let (rows, found_rows) = if self.count_rows {
            let (rows, found) = exec.fetch_counted(&stmt).await?;
            (rows, Some(found))
        } else {
            (exec.fetch_all(&stmt).await?, None)
        };
        Ok(SelectResult {
            rows,
            found_rows,
            elapsed: start.elapsed(),
        })
    }

    /// Run the query and map all rows to `T`.
    pub async fn fetch_as<T: FromRow>(&self, exec: &impl Executor) -> PdoResult<Vec<T>> {
        self.fetch(exec).await?.map_rows()
    }

    /// Run the query and return the first row, if any.
    pub async fn fetch_opt(&self, exec: &impl Executor) -> PdoResult<Option<Row>> {
        Ok(self.fetch(exec).await?.rows.into_iter().next())
    }
}

impl Query for Select {
    fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    fn render(&self) -> PdoResult<Statement> {
        let tables = self.render_tables()?;
        let mut params = ParamMap::new();
        let mut sql = String::from("SELECT ");
        if self.count_rows {
            sql.push_str("SQL_CALC_FOUND_ROWS ");
        }
        sql.push_str(&self.render_fields());
        sql.push_str(" FROM ");
        sql.push_str(&tables);
        sql.push_str(&self.clauses.render_joins());
        sql.push_str(&self.clauses.render_conditions(&mut params));
        sql.push_str(&self.render_group());
        sql.push_str(&self.render_order());
        sql.push_str(&self.clauses.render_limit(&mut params));
        sql.push_str(&self.clauses.render_offset(&mut params));
        Ok(Statement::new(sql, params))
    }
}
