//! Execution seam between rendered statements and a database driver.
//!
//! Builders and the table layer only ever talk to [`Executor`]. The MySQL
//! implementation lives in [`mysql`] behind the `mysql` feature; tests can
//! plug in an in-memory implementation.

pub mod placeholders;

#[cfg(feature = "mysql")]
pub mod mysql;

use crate::error::{PdoError, PdoResult};
use crate::osql::Statement;
use crate::quote::{MySqlQuoter, Quoter};
use crate::row::{FromRow, Row};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use placeholders::to_positional;

#[cfg(feature = "mysql")]
pub use mysql::{MySqlExecutor, create_pool};

/// What a write statement reports back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub affected: u64,
    pub last_insert_id: Option<u64>,
}

/// A trait that runs rendered statements.
///
/// Implementations must be usable from several tasks at once.
pub trait Executor: Send + Sync {
    /// Run a query and return all rows.
    fn fetch_all(&self, stmt: &Statement) -> impl Future<Output = PdoResult<Vec<Row>>> + Send;

    /// Run a `SQL_CALC_FOUND_ROWS` query and look up `FOUND_ROWS()` on the
    /// same connection.
    ///
    /// The default implementation reports that found rows are unsupported.
    fn fetch_counted(
        &self,
        stmt: &Statement,
    ) -> impl Future<Output = PdoResult<(Vec<Row>, u64)>> + Send {
        let _ = stmt;
        async { Err(PdoError::Other("found rows lookup is not supported by this executor".to_string())) }
    }

    /// Run a write statement.
    fn execute(&self, stmt: &Statement) -> impl Future<Output = PdoResult<ExecOutcome>> + Send;

    /// Quoting primitive used for raw condition fragments.
    fn quoter(&self) -> &dyn Quoter {
        &MySqlQuoter
    }
}

impl<T: Executor> Executor for &T {
    fn fetch_all(&self, stmt: &Statement) -> impl Future<Output = PdoResult<Vec<Row>>> + Send {
        (**self).fetch_all(stmt)
    }

    fn fetch_counted(
        &self,
        stmt: &Statement,
    ) -> impl Future<Output = PdoResult<(Vec<Row>, u64)>> + Send {
        (**self).fetch_counted(stmt)
    }

    fn execute(&self, stmt: &Statement) -> impl Future<Output = PdoResult<ExecOutcome>> + Send {
        (**self).execute(stmt)
    }

    fn quoter(&self) -> &dyn Quoter {
        (**self).quoter()
    }
}

impl<T: Executor> Executor for Arc<T> {
    fn fetch_all(&self, stmt: &Statement) -> impl Future<Output = PdoResult<Vec<Row>>> + Send {
        (**self).fetch_all(stmt)
    }

    fn fetch_counted(
        &self,
        stmt: &Statement,
    ) -> impl Future<Output = PdoResult<(Vec<Row>, u64)>> + Send {
        (**self).fetch_counted(stmt)
    }

    fn execute(&self, stmt: &Statement) -> impl Future<Output = PdoResult<ExecOutcome>> + Send {
        (**self).execute(stmt)
    }

    fn quoter(&self) -> &dyn Quoter {
        (**self).quoter()
    }
}

/// Rows returned by a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectResult {
    pub rows: Vec<Row>,
    /// `FOUND_ROWS()` when the query was rendered with `count_rows(true)`.
    pub found_rows: Option<u64>,
    pub elapsed: Duration,
}

impl SelectResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Map every row to `T`.
    pub fn map_rows<T: FromRow>(&self) -> PdoResult<Vec<T>> {
        self.rows.iter().map(T::from_row).collect()
    }
}

/// Outcome of an INSERT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertResult {
    pub affected: u64,
    pub last_insert_id: Option<u64>,
    pub elapsed: Duration,
}

/// Outcome of an UPDATE or DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    pub affected: u64,
    pub elapsed: Duration,
}
