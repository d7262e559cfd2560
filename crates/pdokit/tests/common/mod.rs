//! In-memory executor shared by the integration tests.

#![allow(dead_code)]

use pdokit::executor::ExecOutcome;
use pdokit::{Executor, PdoResult, Row, Statement};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every statement it is handed and replays canned results.
#[derive(Default)]
pub struct MockExecutor {
    statements: Mutex<Vec<Statement>>,
    rows: Mutex<VecDeque<Vec<Row>>>,
    found_rows: Mutex<u64>,
    outcome: Mutex<ExecOutcome>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next SELECT.
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.rows.lock().unwrap().push_back(rows);
        self
    }

    pub fn set_found_rows(&self, n: u64) {
        *self.found_rows.lock().unwrap() = n;
    }

    pub fn set_outcome(&self, affected: u64, last_insert_id: Option<u64>) {
        *self.outcome.lock().unwrap() = ExecOutcome {
            affected,
            last_insert_id,
        };
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last(&self) -> Statement {
        self.statements.lock().unwrap().last().cloned().expect("no statement ran")
    }

    pub fn count(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    fn record(&self, stmt: &Statement) {
        self.statements.lock().unwrap().push(stmt.clone());
    }

    fn next_rows(&self) -> Vec<Row> {
        self.rows.lock().unwrap().pop_front().unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    async fn fetch_all(&self, stmt: &Statement) -> PdoResult<Vec<Row>> {
        self.record(stmt);
        Ok(self.next_rows())
    }

    async fn fetch_counted(&self, stmt: &Statement) -> PdoResult<(Vec<Row>, u64)> {
        self.record(stmt);
        let found = *self.found_rows.lock().unwrap();
        Ok((self.next_rows(), found))
    }

    async fn execute(&self, stmt: &Statement) -> PdoResult<ExecOutcome> {
        self.record(stmt);
        Ok(*self.outcome.lock().unwrap())
    }
}
