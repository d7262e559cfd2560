//! Convenient imports for typical `pdokit` usage.
//!
//! ```ignore
//! use pdokit::prelude::*;
//! ```

pub use crate::osql;
pub use crate::{
    Condition, ConditionGroup, Conditions, Direction, Executor, FindOptions, Focus, PdoError,
    PdoResult, Query, Record, Row, Table, TableSchema, Value,
};

#[cfg(feature = "mysql")]
pub use crate::{ExecutorConfig, MySqlExecutor, create_pool};
