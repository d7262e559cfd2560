//! # pdokit
//!
//! Object-oriented SQL builders and focus-based table access for MySQL.
//!
//! ## Features
//!
//! - **Builders that render, not run**: `osql` builders produce a [`Statement`]
//!   with `:name` placeholders and a typed [`ParamMap`]
//! - **Operators inside values**: the [`matcher`] mini-language turns values like
//!   `><1 & 5` or `!%bot%` into WHERE fragments
//! - **Declared tables**: [`Table`] pairs a [`TableSchema`] with an executor and
//!   reads or writes [`Record`]s by [`Focus`] or by [`Conditions`]
//! - **Pluggable execution**: everything runs through the [`Executor`] trait; the
//!   `mysql` feature ships a `sqlx`-backed implementation
//!
//! ## Query builders
//!
//! ```ignore
//! use pdokit::prelude::*;
//!
//! let page = osql::select()
//!     .get(["id", "name"])?
//!     .from("users")
//!     .where_(Condition::gte("age", 18)?)
//!     .order("name", Direction::Asc)
//!     .limit(20)?
//!     .count_rows(true)
//!     .fetch(&db)
//!     .await?;
//!
//! osql::update("users")
//!     .set("status", "inactive")
//!     .where_(Condition::eq("id", 42)?)
//!     .execute(&db)
//!     .await?;
//! ```
//!
//! ## Table access
//!
//! ```ignore
//! let users = TableSchema::builder("users")
//!     .columns(["id", "email", "age"])
//!     .primary_key(["id"])
//!     .build()?;
//! let table = Table::new(users, db);
//!
//! let user = table.reader().fetch(&Focus::primary(42)).await?;
//! let minors = table
//!     .reader()
//!     .count(&Conditions::new().push("age", "< 18"))
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod matcher;
pub mod osql;
pub mod prelude;
pub mod quote;
pub mod row;
pub mod table;
pub mod value;

pub use config::{ExecutorConfig, TableConfig};
pub use error::{PdoError, PdoResult};
pub use executor::{ExecOutcome, Executor, InsertResult, SelectResult, WriteResult};
pub use matcher::{Conditions, MatchValue};
pub use osql::{
    BoolOp, Condition, ConditionGroup, Delete, Direction, Insert, Join, JoinType, Operator, Param,
    ParamMap, Predicate, Query, Select, Statement, TableRef, Update,
};
pub use quote::{MySqlQuoter, Quoter, mask_identifier};
pub use row::{FromRow, FromValue, Row};
pub use table::{
    FindOptions, FindResult, Focus, MemoryCache, Reader, Record, RecordCache, Table, TableSchema,
    Writer,
};
pub use value::{ConditionValue, ParamType, Value};

#[cfg(feature = "mysql")]
pub use executor::{MySqlExecutor, create_pool};
