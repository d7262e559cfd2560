//! Object-oriented SQL builders.
//!
//! Builders accumulate state through consuming `mut self -> Self` calls and
//! render a [`Statement`] with `:name` placeholders and a typed
//! [`ParamMap`]. Nothing touches the database until an [`Executor`] runs the
//! statement.
//!
//! ```ignore
//! use pdokit::osql::{self, Condition, ConditionGroup, Query};
//!
//! let stmt = osql::select()
//!     .from("users")
//!     .where_(Condition::eq("status", "active")?)
//!     .and(ConditionGroup::or()
//!         .with(Condition::lt("age", 18)?)
//!         .with(Condition::gt("age", 65)?))
//!     .render()?;
//! // SELECT * FROM users WHERE status = :c_status_0 AND (age < :c_age_0 OR age > :c_age_1)
//! ```
//!
//! [`Executor`]: crate::executor::Executor

mod condition;
mod delete;
mod group;
mod insert;
mod param;
mod query;
mod select;
mod statement;
mod table;
mod update;


pub use condition::{Condition, Operator};
pub use delete::Delete;
pub use group::{BoolOp, ConditionGroup, Predicate};
pub use insert::Insert;
pub use param::{Param, ParamMap, sanitize_key};
pub use query::{Clauses, Query};
pub use select::{Direction, IntoFields, Select};
pub use statement::Statement;
pub use table::{Join, JoinType, TableRef};
pub use update::Update;

/// Start a SELECT.
pub fn select() -> Select {
    Select::new()
}

/// Start an INSERT into `table`.
pub fn insert_into(table: impl Into<TableRef>) -> Insert {
    Insert::new().into(table)
}

/// Start an UPDATE of `table`.
pub fn update(table: impl Into<TableRef>) -> Update {
    Update::new().in_(table)
}

/// Start a DELETE from `table`.
pub fn delete_from(table: impl Into<TableRef>) -> Delete {
    Delete::new().from(table)
}
