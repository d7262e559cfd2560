//! Operator mini-language embedded in condition values.
//!
//! A value such as `>5`, `><1 & 10` or `!%bot%` carries its own operator.
//! [`parse`] turns a value into a typed [`Matcher`] and [`render_matcher`]
//! writes it out as a raw WHERE fragment, quoting non-numeric operands with
//! the connection's [`Quoter`](crate::quote::Quoter).
//!
//! | value          | fragment                        |
//! |----------------|---------------------------------|
//! | `><1 & 5`      | `` `c` BETWEEN 1 AND 5 ``       |
//! | `!><1 & 5`     | `` `c` NOT BETWEEN 1 AND 5 ``   |
//! | `&4`           | `` `c` & 4 ``                   |
//! | `>= 18`        | `` `c` >= 18 ``                 |
//! | `% foo`        | `` `c` LIKE 'foo' ``            |
//! | `!%foo`        | `` `c` NOT LIKE 'foo' ``        |
//! | `foo%`         | `` `c` LIKE 'foo%' ``           |
//! | `is not null`  | `` `c` IS NOT NULL ``           |
//! | NULL           | `` `c` IS NULL ``               |
//! | `bar`          | `` `c` = 'bar' ``               |

mod ast;
mod conditions;
mod parse;
mod render;

pub use ast::{BitOp, CmpOp, Matcher};
pub use conditions::{Conditions, MatchValue};
pub use parse::parse;
pub use render::{is_numeric, render_matcher, secure_value};

use crate::error::PdoResult;
use crate::quote::Quoter;

/// Parse and render one `(column, value)` pair. `column` is used verbatim.
pub fn render_condition(column: &str, value: Option<&str>, quoter: &dyn Quoter) -> PdoResult<String> {
    Ok(render_matcher(column, &parse(value)?, quoter))
}
