//! MySQL executor on top of a `sqlx` pool.

use super::placeholders::to_positional;
use super::{ExecOutcome, Executor};
use crate::config::ExecutorConfig;
use crate::error::{PdoError, PdoResult};
use crate::osql::{Param, Statement};
use crate::row::Row;
use crate::value::{ParamType, Value};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row as SqlxRow, TypeInfo, ValueRef};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Create a MySQL connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use pdokit::executor::{create_pool, MySqlExecutor};
///
/// let pool = create_pool("mysql://root@localhost/shop", 10).await?;
/// let db = MySqlExecutor::new(pool);
/// ```
pub async fn create_pool(url: &str, max_connections: u32) -> PdoResult<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| PdoError::Connection(e.to_string()))
}

/// [`Executor`] backed by a `sqlx` MySQL pool.
#[derive(Debug, Clone)]
pub struct MySqlExecutor {
    pool: MySqlPool,
    config: ExecutorConfig,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_config(pool, ExecutorConfig::default())
    }

    pub fn with_config(pool: MySqlPool, config: ExecutorConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Apply timeout, SQL logging and slow-query reporting around `fut`.
    async fn instrument<T, F>(&self, stmt: &Statement, fut: F) -> PdoResult<T>
    where
        F: Future<Output = PdoResult<T>>,
    {
        #[cfg(feature = "tracing")]
        if self.config.log_sql {
            tracing::debug!(
                target: "pdokit.sql",
                kind = %stmt.kind(),
                param_count = stmt.parameters.len(),
                sql = %self.display_sql(&stmt.query),
                "executing statement"
            );
        }

        let start = Instant::now();
        let result = match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .map_err(|_| PdoError::Timeout(timeout))
                .and_then(|r| r),
            None => fut.await,
        };
        let elapsed = start.elapsed();

        #[cfg(feature = "tracing")]
        if let Some(threshold) = self.config.slow_query_threshold
            && elapsed > threshold
        {
            tracing::warn!(
                target: "pdokit.sql",
                kind = %stmt.kind(),
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %self.display_sql(&stmt.query),
                "slow query"
            );
        }
        #[cfg(not(feature = "tracing"))]
        let _ = (stmt, elapsed);

        result
    }

    #[cfg(feature = "tracing")]
    fn display_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => {
                format!("{}...", crate::config::truncate_sql_bytes(sql, max)).into()
            }
            _ => sql.into(),
        }
    }
}

impl Executor for MySqlExecutor {
    async fn fetch_all(&self, stmt: &Statement) -> PdoResult<Vec<Row>> {
        let (sql, binds) = to_positional(stmt)?;
        self.instrument(stmt, async {
            let rows = bind_all(sqlx::query(&sql), &binds).fetch_all(&self.pool).await?;
            decode_rows(&rows)
        })
        .await
    }

    async fn fetch_counted(&self, stmt: &Statement) -> PdoResult<(Vec<Row>, u64)> {
        let (sql, binds) = to_positional(stmt)?;
        self.instrument(stmt, async {
            // FOUND_ROWS() is per connection, so both statements share one.
            let mut conn = self.pool.acquire().await?;
            let rows = bind_all(sqlx::query(&sql), &binds).fetch_all(&mut *conn).await?;
            let found: i64 = sqlx::query_scalar("SELECT CAST(FOUND_ROWS() AS SIGNED)")
                .fetch_one(&mut *conn)
                .await?;
            Ok::<_, PdoError>((decode_rows(&rows)?, u64::try_from(found).unwrap_or(0)))
        })
        .await
    }

    async fn execute(&self, stmt: &Statement) -> PdoResult<ExecOutcome> {
        let (sql, binds) = to_positional(stmt)?;
        self.instrument(stmt, async {
            let done = bind_all(sqlx::query(&sql), &binds).execute(&self.pool).await?;
            let id = done.last_insert_id();
            Ok::<_, PdoError>(ExecOutcome {
                affected: done.rows_affected(),
                last_insert_id: (id != 0).then_some(id),
            })
        })
        .await
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    binds: &[&Param],
) -> Query<'q, MySql, MySqlArguments> {
    for param in binds {
        query = match param.ty {
            ParamType::Null => query.bind(None::<String>),
            ParamType::Bool => query.bind(match &param.value {
                Value::Bool(b) => Some(*b),
                other => other.as_i64().map(|n| n != 0),
            }),
            ParamType::Int => query.bind(param.value.as_i64()),
            ParamType::Str => query.bind(param.value.to_text()),
        };
    }
    query
}

fn decode_rows(rows: &[MySqlRow]) -> PdoResult<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    rows.iter()
        .map(|row| {
            let values = (0..row.len())
                .map(|i| decode_value(row, i))
                .collect::<PdoResult<Vec<_>>>()?;
            Row::new(columns.clone(), values)
        })
        .collect()
}

fn decode_value(row: &MySqlRow, i: usize) -> PdoResult<Value> {
    let column = &row.columns()[i];
    if row.try_get_raw(i)?.is_null() {
        return Ok(Value::Null);
    }
    let type_name = column.type_info().name();
    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(i)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::Int(row.try_get_unchecked::<i64, _>(i)?)
        }
        t if t.ends_with("UNSIGNED") => {
            let n = row.try_get_unchecked::<u64, _>(i)?;
            i64::try_from(n).map_or_else(|_| Value::Str(n.to_string()), Value::Int)
        }
        "FLOAT" => Value::Float(f64::from(row.try_get::<f32, _>(i)?)),
        "DOUBLE" => Value::Float(row.try_get::<f64, _>(i)?),
        "DATE" => Value::Str(row.try_get::<chrono::NaiveDate, _>(i)?.to_string()),
        "DATETIME" | "TIMESTAMP" => Value::Str(
            row.try_get::<chrono::NaiveDateTime, _>(i)?
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        ),
        "TIME" => Value::Str(row.try_get::<chrono::NaiveTime, _>(i)?.to_string()),
        "NULL" => Value::Null,
        t if t.contains("BLOB") || t.contains("BINARY") => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(i)?;
            Value::Str(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => row
            .try_get_unchecked::<Option<String>, _>(i)?
            .map_or(Value::Null, Value::Str),
    };
    Ok(value)
}
