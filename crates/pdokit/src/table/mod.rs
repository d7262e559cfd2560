//! Focus-based reads and writes on a declared table.
//!
//! A [`Table`] binds a [`TableSchema`] to an [`Executor`] and hands out a
//! [`Reader`] and a [`Writer`]. Rows are addressed either by a [`Focus`]
//! (primary key or named index, rendered through the OSQL condition engine)
//! or by a [`Conditions`] set rendered with the matcher grammar.
//!
//! ```ignore
//! let users = TableSchema::builder("users")
//!     .columns(["id", "email", "name"])
//!     .primary_key(["id"])
//!     .index("by_email", ["email"])
//!     .build()?;
//! let table = Table::new(users, db).with_cache(Arc::new(MemoryCache::new(1024)));
//!
//! let ann = table.reader().fetch(&Focus::primary(1)).await?;
//! let adults = table
//!     .reader()
//!     .find(&Conditions::new().push("age", ">= 18"), &FindOptions::new().limit(20))
//!     .await?;
//! ```

mod cache;
mod focus;
mod record;
mod schema;

pub use cache::{MemoryCache, RecordCache};
pub use focus::Focus;
pub use record::Record;
pub use schema::{TableSchema, TableSchemaBuilder};

use crate::config::TableConfig;
use crate::error::{PdoError, PdoResult};
use crate::executor::{Executor, InsertResult, WriteResult};
use crate::matcher::Conditions;
use crate::osql::{self, Direction, Query, Select, Statement};
use crate::quote::mask_identifier;
use crate::row::Row;
use std::sync::Arc;

/// A declared table bound to an executor.
pub struct Table<E> {
    schema: Arc<TableSchema>,
    executor: E,
    cache: Option<Arc<dyn RecordCache>>,
    config: TableConfig,
}

impl<E: Executor> Table<E> {
    pub fn new(schema: Arc<TableSchema>, executor: E) -> Self {
        Self {
            schema,
            executor,
            cache: None,
            config: TableConfig::default(),
        }
    }

    /// Attach a record cache for primary-key reads. One cache may be shared
    /// by several tables.
    pub fn with_cache(mut self, cache: Arc<dyn RecordCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The statement [`Reader::fetch`] runs for `focus`, without running it.
    pub fn render_fetch(&self, focus: &Focus) -> PdoResult<Statement> {
        self.select_columns()?
            .where_(focus.to_group(&self.schema)?)
            .limit(1)?
            .render()
    }

    pub fn reader(&self) -> Reader<'_, E> {
        Reader { table: self }
    }

    pub fn writer(&self) -> Writer<'_, E> {
        Writer { table: self }
    }

    fn cache(&self) -> Option<&dyn RecordCache> {
        if self.config.cache_enabled {
            self.cache.as_deref()
        } else {
            None
        }
    }

    fn target(&self) -> String {
        mask_identifier(self.schema.name())
    }

    fn check_columns<'c>(&self, columns: impl IntoIterator<Item = &'c str>) -> PdoResult<()> {
        columns
            .into_iter()
            .try_for_each(|c| self.schema.check_column(c))
    }

    fn records(&self, rows: &[Row]) -> PdoResult<Vec<Record>> {
        rows.iter()
            .map(|row| Record::from_row(Arc::clone(&self.schema), row))
            .collect()
    }

    /// SELECT of every declared column.
    fn select_columns(&self) -> PdoResult<Select> {
        let columns: Vec<String> = self
            .schema
            .columns()
            .iter()
            .map(|c| mask_identifier(c))
            .collect();
        Ok(osql::select().get(columns)?.from(self.target()))
    }

    fn forget(&self, focus: &Focus) {
        let Some(cache) = self.cache() else {
            return;
        };
        match focus.cache_key() {
            Some(key) => cache.invalidate(self.schema.name(), &key),
            // Index writes may touch any primary key.
            None => cache.clear_table(self.schema.name()),
        }
    }

    fn forget_all(&self) {
        if let Some(cache) = self.cache() {
            cache.clear_table(self.schema.name());
        }
    }
}

/// Ordering and paging for [`Reader::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub order: Vec<(String, Direction)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Also report the total number of matches ignoring LIMIT.
    pub count_rows: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn count_rows(mut self, enabled: bool) -> Self {
        self.count_rows = enabled;
        self
    }
}

/// Records matched by [`Reader::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindResult {
    pub records: Vec<Record>,
    /// Total matches ignoring LIMIT, when requested.
    pub found_rows: Option<u64>,
}

/// Read side of a [`Table`].
pub struct Reader<'t, E> {
    table: &'t Table<E>,
}

impl<E: Executor> Reader<'_, E> {
    /// Fetch the first record addressed by `focus`.
    ///
    /// Primary-key reads go through the cache when one is attached and
    /// enabled.
    pub async fn fetch(&self, focus: &Focus) -> PdoResult<Option<Record>> {
        let table = self.table;
        let group = focus.to_group(&table.schema)?;
        let cached = table.cache().zip(focus.cache_key());

        if let Some((cache, key)) = &cached {
            if let Some(record) = cache.get(table.schema.name(), key) {
                #[cfg(feature = "tracing")]
                tracing::trace!(target: "pdokit.cache", table = table.schema.name(), key = %key, "cache hit");
                return Ok(Some(record));
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "pdokit.cache", table = table.schema.name(), key = %key, "cache miss");
        }

        let result = table
            .select_columns()?
            .where_(group)
            .limit(1)?
            .fetch(&table.executor)
            .await?;
        let record = match result.first() {
            Some(row) => Record::from_row(Arc::clone(&table.schema), row)?,
            None => return Ok(None),
        };

        if let Some((cache, key)) = cached {
            cache.put(table.schema.name(), &key, record.clone());
        }
        Ok(Some(record))
    }

    /// Fetch every record addressed by `focus`. Never cached.
    pub async fn fetch_all(&self, focus: &Focus) -> PdoResult<Vec<Record>> {
        let table = self.table;
        let group = focus.to_group(&table.schema)?;
        let result = table.select_columns()?.where_(group).fetch(&table.executor).await?;
        table.records(&result.rows)
    }

    /// Find records matching `conditions`.
    pub async fn find(&self, conditions: &Conditions, options: &FindOptions) -> PdoResult<FindResult> {
        let table = self.table;
        table.check_columns(conditions.columns())?;
        table.check_columns(options.order.iter().map(|(c, _)| c.as_str()))?;

        // MySQL has no OFFSET without LIMIT; page to the end instead.
        let limit = options.limit.or(options.offset.map(|_| i64::MAX));
        let mut select = table
            .select_columns()?
            .count_rows(options.count_rows)
            .limit(limit)?
            .offset(options.offset)?;
        let filter = conditions.render(table.executor.quoter())?;
        if !filter.is_empty() {
            select = select.where_raw(filter);
        }
        for (column, direction) in &options.order {
            select = select.order(mask_identifier(column), *direction);
        }

        let result = select.fetch(&table.executor).await?;
        Ok(FindResult {
            records: table.records(&result.rows)?,
            found_rows: result.found_rows,
        })
    }

    /// Number of rows matching `conditions`.
    pub async fn count(&self, conditions: &Conditions) -> PdoResult<u64> {
        let table = self.table;
        table.check_columns(conditions.columns())?;

        let mut select = osql::select().get("COUNT(*) AS n")?.from(table.target());
        let filter = conditions.render(table.executor.quoter())?;
        if !filter.is_empty() {
            select = select.where_raw(filter);
        }
        let result = select.fetch(&table.executor).await?;
        match result.first() {
            Some(row) => row.try_get::<u64>("n"),
            None => Ok(0),
        }
    }
}

/// Write side of a [`Table`].
pub struct Writer<'t, E> {
    table: &'t Table<E>,
}

impl<E: Executor> Writer<'_, E> {
    pub async fn insert(&self, record: &Record) -> PdoResult<InsertResult> {
        let table = self.table;
        record.check_table(&table.schema)?;
        if record.is_empty() {
            return Err(PdoError::invalid_argument("cannot insert an empty record"));
        }

        let mut insert = osql::insert_into(table.target());
        for (column, value) in record.iter() {
            insert = insert.set(mask_identifier(column), value.clone());
        }
        let result = insert.execute(&table.executor).await?;
        if let Some(pk) = record.primary_key_values() {
            table.forget(&Focus::Primary(pk));
        }
        Ok(result)
    }

    /// Update the rows addressed by `focus` with the values set on `record`.
    pub async fn update(&self, focus: &Focus, record: &Record) -> PdoResult<WriteResult> {
        let table = self.table;
        record.check_table(&table.schema)?;
        let group = focus.to_group(&table.schema)?;

        let mut update = osql::update(table.target()).where_(group);
        for (column, value) in record.iter() {
            update = update.set(mask_identifier(column), value.clone());
        }
        let result = update.execute(&table.executor).await?;
        table.forget(focus);
        if let Some(pk) = record.primary_key_values() {
            table.forget(&Focus::Primary(pk));
        }
        Ok(result)
    }

    pub async fn delete(&self, focus: &Focus) -> PdoResult<WriteResult> {
        let table = self.table;
        let group = focus.to_group(&table.schema)?;
        let result = osql::delete_from(table.target())
            .where_(group)
            .execute(&table.executor)
            .await?;
        table.forget(focus);
        Ok(result)
    }

    /// Update every row matching `conditions`. Empty conditions are refused.
    pub async fn update_where(&self, conditions: &Conditions, record: &Record) -> PdoResult<WriteResult> {
        let table = self.table;
        record.check_table(&table.schema)?;
        let filter = self.filter(conditions)?;

        let mut update = osql::update(table.target()).where_raw(filter);
        for (column, value) in record.iter() {
            update = update.set(mask_identifier(column), value.clone());
        }
        let result = update.execute(&table.executor).await?;
        table.forget_all();
        Ok(result)
    }

    /// Delete every row matching `conditions`. Empty conditions are refused.
    pub async fn delete_where(&self, conditions: &Conditions) -> PdoResult<WriteResult> {
        let table = self.table;
        let filter = self.filter(conditions)?;
        let result = osql::delete_from(table.target())
            .where_raw(filter)
            .execute(&table.executor)
            .await?;
        table.forget_all();
        Ok(result)
    }

    fn filter(&self, conditions: &Conditions) -> PdoResult<String> {
        let table = self.table;
        table.check_columns(conditions.columns())?;
        let filter = conditions.render(table.executor.quoter())?;
        if filter.is_empty() {
            return Err(PdoError::state(format!(
                "refusing to write every row of '{}' without conditions",
                table.schema.name()
            )));
        }
        Ok(filter)
    }
}
