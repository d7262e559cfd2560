use super::schema::TableSchema;
use crate::error::{PdoError, PdoResult};
use crate::row::Row;
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// A row of a specific table: ordered `column -> value` pairs whose columns
/// are checked against the table schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<TableSchema>,
    values: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record for `schema`.
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            values: Vec::new(),
        }
    }

    /// Build a record from a result row. Every row column must be declared.
    pub fn from_row(schema: Arc<TableSchema>, row: &Row) -> PdoResult<Self> {
        let mut record = Self::new(schema);
        for (column, value) in row.iter() {
            record.set(column, value.clone())?;
        }
        Ok(record)
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    /// Set a column value; unknown columns are a `Domain` error.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> PdoResult<()> {
        self.schema.check_column(column)?;
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| c == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column.to_string(), value)),
        }
        Ok(())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> PdoResult<Self> {
        self.set(column, value)?;
        Ok(self)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get), but unknown columns are a `Domain` error
    /// and unset columns read as NULL.
    pub fn try_get(&self, column: &str) -> PdoResult<&Value> {
        self.schema.check_column(column)?;
        static NULL: Value = Value::Null;
        Ok(self.get(column).unwrap_or(&NULL))
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let pos = self.values.iter().position(|(c, _)| c == column)?;
        Some(self.values.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn into_values(self) -> Vec<(String, Value)> {
        self.values
    }

    /// Primary key values, if every key column is set.
    pub fn primary_key_values(&self) -> Option<Vec<Value>> {
        let pk = self.schema.primary_key();
        if pk.is_empty() {
            return None;
        }
        pk.iter().map(|c| self.get(c).cloned()).collect()
    }

    pub(crate) fn check_table(&self, schema: &TableSchema) -> PdoResult<()> {
        if self.schema.name() != schema.name() {
            return Err(PdoError::domain(format!(
                "record belongs to table '{}', not '{}'",
                self.schema.name(),
                schema.name()
            )));
        }
        Ok(())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Arc<TableSchema> {
        TableSchema::builder("users")
            .columns(["id", "name", "email"])
            .primary_key(["id"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_set_rejects_unknown_columns() {
        let mut record = Record::new(schema());
        record.set("name", "ann").unwrap();
        let err = record.set("age", 3).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_order_and_override() {
        let record = Record::new(schema())
            .with("name", "ann")
            .unwrap()
            .with("id", 1)
            .unwrap()
            .with("name", "bob")
            .unwrap();
        let cols: Vec<_> = record.iter().map(|(c, _)| c).collect();
        assert_eq!(cols, ["name", "id"]);
        assert_eq!(record.get("name"), Some(&Value::from("bob")));
        assert_eq!(record.primary_key_values(), Some(vec![Value::Int(1)]));
        assert_eq!(record.try_get("email").unwrap(), &Value::Null);
    }

    #[test]
    fn test_from_row() {
        let row = Row::from_pairs([("id", Value::Int(1)), ("name", Value::from("ann"))]);
        let record = Record::from_row(schema(), &row).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"id":1,"name":"ann"}"#);

        let bad = Row::from_pairs([("nope", Value::Int(1))]);
        assert!(Record::from_row(schema(), &bad).unwrap_err().is_domain());
    }
}
