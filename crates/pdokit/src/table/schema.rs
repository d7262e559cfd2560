use crate::error::{PdoError, PdoResult};
use std::sync::Arc;

/// Declared shape of a table: columns, primary key and named indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<String>,
    primary_key: Vec<String>,
    indexes: Vec<(String, Vec<String>)>,
}

impl TableSchema {
    /// Start declaring a table.
    ///
    /// ```ignore
    /// let users = TableSchema::builder("users")
    ///     .columns(["id", "email", "name"])
    ///     .primary_key(["id"])
    ///     .index("by_email", ["email"])
    ///     .build()?;
    /// ```
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            schema: TableSchema {
                name: name.into(),
                columns: Vec::new(),
                primary_key: Vec::new(),
                indexes: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// `Domain` error unless `column` is declared.
    pub fn check_column(&self, column: &str) -> PdoResult<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(PdoError::domain(format!(
                "unknown column '{column}' for table '{}'",
                self.name
            )))
        }
    }

    /// Columns of a named index.
    pub fn index(&self, name: &str) -> PdoResult<&[String]> {
        self.indexes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cols)| cols.as_slice())
            .ok_or_else(|| {
                PdoError::domain(format!("unknown index '{name}' for table '{}'", self.name))
            })
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.iter().map(|(n, _)| n.as_str())
    }
}

/// Builder for [`TableSchema`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct TableSchemaBuilder {
    schema: TableSchema,
}

impl TableSchemaBuilder {
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.schema.columns.push(name.into());
        self
    }

    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn index<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema
            .indexes
            .push((name.into(), columns.into_iter().map(Into::into).collect()));
        self
    }

    pub fn build(self) -> PdoResult<Arc<TableSchema>> {
        let schema = self.schema;
        if schema.name.trim().is_empty() {
            return Err(PdoError::invalid_argument("table name is empty"));
        }
        if schema.columns.is_empty() {
            return Err(PdoError::invalid_argument(format!(
                "table '{}' declares no columns",
                schema.name
            )));
        }
        for (i, column) in schema.columns.iter().enumerate() {
            if column.trim().is_empty() {
                return Err(PdoError::invalid_argument("column name is empty"));
            }
            if schema.columns[..i].contains(column) {
                return Err(PdoError::invalid_argument(format!(
                    "column '{column}' declared twice"
                )));
            }
        }
        for column in &schema.primary_key {
            schema.check_column(column)?;
        }
        for (i, (name, columns)) in schema.indexes.iter().enumerate() {
            if columns.is_empty() {
                return Err(PdoError::invalid_argument(format!("index '{name}' has no columns")));
            }
            if schema.indexes[..i].iter().any(|(n, _)| n == name) {
                return Err(PdoError::invalid_argument(format!("index '{name}' declared twice")));
            }
            for column in columns {
                schema.check_column(column)?;
            }
        }
        Ok(Arc::new(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let schema = TableSchema::builder("users")
            .columns(["id", "email"])
            .column("name")
            .primary_key(["id"])
            .index("by_email", ["email"])
            .build()
            .unwrap();
        assert_eq!(schema.columns(), ["id", "email", "name"]);
        assert_eq!(schema.index("by_email").unwrap(), ["email"]);
        assert!(schema.index("nope").unwrap_err().is_domain());
        assert!(schema.check_column("age").unwrap_err().is_domain());
    }

    #[test]
    fn test_keys_must_be_declared() {
        let err = TableSchema::builder("t")
            .columns(["a"])
            .primary_key(["id"])
            .build()
            .unwrap_err();
        assert!(err.is_domain());

        let err = TableSchema::builder("t")
            .columns(["a"])
            .index("ix", ["b"])
            .build()
            .unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_rejects_duplicates_and_empties() {
        assert!(TableSchema::builder("t").build().is_err());
        assert!(TableSchema::builder("").columns(["a"]).build().is_err());
        assert!(TableSchema::builder("t").columns(["a", "a"]).build().is_err());
    }
}
