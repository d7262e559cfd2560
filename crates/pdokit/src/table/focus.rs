use super::schema::TableSchema;
use crate::error::{PdoError, PdoResult};
use crate::osql::{Condition, ConditionGroup};
use crate::quote::mask_identifier;
use crate::value::Value;

/// Addresses rows by primary key or by a named index.
#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Primary(Vec<Value>),
    Index { name: String, values: Vec<Value> },
}

impl Focus {
    /// Single-column primary key.
    pub fn primary(value: impl Into<Value>) -> Self {
        Focus::Primary(vec![value.into()])
    }

    /// Composite primary key, in key column order.
    pub fn primary_composite(values: Vec<Value>) -> Self {
        Focus::Primary(values)
    }

    pub fn index(name: impl Into<String>, values: Vec<Value>) -> Self {
        Focus::Index {
            name: name.into(),
            values,
        }
    }

    pub fn values(&self) -> &[Value] {
        match self {
            Focus::Primary(values) | Focus::Index { values, .. } => values,
        }
    }

    /// Key columns addressed by this focus, with the arity checked.
    pub fn columns<'s>(&self, schema: &'s TableSchema) -> PdoResult<&'s [String]> {
        let columns = match self {
            Focus::Primary(_) => {
                let pk = schema.primary_key();
                if pk.is_empty() {
                    return Err(PdoError::domain(format!(
                        "table '{}' has no primary key",
                        schema.name()
                    )));
                }
                pk
            }
            Focus::Index { name, .. } => schema.index(name)?,
        };
        let values = self.values();
        if values.len() != columns.len() {
            return Err(PdoError::invalid_argument(format!(
                "focus expects {} value(s), got {}",
                columns.len(),
                values.len()
            )));
        }
        Ok(columns)
    }

    /// Equality conditions on every key column; NULL keys use `IS NULL`.
    pub fn to_group(&self, schema: &TableSchema) -> PdoResult<ConditionGroup> {
        let columns = self.columns(schema)?;
        let mut group = ConditionGroup::and();
        for (column, value) in columns.iter().zip(self.values()) {
            let field = mask_identifier(column);
            let condition = if value.is_null() {
                Condition::is_null(field)?
            } else {
                Condition::eq(field, value.clone())?
            };
            group.push(condition);
        }
        Ok(group)
    }

    /// Cache key for primary-key focuses; other focuses are not cached.
    ///
    /// Values are keyed by their bound text, so `1` and `"1"` address the
    /// same cached row.
    pub(crate) fn cache_key(&self) -> Option<String> {
        match self {
            Focus::Primary(values) => {
                let texts: Vec<Option<String>> = values.iter().map(Value::to_text).collect();
                serde_json::to_string(&texts).ok()
            }
            Focus::Index { .. } => None,
        }
    }
}
