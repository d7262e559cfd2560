//! Column-keyed condition sets for the table reader and writer.

use super::render_condition;
use crate::error::{PdoError, PdoResult};
use crate::quote::{Quoter, mask_identifier};
use crate::value::Value;

/// Value side of one entry in a [`Conditions`] set.
///
/// Scalars are kept as text (booleans as `1`/`0`) because operators are
/// embedded in the text itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchValue {
    Null,
    Text(String),
    /// Each element is matched on its own and the results are OR-ed.
    List(Vec<Option<String>>),
}

impl From<Value> for MatchValue {
    fn from(v: Value) -> Self {
        v.to_text().map_or(MatchValue::Null, MatchValue::Text)
    }
}

macro_rules! impl_match_value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for MatchValue {
                fn from(v: $t) -> Self {
                    MatchValue::from(Value::from(v))
                }
            }

            impl From<Option<$t>> for MatchValue {
                fn from(v: Option<$t>) -> Self {
                    MatchValue::from(Value::from(v))
                }
            }

            impl From<Vec<$t>> for MatchValue {
                fn from(vs: Vec<$t>) -> Self {
                    MatchValue::List(vs.into_iter().map(|v| Value::from(v).to_text()).collect())
                }
            }
        )*
    };
}

impl_match_value_from!(bool, i32, i64, u32, f64, String, &str);

impl TryFrom<serde_json::Value> for MatchValue {
    type Error = PdoError;

    /// Arrays become lists; objects and nested arrays are rejected.
    fn try_from(v: serde_json::Value) -> PdoResult<Self> {
        match v {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| Value::try_from(item).map(|v| v.to_text()))
                .collect::<PdoResult<Vec<_>>>()
                .map(MatchValue::List),
            other => Value::try_from(other).map(MatchValue::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    column: String,
    value: MatchValue,
    raw: bool,
}

/// Ordered `column -> value` conditions, rendered with the matcher grammar.
///
/// ```ignore
/// let conds = Conditions::new()
///     .push("age", "><18 & 65")
///     .push("name", "!%%bot%")
///     .push("deleted_at", None::<String>);
/// // `age` BETWEEN 18 AND 65 AND `name` NOT LIKE '%bot%' AND `deleted_at` IS NULL
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    entries: Vec<Entry>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of `column: value` pairs.
    pub fn from_json(value: serde_json::Value) -> PdoResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(PdoError::invalid_argument("conditions must be a JSON object"));
        };
        let mut conds = Self::new();
        for (column, v) in map {
            conds = conds.push(column, MatchValue::try_from(v)?);
        }
        Ok(conds)
    }

    /// Add a condition on a column. A column pushed again replaces the
    /// earlier value in place.
    pub fn push(self, column: impl Into<String>, value: impl Into<MatchValue>) -> Self {
        self.insert(column.into(), value.into(), false)
    }

    /// Add a condition on an unmasked expression such as `COUNT(*)`. Raw
    /// columns are not checked against the table's columns.
    pub fn push_raw(self, expr: impl Into<String>, value: impl Into<MatchValue>) -> Self {
        self.insert(expr.into(), value.into(), true)
    }

    fn insert(mut self, column: String, value: MatchValue, raw: bool) -> Self {
        match self.entries.iter_mut().find(|e| e.column == column) {
            Some(entry) => {
                entry.value = value;
                entry.raw = raw;
            }
            None => self.entries.push(Entry { column, value, raw }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns that must exist on the table (raw expressions excluded).
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|e| !e.raw).map(|e| e.column.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&MatchValue> {
        self.entries.iter().find(|e| e.column == column).map(|e| &e.value)
    }

    /// Render all entries joined by ` AND `; `""` when empty.
    pub fn render(&self, quoter: &dyn Quoter) -> PdoResult<String> {
        let fragments = self
            .entries
            .iter()
            .map(|e| {
                let column = if e.raw {
                    e.column.clone()
                } else {
                    mask_identifier(&e.column)
                };
                render_entry(&column, &e.value, quoter)
            })
            .collect::<PdoResult<Vec<_>>>()?;
        Ok(fragments.join(" AND "))
    }
}

fn render_entry(column: &str, value: &MatchValue, quoter: &dyn Quoter) -> PdoResult<String> {
    match value {
        MatchValue::Null => render_condition(column, None, quoter),
        MatchValue::Text(text) => render_condition(column, Some(text), quoter),
        MatchValue::List(items) if items.is_empty() => Ok("1=0".to_string()),
        MatchValue::List(items) => {
            let parts = items
                .iter()
                .map(|item| render_condition(column, item.as_deref(), quoter))
                .collect::<PdoResult<Vec<_>>>()?;
            Ok(format!("({})", parts.join(" OR ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::MySqlQuoter;
    use serde_json::json;

    fn render(conds: &Conditions) -> String {
        conds.render(&MySqlQuoter).unwrap()
    }

    #[test]
    fn test_scalar_entries_are_and_ed() {
        let conds = Conditions::new()
            .push("age", "><1 & 5")
            .push("name", "!%test")
            .push("bio", None::<String>);
        assert_eq!(
            render(&conds),
            "`age` BETWEEN 1 AND 5 AND `name` NOT LIKE 'test' AND `bio` IS NULL"
        );
    }

    #[test]
    fn test_list_fans_out_into_or_group() {
        let conds = Conditions::new().push("id", vec![1, 2]).push("tag", vec!["a%", "> b"]);
        assert_eq!(
            render(&conds),
            "(`id` = 1 OR `id` = 2) AND (`tag` LIKE 'a%' OR `tag` > 'b')"
        );
        let empty = Conditions::new().push("id", Vec::<i64>::new());
        assert_eq!(render(&empty), "1=0");
    }

    #[test]
    fn test_raw_columns_are_not_masked() {
        let conds = Conditions::new().push_raw("COUNT(*)", ">1").push("a`b", 1);
        assert_eq!(render(&conds), "COUNT(*) > 1 AND `a``b` = 1");
        assert_eq!(conds.columns().collect::<Vec<_>>(), ["a`b"]);
    }

    #[test]
    fn test_push_replaces_in_place() {
        let conds = Conditions::new().push("a", 1).push("b", 2).push("a", 3);
        assert_eq!(render(&conds), "`a` = 3 AND `b` = 2");
    }

    #[test]
    fn test_bools_render_as_digits() {
        assert_eq!(render(&Conditions::new().push("active", true)), "`active` = 1");
    }

    #[test]
    fn test_from_json() {
        let conds = Conditions::from_json(json!({"age": ">= 18", "id": [1, 2], "x": null})).unwrap();
        assert_eq!(conds.len(), 3);
        assert_eq!(conds.get("x"), Some(&MatchValue::Null));
        assert!(Conditions::from_json(json!({"id": [[1]]})).is_err());
        assert!(Conditions::from_json(json!({"id": {"a": 1}})).is_err());
        assert!(Conditions::from_json(json!([1])).is_err());
    }

    #[test]
    fn test_whitespace_errors_propagate() {
        let err = Conditions::new().push("age", "><1&5").render(&MySqlQuoter).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
