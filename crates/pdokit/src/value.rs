//! Primitive values that can be bound to a statement or stored in a record.

use crate::error::{PdoError, PdoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive SQL value.
///
/// Only scalars are representable: there is no object or nested-array form,
/// so anything that reaches a statement is bindable by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// Declared parameter type used when binding a value.
///
/// Floats have no dedicated driver type and are bound as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamType {
    Bool,
    Int,
    #[serde(rename = "STRING")]
    Str,
    Null,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Bool => "BOOL",
            ParamType::Int => "INT",
            ParamType::Str => "STRING",
            ParamType::Null => "NULL",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Infer the bind type of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            Value::Null => ParamType::Null,
            Value::Bool(_) => ParamType::Bool,
            Value::Int(_) => ParamType::Int,
            Value::Float(_) | Value::Str(_) => ParamType::Str,
        }
    }

    /// Short name of the value's kind, used in error messages and list checks.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual form of the value, `None` for NULL.
    ///
    /// Booleans become `1`/`0` the way MySQL stores them.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Str(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident as $conv:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$conv>::from(v))
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    f32 => Float as f64,
    f64 => Float as f64,
    String => Str as String,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = PdoError;

    /// Convert a dynamic JSON value, rejecting arrays and objects.
    fn try_from(v: serde_json::Value) -> PdoResult<Self> {
        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Int(i)),
                None => n.as_f64().map(Value::Float).ok_or_else(|| {
                    PdoError::invalid_argument(format!("number {n} is not representable"))
                }),
            },
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Array(_) => Err(PdoError::invalid_argument(
                "expected a primitive value, got an array",
            )),
            serde_json::Value::Object(_) => Err(PdoError::invalid_argument(
                "expected a primitive value, got an object",
            )),
        }
    }
}

/// Value side of a condition: one scalar or a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl ConditionValue {
    /// Build a list value, checking that every element has the same kind.
    pub fn list(values: Vec<Value>) -> PdoResult<Self> {
        let value = ConditionValue::List(values);
        value.validate()?;
        Ok(value)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ConditionValue::List(_))
    }

    pub(crate) fn validate(&self) -> PdoResult<()> {
        let ConditionValue::List(values) = self else {
            return Ok(());
        };
        let Some(first) = values.first() else {
            return Err(PdoError::invalid_argument("condition value list is empty"));
        };
        if let Some(other) = values.iter().find(|v| v.kind() != first.kind()) {
            return Err(PdoError::invalid_argument(format!(
                "condition value list mixes {} and {} elements",
                first.kind(),
                other.kind()
            )));
        }
        Ok(())
    }
}

impl From<Value> for ConditionValue {
    fn from(v: Value) -> Self {
        ConditionValue::Scalar(v)
    }
}

macro_rules! impl_condition_value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ConditionValue {
                fn from(v: $t) -> Self {
                    ConditionValue::Scalar(Value::from(v))
                }
            }

            impl From<Vec<$t>> for ConditionValue {
                fn from(vs: Vec<$t>) -> Self {
                    ConditionValue::List(vs.into_iter().map(Value::from).collect())
                }
            }

            impl From<Option<$t>> for ConditionValue {
                fn from(v: Option<$t>) -> Self {
                    ConditionValue::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_condition_value_from!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String, &str);

impl TryFrom<serde_json::Value> for ConditionValue {
    type Error = PdoError;

    /// Convert a dynamic JSON value. Arrays become lists; objects and nested
    /// arrays are rejected.
    fn try_from(v: serde_json::Value) -> PdoResult<Self> {
        match v {
            serde_json::Value::Array(items) => {
                let values = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<PdoResult<Vec<_>>>()?;
                ConditionValue::list(values)
            }
            other => Value::try_from(other).map(ConditionValue::Scalar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_type_inference() {
        assert_eq!(Value::from(true).param_type(), ParamType::Bool);
        assert_eq!(Value::from(7i32).param_type(), ParamType::Int);
        assert_eq!(Value::from(1.5f64).param_type(), ParamType::Str);
        assert_eq!(Value::from("x").param_type(), ParamType::Str);
        assert_eq!(Value::from(None::<i64>).param_type(), ParamType::Null);
    }

    #[test]
    fn test_json_objects_are_rejected() {
        let err = Value::try_from(json!({"a": 1})).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = ConditionValue::try_from(json!([1, [2]])).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_json_list_must_be_homogeneous() {
        assert!(ConditionValue::try_from(json!([1, 2, 3])).is_ok());
        let err = ConditionValue::try_from(json!([1, "two"])).unwrap_err();
        assert!(err.to_string().contains("mixes int and string"));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(ConditionValue::list(vec![]).is_err());
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::Bool(true).to_text().as_deref(), Some("1"));
        assert_eq!(Value::Null.to_text(), None);
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_serde_shape() {
        assert_eq!(serde_json::to_string(&Value::Int(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ParamType::Str).unwrap(), "\"STRING\"");
        let v: Value = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(v, Value::Str("abc".into()));
    }
}
