//! Single `field OP value` comparisons.

use super::param::{Param, ParamMap, sanitize_key};
use crate::error::{PdoError, PdoResult};
use crate::value::{ConditionValue, Value};
use std::fmt;

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Is,
    IsNot,
    Like,
    NotLike,
    In,
    NotIn,
    /// One of [`Operator::EXTRA`], upper-cased.
    Custom(String),
}

impl Operator {
    /// Further MySQL binary operators accepted as [`Operator::Custom`].
    pub const EXTRA: [&'static str; 11] = [
        "REGEXP",
        "NOT REGEXP",
        "RLIKE",
        "NOT RLIKE",
        "SOUNDS LIKE",
        "<=>",
        "&",
        "|",
        "^",
        "<<",
        ">>",
    ];

    /// Parse an operator string, case-insensitively.
    ///
    /// Anything outside the named variants and [`Operator::EXTRA`] is
    /// rejected.
    pub fn parse(op: &str) -> PdoResult<Self> {
        let normalized = op.split_whitespace().collect::<Vec<_>>().join(" ");
        let upper = normalized.to_ascii_uppercase();
        let parsed = match upper.as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::Ne,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            "IS" => Operator::Is,
            "IS NOT" => Operator::IsNot,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "" => return Err(PdoError::invalid_argument("condition operator is empty")),
            extra if Self::EXTRA.contains(&extra) => Operator::Custom(upper),
            _ => {
                return Err(PdoError::invalid_argument(format!(
                    "invalid condition operator: {op}"
                )));
            }
        };
        Ok(parsed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Custom(s) => s,
        }
    }

    fn is_null_test(&self) -> bool {
        matches!(self, Operator::Is | Operator::IsNot)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison `field OP value`.
///
/// Scalar values bind one placeholder, lists bind one placeholder per element.
/// `IS` / `IS NOT` only take NULL or a boolean, which is written literally.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    operator: Operator,
    value: ConditionValue,
}

impl Condition {
    /// Create a condition from a field, a value and an operator string.
    pub fn new(
        field: impl Into<String>,
        value: impl Into<ConditionValue>,
        operator: &str,
    ) -> PdoResult<Self> {
        let condition = Self {
            field: field.into(),
            operator: Operator::parse(operator)?,
            value: value.into(),
        };
        condition.validate()?;
        Ok(condition)
    }

    /// Create a condition from a dynamic JSON value.
    pub fn from_json(field: impl Into<String>, value: serde_json::Value, operator: &str) -> PdoResult<Self> {
        Self::new(field, ConditionValue::try_from(value)?, operator)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, "=")
    }

    pub fn ne(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, "!=")
    }

    pub fn gt(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, ">")
    }

    pub fn gte(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, ">=")
    }

    pub fn lt(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, "<")
    }

    pub fn lte(field: impl Into<String>, value: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, value, "<=")
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, pattern, "LIKE")
    }

    pub fn in_list(field: impl Into<String>, values: impl Into<ConditionValue>) -> PdoResult<Self> {
        Self::new(field, values, "IN")
    }

    /// `field IS NULL`
    pub fn is_null(field: impl Into<String>) -> PdoResult<Self> {
        Self::new(field, Value::Null, "IS")
    }

    /// `field IS NOT NULL`
    pub fn is_not_null(field: impl Into<String>) -> PdoResult<Self> {
        Self::new(field, Value::Null, "IS NOT")
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    pub fn set_field(&mut self, field: impl Into<String>) -> PdoResult<()> {
        let previous = std::mem::replace(&mut self.field, field.into());
        self.validate().inspect_err(|_| self.field = previous)
    }

    pub fn set_operator(&mut self, operator: &str) -> PdoResult<()> {
        let previous = std::mem::replace(&mut self.operator, Operator::parse(operator)?);
        self.validate().inspect_err(|_| self.operator = previous)
    }

    pub fn set_value(&mut self, value: impl Into<ConditionValue>) -> PdoResult<()> {
        let previous = std::mem::replace(&mut self.value, value.into());
        self.validate().inspect_err(|_| self.value = previous)
    }

    fn validate(&self) -> PdoResult<()> {
        if self.field.trim().is_empty() {
            return Err(PdoError::invalid_argument("condition field is empty"));
        }
        self.value.validate()?;
        if self.operator.is_null_test() {
            match &self.value {
                ConditionValue::Scalar(Value::Null | Value::Bool(_)) => {}
                other => {
                    return Err(PdoError::invalid_argument(format!(
                        "{} only accepts NULL or a boolean, got {}",
                        self.operator,
                        match other {
                            ConditionValue::Scalar(v) => v.kind(),
                            ConditionValue::List(_) => "list",
                        }
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render the condition, appending its parameters to `params`.
    pub fn render(&self, params: &mut ParamMap) -> String {
        let op = &self.operator;
        match &self.value {
            ConditionValue::Scalar(value) if op.is_null_test() => {
                let literal = match value {
                    Value::Bool(true) => "TRUE",
                    Value::Bool(false) => "FALSE",
                    _ => "NULL",
                };
                format!("{} {op} {literal}", self.field)
            }
            ConditionValue::Scalar(value) => {
                let key = params.bind_indexed(&self.key_base(), Param::new(value.clone()));
                format!("{} {op} :{key}", self.field)
            }
            ConditionValue::List(values) => {
                let base = self.key_base();
                let keys: Vec<String> = values
                    .iter()
                    .map(|v| format!(":{}", params.bind_indexed(&base, Param::new(v.clone()))))
                    .collect();
                format!("{} {op} ({})", self.field, keys.join(","))
            }
        }
    }

    fn key_base(&self) -> String {
        format!("c_{}", sanitize_key(&self.field))
    }
}
