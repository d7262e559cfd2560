//! Named parameter storage shared by every renderer of one statement.

use crate::value::{ParamType, Value};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

/// A bound parameter: declared type plus value.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: ParamType,
    pub value: Value,
}

impl Param {
    /// Create a parameter, inferring its type from the value.
    pub fn new(value: Value) -> Self {
        Self {
            ty: value.param_type(),
            value,
        }
    }

    /// Create a parameter with an explicit type.
    pub fn typed(ty: ParamType, value: Value) -> Self {
        Self { ty, value }
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Param", 2)?;
        s.serialize_field("type", &self.ty)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

/// Insertion-ordered map of `placeholder name -> Param`.
///
/// Keys are never overwritten; the `bind_*` helpers pick a free name instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, Param)>,
}

impl ParamMap {
    /// Create a new empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, p)| p)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Bind under `<base>_<n>` with the smallest free `n >= 0`.
    ///
    /// Returns the chosen name (without the leading colon).
    pub fn bind_indexed(&mut self, base: &str, param: Param) -> String {
        let mut n = 0usize;
        let name = loop {
            let candidate = format!("{base}_{n}");
            if !self.contains_key(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.entries.push((name.clone(), param));
        name
    }

    /// Bind under `base`, or `<base>_<n>` (n >= 1) if `base` is taken.
    pub fn bind_named(&mut self, base: &str, param: Param) -> String {
        let name = if self.contains_key(base) {
            let mut n = 1usize;
            loop {
                let candidate = format!("{base}_{n}");
                if !self.contains_key(&candidate) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            base.to_string()
        };
        self.entries.push((name.clone(), param));
        name
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, p) in &self.entries {
            map.serialize_entry(k, p)?;
        }
        map.end()
    }
}

/// Replace every character that is not ASCII alphanumeric with `_`.
pub fn sanitize_key(field: &str) -> String {
    field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
