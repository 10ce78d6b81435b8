//! Named bind parameters carried alongside generated SQL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value bound to a named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    String(String),
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.into())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Named parameters, ordered by name so output is reproducible.
///
/// Names are stored without the dialect prefix (`alias_value`, not `:alias_value`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value. Rebinding a name replaces the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another set of parameters into this one.
    ///
    /// A name present on both sides must carry the same value; fragments of
    /// one filter share parameter names only when they bind the same thing.
    pub fn merge(&mut self, other: &Parameters) {
        for (name, value) in &other.values {
            let previous = self.values.insert(name.clone(), value.clone());
            debug_assert!(
                previous.as_ref().map_or(true, |p| p == value),
                "parameter `{}` bound to conflicting values",
                name
            );
        }
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
