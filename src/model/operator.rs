//! Filter operators as the platform's segment builder names them.

use serde::{Deserialize, Serialize};

/// A comparison a segment filter applies to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Operator {
    #[serde(rename = "eq", alias = "=")]
    Eq,
    #[serde(rename = "neq", alias = "!=")]
    Neq,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Gte,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "!empty")]
    NotEmpty,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "!like")]
    NotLike,
    #[serde(rename = "startsWith")]
    StartsWith,
    #[serde(rename = "endsWith")]
    EndsWith,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "!in")]
    NotIn,
    #[serde(rename = "regexp")]
    Regexp,
    #[serde(rename = "!regexp")]
    NotRegexp,
}

const ALL: [Operator; 17] = [
    Operator::Eq,
    Operator::Neq,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::Empty,
    Operator::NotEmpty,
    Operator::Like,
    Operator::NotLike,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Contains,
    Operator::In,
    Operator::NotIn,
    Operator::Regexp,
    Operator::NotRegexp,
];

impl Operator {
    pub fn all() -> &'static [Operator] {
        &ALL
    }

    /// Parse a platform operator key. `=` and `!=` are accepted as aliases.
    pub fn from_key(key: &str) -> Option<Operator> {
        match key {
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::Neq),
            _ => ALL.iter().copied().find(|op| op.key() == key),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Empty => "empty",
            Operator::NotEmpty => "!empty",
            Operator::Like => "like",
            Operator::NotLike => "!like",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Contains => "contains",
            Operator::In => "in",
            Operator::NotIn => "!in",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "!regexp",
        }
    }

    /// Whether the operator matches contacts by the *absence* of a value.
    ///
    /// Negative operators compile to their positive counterpart and are
    /// spliced with `NOT IN`, so contacts with no item at all also match.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Operator::Neq | Operator::Empty | Operator::NotLike | Operator::NotIn | Operator::NotRegexp
        )
    }

    /// The positive operator whose result set a negative operator excludes.
    pub fn positive(&self) -> Operator {
        match self {
            Operator::Neq => Operator::Eq,
            Operator::Empty => Operator::NotEmpty,
            Operator::NotLike => Operator::Like,
            Operator::NotIn => Operator::In,
            Operator::NotRegexp => Operator::Regexp,
            other => *other,
        }
    }

    /// Whether the filter value is a list.
    pub fn takes_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Whether the filter carries no value at all.
    pub fn takes_no_value(&self) -> bool {
        matches!(self, Operator::Empty | Operator::NotEmpty)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
