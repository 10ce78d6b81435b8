//! Value conditions: the `<op> <value>` part of a field filter.

use serde::{Deserialize, Serialize};

use crate::model::{FieldType, Operator, ValueKind};
use crate::sql::{param, Expr, ExprExt, ParamValue, Parameters, LIKE_ESCAPE};

use super::error::{QueryError, QueryResult};

/// The value a filter compares against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    #[default]
    None,
    Single(ParamValue),
    List(Vec<ParamValue>),
}

impl FilterValue {
    /// Read a filter value from the platform's loosely typed JSON.
    ///
    /// Numbers must be integers. Booleans become `0`/`1`. Nested lists
    /// and objects are rejected.
    pub fn from_json(value: &serde_json::Value) -> QueryResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(FilterValue::None),
            Value::Array(items) => items
                .iter()
                .map(scalar_from_json)
                .collect::<QueryResult<Vec<_>>>()
                .map(FilterValue::List),
            other => scalar_from_json(other).map(FilterValue::Single),
        }
    }
}

fn scalar_from_json(value: &serde_json::Value) -> QueryResult<ParamValue> {
    use serde_json::Value;

    match value {
        Value::String(s) => Ok(ParamValue::String(s.clone())),
        Value::Bool(b) => Ok(ParamValue::Int(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .map(ParamValue::Int)
            .ok_or_else(|| QueryError::invalid(format!("value {} is not an integer", n))),
        other => Err(QueryError::invalid(format!("unsupported filter value {}", other))),
    }
}

/// An operator with its value, not yet checked against a field type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValueCondition {
    pub operator: Operator,
    #[serde(default)]
    pub value: FilterValue,
}

impl ValueCondition {
    pub fn new(operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.operator.is_negative()
    }

    /// Check the operator and value shape against a field type.
    pub fn validate(&self, field_type: FieldType) -> QueryResult<()> {
        if !field_type.supports(self.operator) {
            return Err(QueryError::operator_not_allowed(self.operator, field_type.key()));
        }
        self.normalized_values(field_type).map(|_| ())
    }

    /// The positive form of the condition as a predicate on `column`.
    ///
    /// Values are bound under `stem` (single values) or `stem_<i>` (lists).
    pub fn to_expr(
        &self,
        column: Expr,
        field_type: FieldType,
        stem: &str,
        params: &mut Parameters,
    ) -> QueryResult<Expr> {
        self.validate(field_type)?;
        let values = self.normalized_values(field_type)?;

        let bind_single = |params: &mut Parameters, value: ParamValue| {
            params.set(stem, value);
            param(stem)
        };

        let expr = match self.operator.positive() {
            Operator::NotEmpty => match field_type.value_kind() {
                ValueKind::Int | ValueKind::DateTime => column.is_not_null(),
                ValueKind::Text | ValueKind::Option => {
                    column.clone().is_not_null().and(column.ne(""))
                }
            },
            Operator::In => {
                let placeholders = values
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let name = format!("{}_{}", stem, i);
                        params.set(name.as_str(), value);
                        param(&name)
                    })
                    .collect();
                column.in_list(placeholders)
            }
            Operator::StartsWith => {
                column.like_escaped(bind_single(params, like_pattern(&values, "", "%")))
            }
            Operator::EndsWith => {
                column.like_escaped(bind_single(params, like_pattern(&values, "%", "")))
            }
            Operator::Contains => {
                column.like_escaped(bind_single(params, like_pattern(&values, "%", "%")))
            }
            op => {
                let value = values.into_iter().next().unwrap_or(ParamValue::Int(0));
                let placeholder = bind_single(params, value);
                match op {
                    Operator::Eq => column.eq(placeholder),
                    Operator::Gt => column.gt(placeholder),
                    Operator::Gte => column.gte(placeholder),
                    Operator::Lt => column.lt(placeholder),
                    Operator::Lte => column.lte(placeholder),
                    Operator::Like => column.like(placeholder),
                    Operator::Regexp => column.regexp(placeholder),
                    other => {
                        return Err(QueryError::invalid(format!(
                            "operator '{}' has no positive form",
                            other
                        )))
                    }
                }
            }
        };

        Ok(expr)
    }

    /// Values as the database will receive them.
    fn normalized_values(&self, field_type: FieldType) -> QueryResult<Vec<ParamValue>> {
        let values = match (&self.value, self.operator) {
            (_, op) if op.takes_no_value() => return Ok(Vec::new()),
            (FilterValue::None, op) => {
                return Err(QueryError::invalid(format!("operator '{}' needs a value", op)))
            }
            (FilterValue::List(items), op) if op.takes_list() => {
                if items.is_empty() {
                    return Err(QueryError::invalid(format!(
                        "operator '{}' needs at least one value",
                        op
                    )));
                }
                items.clone()
            }
            (FilterValue::Single(value), _) => vec![value.clone()],
            (FilterValue::List(_), op) => {
                return Err(QueryError::invalid(format!("operator '{}' takes a single value", op)))
            }
        };

        if field_type.value_kind() == ValueKind::Int {
            values.into_iter().map(to_int).collect()
        } else {
            Ok(values
                .into_iter()
                .map(|v| match v {
                    ParamValue::Int(n) => ParamValue::String(n.to_string()),
                    s => s,
                })
                .collect())
        }
    }
}

fn to_int(value: ParamValue) -> QueryResult<ParamValue> {
    match value {
        ParamValue::Int(n) => Ok(ParamValue::Int(n)),
        ParamValue::String(s) => s
            .trim()
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|_| QueryError::invalid(format!("'{}' is not an integer", s))),
    }
}

fn like_pattern(values: &[ParamValue], before: &str, after: &str) -> ParamValue {
    let text = values.first().map(|v| v.to_string()).unwrap_or_default();
    ParamValue::String(format!("{}{}{}", before, escape_like(&text), after))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

impl From<ParamValue> for FilterValue {
    fn from(value: ParamValue) -> Self {
        FilterValue::Single(value)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Single(ParamValue::Int(n))
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Single(ParamValue::Int(n as i64))
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Single(ParamValue::String(s.into()))
    }
}

impl From<Vec<ParamValue>> for FilterValue {
    fn from(values: Vec<ParamValue>) -> Self {
        FilterValue::List(values)
    }
}
