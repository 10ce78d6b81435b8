//! Segment filters as the platform stores them, and their typed form.

use serde::{Deserialize, Serialize};

use crate::model::{FieldId, ObjectId, Operator};
use crate::query::{FieldFilter, FilterValue, ItemFilter, QueryError, QueryResult, ValueCondition};

/// `object` value the platform uses for custom object filters.
pub const CUSTOM_OBJECT: &str = "custom_object";

const FIELD_PREFIX: &str = "cmf_";
const ITEM_PREFIX: &str = "cmo_";

/// How a filter combines with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glue {
    #[default]
    And,
    Or,
}

/// A filter exactly as stored in a segment definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSegmentFilter {
    #[serde(default)]
    pub glue: Glue,
    pub field: String,
    pub object: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    pub operator: String,
    #[serde(default)]
    pub filter: serde_json::Value,
}

impl RawSegmentFilter {
    pub fn new(field: &str, object: &str, operator: &str, filter: serde_json::Value) -> Self {
        Self {
            glue: Glue::And,
            field: field.into(),
            object: object.into(),
            field_type: String::new(),
            operator: operator.into(),
            filter,
        }
    }

    pub fn with_glue(mut self, glue: Glue) -> Self {
        self.glue = glue;
        self
    }
}

/// A segment filter routed by what it filters on.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentFilter {
    /// A custom field value (`cmf_<id>`).
    CustomField { glue: Glue, filter: FieldFilter },
    /// Linked to an item of a custom object (`cmo_<id>`).
    CustomItem { glue: Glue, filter: ItemFilter },
    /// Anything the platform handles itself.
    Native(RawSegmentFilter),
}

impl SegmentFilter {
    pub fn glue(&self) -> Glue {
        match self {
            SegmentFilter::CustomField { glue, .. } | SegmentFilter::CustomItem { glue, .. } => {
                *glue
            }
            SegmentFilter::Native(raw) => raw.glue,
        }
    }

    /// Whether the compiled query lists contacts to exclude.
    pub fn is_negative(&self) -> bool {
        match self {
            SegmentFilter::CustomField { filter, .. } => filter.is_negative(),
            SegmentFilter::CustomItem { filter, .. } => filter.is_negative(),
            SegmentFilter::Native(_) => false,
        }
    }
}

impl TryFrom<&RawSegmentFilter> for SegmentFilter {
    type Error = QueryError;

    fn try_from(raw: &RawSegmentFilter) -> QueryResult<Self> {
        if raw.object != CUSTOM_OBJECT {
            return Ok(SegmentFilter::Native(raw.clone()));
        }

        let condition = || -> QueryResult<ValueCondition> {
            let operator = Operator::from_key(&raw.operator).ok_or_else(|| {
                QueryError::invalid(format!("unknown operator '{}'", raw.operator))
            })?;
            let value = if operator.takes_no_value() {
                FilterValue::None
            } else {
                FilterValue::from_json(&raw.filter)?
            };
            Ok(ValueCondition::new(operator, value))
        };

        if let Some(id) = raw.field.strip_prefix(FIELD_PREFIX) {
            let field_id: FieldId = parse_id(id, &raw.field)?;
            return Ok(SegmentFilter::CustomField {
                glue: raw.glue,
                filter: FieldFilter::new(field_id).with_condition(condition()?),
            });
        }

        if let Some(id) = raw.field.strip_prefix(ITEM_PREFIX) {
            let object_id: ObjectId = parse_id(id, &raw.field)?;
            return Ok(SegmentFilter::CustomItem {
                glue: raw.glue,
                filter: ItemFilter::new(object_id).with_name(condition()?),
            });
        }

        Err(QueryError::invalid(format!(
            "'{}' is not a custom field or custom object filter",
            raw.field
        )))
    }
}

impl TryFrom<RawSegmentFilter> for SegmentFilter {
    type Error = QueryError;

    fn try_from(raw: RawSegmentFilter) -> QueryResult<Self> {
        SegmentFilter::try_from(&raw)
    }
}

fn parse_id(id: &str, field: &str) -> QueryResult<i64> {
    id.parse()
        .map_err(|_| QueryError::invalid(format!("'{}' does not end in an id", field)))
}
