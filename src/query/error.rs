//! Errors raised while turning a filter into SQL.

use crate::model::{FieldId, ObjectId, Operator};

/// Result type for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Why a single filter could not be compiled.
///
/// Every variant concerns one filter only. Callers holding several
/// filters skip the failing one and carry on with the rest.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The field's type key has no value table.
    #[error("unsupported field type '{0}'")]
    UnsupportedFieldType(String),

    #[error("unknown custom field {0}")]
    UnknownField(FieldId),

    #[error("unknown custom object {0}")]
    UnknownObject(ObjectId),

    /// The filter cannot be expressed as a relationship query.
    #[error("invalid segment filter: {0}")]
    InvalidSegmentFilter(String),
}

impl QueryError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        QueryError::InvalidSegmentFilter(message.into())
    }

    pub(crate) fn operator_not_allowed(operator: Operator, type_key: &str) -> Self {
        QueryError::InvalidSegmentFilter(format!(
            "operator '{}' is not available for '{}' fields",
            operator, type_key
        ))
    }

    /// Whether the caller may skip this filter and continue with its siblings.
    pub fn is_recoverable(&self) -> bool {
        match self {
            QueryError::UnsupportedFieldType(_)
            | QueryError::UnknownField(_)
            | QueryError::UnknownObject(_)
            | QueryError::InvalidSegmentFilter(_) => true,
        }
    }
}
