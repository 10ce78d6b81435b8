//! Custom fields: typed attributes of a custom object.

use serde::{Deserialize, Serialize};

use super::field_type::FieldType;
use super::{FieldId, ObjectId};

/// A field belonging to exactly one custom object.
///
/// The type key is kept as written so that a field whose type is no
/// longer registered still loads; resolution reports it when a filter
/// tries to use it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomField {
    pub id: FieldId,
    /// Owning object. Filled in by the catalog from the enclosing object.
    #[serde(default)]
    pub object_id: ObjectId,
    pub label: String,
    pub alias: String,
    #[serde(rename = "type")]
    pub type_key: String,
}

impl CustomField {
    pub fn new(id: FieldId, label: &str, alias: &str, type_key: &str) -> Self {
        Self {
            id,
            object_id: 0,
            label: label.into(),
            alias: alias.into(),
            type_key: type_key.into(),
        }
    }

    /// The built-in type for this field's key, if there is one.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_key(&self.type_key)
    }
}
