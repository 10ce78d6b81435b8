//! Custom objects: user-defined record types.

use serde::{Deserialize, Serialize};

use super::field::CustomField;
use super::ObjectId;

/// Whether an object holds records of its own or joins two master objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Master,
    /// Models a many-to-many join between two master objects.
    Relationship,
}

/// A named record type hosted by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomObject {
    pub id: ObjectId,
    pub alias: String,
    pub name_singular: String,
    /// Derived from `name_singular` when the catalog leaves it out.
    #[serde(default)]
    pub name_plural: String,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub master_object: Option<ObjectId>,
    #[serde(default)]
    pub relationship_object: Option<ObjectId>,
    #[serde(default)]
    pub fields: Vec<CustomField>,
}

impl CustomObject {
    pub fn new(id: ObjectId, alias: &str, name_singular: &str) -> Self {
        Self {
            id,
            alias: alias.into(),
            name_singular: name_singular.into(),
            name_plural: String::new(),
            kind: ObjectKind::Master,
            master_object: None,
            relationship_object: None,
            fields: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_master_object(mut self, id: ObjectId) -> Self {
        self.master_object = Some(id);
        self
    }

    pub fn with_relationship_object(mut self, id: ObjectId) -> Self {
        self.relationship_object = Some(id);
        self
    }

    /// Add a field, taking ownership of it for this object.
    pub fn with_field(mut self, mut field: CustomField) -> Self {
        field.object_id = self.id;
        self.fields.push(field);
        self
    }

    pub fn is_relationship(&self) -> bool {
        self.kind == ObjectKind::Relationship
    }

    pub fn field(&self, id: super::FieldId) -> Option<&CustomField> {
        self.fields.iter().find(|f| f.id == id)
    }
}
