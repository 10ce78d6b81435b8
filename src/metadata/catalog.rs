//! In-memory catalog of custom objects, loaded from TOML.
//!
//! ```toml
//! [[objects]]
//! id = 1
//! alias = "product"
//! name_singular = "Product"
//!
//! [[objects.fields]]
//! id = 10
//! label = "Price"
//! alias = "price"
//! type = "int"
//!
//! [[objects]]
//! id = 2
//! alias = "order_line"
//! name_singular = "Order line"
//! kind = "relationship"
//! master_object = 1
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use inflector::Inflector;
use serde::Deserialize;

use crate::model::{CustomField, CustomObject, FieldId, ObjectId};
use crate::query::{QueryError, QueryResult};

use super::provider::{FieldMetadataProvider, FieldTypeRegistry};
use super::tables::TableNames;

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Duplicate custom object id {0}")]
    DuplicateObject(ObjectId),

    #[error("Duplicate custom field id {0}")]
    DuplicateField(FieldId),

    #[error("Custom object {0} is its own relationship object")]
    SelfRelationship(ObjectId),

    #[error("Relationship object {0} has no master object")]
    MissingMaster(ObjectId),

    #[error("Custom object {object} references unknown object {referenced}")]
    UnknownReference {
        object: ObjectId,
        referenced: ObjectId,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    objects: Vec<CustomObject>,
}

/// Objects and fields known to one installation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    objects: BTreeMap<ObjectId, CustomObject>,
    /// Field id to owning object.
    field_owners: BTreeMap<FieldId, ObjectId>,
    registry: FieldTypeRegistry,
}

impl Catalog {
    /// Build a catalog, validating the relationships between objects.
    pub fn new(
        objects: Vec<CustomObject>,
        registry: FieldTypeRegistry,
    ) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();
        let mut field_owners = BTreeMap::new();

        for mut object in objects {
            if object.name_plural.is_empty() {
                object.name_plural = object.name_singular.to_plural();
            }
            for field in &mut object.fields {
                field.object_id = object.id;
                if field_owners.insert(field.id, object.id).is_some() {
                    return Err(CatalogError::DuplicateField(field.id));
                }
            }
            let id = object.id;
            if by_id.insert(id, object).is_some() {
                return Err(CatalogError::DuplicateObject(id));
            }
        }

        for object in by_id.values() {
            validate_references(object, &by_id)?;
        }

        Ok(Self {
            objects: by_id,
            field_owners,
            registry,
        })
    }

    pub fn from_toml_str(content: &str, registry: FieldTypeRegistry) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.objects, registry)
    }

    pub fn from_file<P: AsRef<Path>>(
        path: P,
        registry: FieldTypeRegistry,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content, registry)
    }

    pub fn object(&self, id: ObjectId) -> Option<&CustomObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &CustomObject> {
        self.objects.values()
    }

    pub fn field(&self, id: FieldId) -> Option<&CustomField> {
        let owner = self.field_owners.get(&id)?;
        self.objects.get(owner)?.field(id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &CustomField> {
        self.objects.values().flat_map(|o| o.fields.iter())
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }
}

fn validate_references(
    object: &CustomObject,
    objects: &BTreeMap<ObjectId, CustomObject>,
) -> Result<(), CatalogError> {
    if object.relationship_object == Some(object.id) {
        return Err(CatalogError::SelfRelationship(object.id));
    }
    if object.is_relationship() && object.master_object.is_none() {
        return Err(CatalogError::MissingMaster(object.id));
    }

    for referenced in [object.master_object, object.relationship_object]
        .into_iter()
        .flatten()
    {
        if !objects.contains_key(&referenced) {
            return Err(CatalogError::UnknownReference {
                object: object.id,
                referenced,
            });
        }
    }

    Ok(())
}

impl FieldMetadataProvider for Catalog {
    fn resolve_value_table(&self, type_key: &str) -> QueryResult<String> {
        self.registry.value_table(type_key)
    }

    fn resolve_field_by_id(&self, id: FieldId) -> QueryResult<CustomField> {
        self.field(id).cloned().ok_or(QueryError::UnknownField(id))
    }

    fn resolve_object_by_id(&self, id: ObjectId) -> QueryResult<CustomObject> {
        self.object(id).cloned().ok_or(QueryError::UnknownObject(id))
    }

    fn tables(&self) -> &TableNames {
        self.registry.tables()
    }
}
