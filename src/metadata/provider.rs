//! The compiler's view of field metadata.

use crate::model::{CustomField, CustomObject, FieldId, FieldType, ObjectId};
use crate::query::{QueryError, QueryResult};

use super::tables::TableNames;

/// Read-only metadata the compiler resolves filters against.
///
/// Implementations must not change what they return while a compiler
/// holds them.
pub trait FieldMetadataProvider: Send + Sync {
    /// Physical value table for a field type key.
    fn resolve_value_table(&self, type_key: &str) -> QueryResult<String>;

    fn resolve_field_by_id(&self, id: FieldId) -> QueryResult<CustomField>;

    fn resolve_object_by_id(&self, id: ObjectId) -> QueryResult<CustomObject>;

    /// Table names for the junction and item tables.
    fn tables(&self) -> &TableNames;
}

/// Built-in field types, resolved under a table prefix.
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    tables: TableNames,
}

impl FieldTypeRegistry {
    pub fn new(tables: TableNames) -> Self {
        Self { tables }
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self::new(TableNames::new(prefix))
    }

    pub fn field_type(&self, type_key: &str) -> QueryResult<FieldType> {
        FieldType::from_key(type_key)
            .ok_or_else(|| QueryError::UnsupportedFieldType(type_key.to_string()))
    }

    pub fn value_table(&self, type_key: &str) -> QueryResult<String> {
        let field_type = self.field_type(type_key)?;
        Ok(self.tables.value_table(field_type.value_kind()))
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }
}
