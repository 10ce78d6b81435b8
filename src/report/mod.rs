//! Report columns for a custom object's fields.
//!
//! Each field's value table is LEFT JOINed onto the item query under an
//! alias derived from the field id, so one report can show every field of
//! an object side by side.

use md5::{Digest, Md5};

use crate::metadata::FieldTypeRegistry;
use crate::model::{CustomField, CustomObject, FieldId};
use crate::query::QueryResult;
use crate::sql::{lit_int, table_col, ExprExt, Query, TableRef};

/// A column the report builder can offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    /// `<alias>.value`
    pub key: String,
    pub label: String,
    pub column_type: &'static str,
}

#[derive(Debug, Clone)]
struct FieldJoin {
    alias: String,
    table: String,
    field_id: FieldId,
}

/// Columns and joins for one custom object.
#[derive(Debug, Clone)]
pub struct ColumnsBuilder {
    columns: Vec<ReportColumn>,
    joins: Vec<FieldJoin>,
}

impl ColumnsBuilder {
    /// Fails with `UnsupportedFieldType` if any field's type has no value table.
    pub fn new(object: &CustomObject, registry: &FieldTypeRegistry) -> QueryResult<Self> {
        let mut columns = Vec::with_capacity(object.fields.len());
        let mut joins = Vec::with_capacity(object.fields.len());

        for field in &object.fields {
            let alias = field_alias(field);
            columns.push(ReportColumn {
                key: format!("{}.value", alias),
                label: field.label.clone(),
                column_type: "string",
            });
            joins.push(FieldJoin {
                alias,
                table: registry.value_table(&field.type_key)?,
                field_id: field.id,
            });
        }

        Ok(Self { columns, joins })
    }

    pub fn columns(&self) -> &[ReportColumn] {
        &self.columns
    }

    /// LEFT JOIN every field's value table onto `query`.
    pub fn prepare_query(&self, query: &mut Query, item_alias: &str) {
        for join in &self.joins {
            let on = table_col(item_alias, "id")
                .eq(table_col(&join.alias, "custom_item_id"))
                .and(table_col(&join.alias, "custom_field_id").eq(lit_int(join.field_id)));
            query.add_left_join(TableRef::new(&join.table).with_alias(&join.alias), on);
        }
    }
}

/// First 8 hex chars of the MD5 of the field id, as the platform keys
/// stored report columns.
fn field_alias(field: &CustomField) -> String {
    let mut hasher = Md5::new();
    hasher.update(field.id.to_string().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}
