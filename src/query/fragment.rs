//! One relationship path rendered as a `SELECT contact_id` query.

use crate::metadata::TableNames;
use crate::model::{ContactId, FieldId, FieldType, ObjectId};
use crate::sql::{col, param, table_col, ExprExt, Parameters, Query, TableRef};

use super::condition::ValueCondition;
use super::error::QueryResult;
use super::path::RelationshipPath;

/// Where a path starts: the table whose rows are filtered.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSource {
    /// Rows of a value table for one field.
    FieldValue { table: String, field_id: FieldId },
    /// Items of one custom object.
    ObjectItem { object_id: ObjectId },
}

impl PathSource {
    fn alias_suffix(&self) -> &'static str {
        match self {
            PathSource::FieldValue { .. } => "value",
            PathSource::ObjectItem { .. } => "item",
        }
    }

    /// Column holding the item id the first hop starts from.
    fn item_column(&self) -> &'static str {
        match self {
            PathSource::FieldValue { .. } => "custom_item_id",
            PathSource::ObjectItem { .. } => "id",
        }
    }

    /// Column a value condition compares.
    fn compared_column(&self) -> &'static str {
        match self {
            PathSource::FieldValue { .. } => "value",
            PathSource::ObjectItem { .. } => "name",
        }
    }

    fn table(&self, tables: &TableNames) -> String {
        match self {
            PathSource::FieldValue { table, .. } => table.clone(),
            PathSource::ObjectItem { .. } => tables.items(),
        }
    }
}

/// A built fragment: its query, the alias seed it was built with, and the
/// parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub query: Query,
    pub alias: String,
    pub params: Parameters,
    source_alias: String,
    compared_column: &'static str,
}

impl Fragment {
    /// Alias of the item–contact junction.
    pub fn contact_alias(&self) -> String {
        format!("{}_contact", self.alias)
    }

    /// Alias of the table the path starts from.
    pub fn source_alias(&self) -> &str {
        &self.source_alias
    }

    /// Append the positive form of a value condition.
    pub fn apply_condition(
        &mut self,
        condition: &ValueCondition,
        field_type: FieldType,
    ) -> QueryResult<()> {
        let stem = format!("{}_{}", self.alias, self.compared_column);
        let column = table_col(&self.source_alias, self.compared_column);
        let predicate = condition.to_expr(column, field_type, &stem, &mut self.params)?;
        self.query.add_filter(predicate);
        Ok(())
    }

    /// Limit the fragment to links of one contact.
    pub fn restrict_to_contact(&mut self, contact_id: ContactId) {
        let contact_alias = self.contact_alias();
        let name = format!("{}_contact_id", self.alias);
        self.query
            .add_filter(table_col(&contact_alias, "contact_id").eq(param(&name)));
        self.params.set(name, contact_id);
    }
}

/// Builds fragments against the fixed junction schema.
#[derive(Debug, Clone, Copy)]
pub struct QueryFragmentBuilder<'a> {
    tables: &'a TableNames,
}

impl<'a> QueryFragmentBuilder<'a> {
    pub fn new(tables: &'a TableNames) -> Self {
        Self { tables }
    }

    /// Render one path.
    ///
    /// Aliases are `<seed>_value` (or `<seed>_item`), `<seed>_item_xref_<n>`
    /// for the n-th item hop, and `<seed>_contact`.
    pub fn build(&self, path: &RelationshipPath, source: &PathSource, seed: &str) -> Fragment {
        let source_alias = format!("{}_{}", seed, source.alias_suffix());
        let contact_alias = format!("{}_contact", seed);
        let item_item = self.tables.item_item();

        let mut query = Query::new()
            .select(vec![col("contact_id")])
            .from(TableRef::new(&source.table(self.tables)).with_alias(&source_alias));

        let mut previous_end = table_col(&source_alias, source.item_column());
        for (i, hop) in path.hops().iter().enumerate() {
            let xref = format!("{}_item_xref_{}", seed, i + 1);
            query = query.inner_join(
                TableRef::new(&item_item).with_alias(&xref),
                table_col(&xref, hop.direction.from_column()).eq(previous_end),
            );
            previous_end = table_col(&xref, hop.direction.to_column());
        }

        query = query.inner_join(
            TableRef::new(&self.tables.item_contact()).with_alias(&contact_alias),
            previous_end.eq(table_col(&contact_alias, "custom_item_id")),
        );

        let mut params = Parameters::new();
        let (column, name, value): (&str, String, i64) = match source {
            PathSource::FieldValue { field_id, .. } => (
                "custom_field_id",
                format!("{}_custom_field_id", seed),
                *field_id,
            ),
            PathSource::ObjectItem { object_id } => (
                "custom_object_id",
                format!("{}_custom_object_id", seed),
                *object_id,
            ),
        };
        query = query.filter(table_col(&source_alias, column).eq(param(&name)));
        params.set(name, value);

        Fragment {
            query,
            alias: seed.to_string(),
            params,
            source_alias,
            compared_column: source.compared_column(),
        }
    }
}
