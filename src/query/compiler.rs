//! Field filter → union of relationship-path fragments.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::FieldMetadataProvider;
use crate::model::{FieldId, FieldType, ObjectId};

use super::condition::ValueCondition;
use super::error::{QueryError, QueryResult};
use super::fragment::{PathSource, QueryFragmentBuilder};
use super::path::{enumerate, DepthLimit, RelationshipPath};
use super::union::UnionQueryContainer;

/// How fragments of one compilation name their tables and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasScope {
    /// Fragment 0 uses the seed, fragment `i` uses `<seed>_<i>`.
    #[default]
    PerFragment,
    /// Every fragment uses the seed unchanged.
    Shared,
}

impl AliasScope {
    fn seed_for(&self, seed: &str, index: usize) -> String {
        match self {
            AliasScope::PerFragment if index > 0 => format!("{}_{}", seed, index),
            _ => seed.to_string(),
        }
    }
}

/// "Contacts linked to an item whose field X satisfies a condition."
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field_id: FieldId,
    pub condition: Option<ValueCondition>,
}

impl FieldFilter {
    pub fn new(field_id: FieldId) -> Self {
        Self {
            field_id,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: ValueCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_negative(&self) -> bool {
        self.condition.as_ref().is_some_and(|c| c.is_negative())
    }
}

/// "Contacts linked to any item of object O", optionally matching the item name.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFilter {
    pub object_id: ObjectId,
    pub name: Option<ValueCondition>,
}

impl ItemFilter {
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            name: None,
        }
    }

    pub fn with_name(mut self, condition: ValueCondition) -> Self {
        self.name = Some(condition);
        self
    }

    pub fn is_negative(&self) -> bool {
        self.name.as_ref().is_some_and(|c| c.is_negative())
    }
}

/// Compiles filters into one fragment per relationship path.
///
/// The depth limit is fixed at construction; the enumerated paths are
/// computed once and reused for every filter.
pub struct CustomFieldQueryCompiler<'a> {
    provider: &'a dyn FieldMetadataProvider,
    depth: DepthLimit,
    paths: Vec<RelationshipPath>,
    scope: AliasScope,
}

impl<'a> CustomFieldQueryCompiler<'a> {
    pub fn new(provider: &'a dyn FieldMetadataProvider, depth: DepthLimit) -> Self {
        Self {
            provider,
            depth,
            paths: enumerate(depth),
            scope: AliasScope::default(),
        }
    }

    pub fn with_alias_scope(mut self, scope: AliasScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn depth(&self) -> DepthLimit {
        self.depth
    }

    pub fn alias_scope(&self) -> AliasScope {
        self.scope
    }

    pub fn paths(&self) -> &[RelationshipPath] {
        &self.paths
    }

    /// Compile a field filter.
    ///
    /// Fails without building anything when the field is unknown, its type
    /// has no value table, or the condition does not fit the type.
    pub fn compile(&self, filter: &FieldFilter, alias_seed: &str) -> QueryResult<UnionQueryContainer> {
        validate_seed(alias_seed)?;

        let field = self.provider.resolve_field_by_id(filter.field_id)?;
        let table = self.provider.resolve_value_table(&field.type_key)?;

        let condition = match &filter.condition {
            Some(condition) => {
                let field_type = FieldType::from_key(&field.type_key)
                    .ok_or_else(|| QueryError::UnsupportedFieldType(field.type_key.clone()))?;
                condition.validate(field_type)?;
                Some((condition, field_type))
            }
            None => None,
        };

        let source = PathSource::FieldValue {
            table,
            field_id: field.id,
        };
        let container = self.build_all(&source, condition, alias_seed)?;

        debug!(
            field_id = field.id,
            field_type = %field.type_key,
            depth = %self.depth,
            fragments = container.count(),
            "compiled custom field filter"
        );
        Ok(container)
    }

    /// Compile an item-of-object filter.
    pub fn compile_object_items(
        &self,
        filter: &ItemFilter,
        alias_seed: &str,
    ) -> QueryResult<UnionQueryContainer> {
        validate_seed(alias_seed)?;

        let object = self.provider.resolve_object_by_id(filter.object_id)?;
        let condition = match &filter.name {
            Some(condition) => {
                condition.validate(FieldType::Text)?;
                Some((condition, FieldType::Text))
            }
            None => None,
        };

        let source = PathSource::ObjectItem {
            object_id: object.id,
        };
        let container = self.build_all(&source, condition, alias_seed)?;

        debug!(
            object_id = object.id,
            depth = %self.depth,
            fragments = container.count(),
            "compiled custom item filter"
        );
        Ok(container)
    }

    fn build_all(
        &self,
        source: &PathSource,
        condition: Option<(&ValueCondition, FieldType)>,
        alias_seed: &str,
    ) -> QueryResult<UnionQueryContainer> {
        let builder = QueryFragmentBuilder::new(self.provider.tables());
        let mut container = UnionQueryContainer::new();

        for (i, path) in self.paths.iter().enumerate() {
            let seed = self.scope.seed_for(alias_seed, i);
            let mut fragment = builder.build(path, source, &seed);
            if let Some((condition, field_type)) = condition {
                fragment.apply_condition(condition, field_type)?;
            }
            container.push(fragment);
        }

        Ok(container)
    }
}

/// Alias seeds become table aliases and parameter names.
fn validate_seed(seed: &str) -> QueryResult<()> {
    let mut chars = seed.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(QueryError::invalid(format!("alias seed '{}' is not an identifier", seed)))
    }
}
