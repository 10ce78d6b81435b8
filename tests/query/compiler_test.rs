//! Golden and property tests for the relationship-path compiler.

use std::collections::HashSet;

use custom_objects::metadata::{FieldMetadataProvider, TableNames};
use custom_objects::model::{CustomField, CustomObject, FieldId, ObjectId};
use custom_objects::query::{
    AliasScope, CustomFieldQueryCompiler, DepthLimit, FieldFilter, QueryError, QueryResult,
};
use custom_objects::sql::{Dialect, ParamValue};

/// Provider with one `int` field (id 1) stored in `custom_field_value_int`.
struct SingleIntField {
    tables: TableNames,
}

impl SingleIntField {
    fn new() -> Self {
        Self {
            tables: TableNames::default(),
        }
    }
}

impl FieldMetadataProvider for SingleIntField {
    fn resolve_value_table(&self, type_key: &str) -> QueryResult<String> {
        match type_key {
            "int" => Ok("custom_field_value_int".to_string()),
            other => Err(QueryError::UnsupportedFieldType(other.to_string())),
        }
    }

    fn resolve_field_by_id(&self, id: FieldId) -> QueryResult<CustomField> {
        match id {
            1 => Ok(CustomField::new(1, "Amount", "amount", "int")),
            2 => Ok(CustomField::new(2, "Legacy", "legacy", "float")),
            other => Err(QueryError::UnknownField(other)),
        }
    }

    fn resolve_object_by_id(&self, id: ObjectId) -> QueryResult<CustomObject> {
        Err(QueryError::UnknownObject(id))
    }

    fn tables(&self) -> &TableNames {
        &self.tables
    }
}

fn compiler(provider: &SingleIntField, depth: u32) -> CustomFieldQueryCompiler<'_> {
    CustomFieldQueryCompiler::new(provider, DepthLimit::new(depth).unwrap())
}

#[test]
fn test_golden_depth_one() {
    let provider = SingleIntField::new();
    let container = compiler(&provider, 1)
        .with_alias_scope(AliasScope::Shared)
        .compile(&FieldFilter::new(1), "alias")
        .unwrap();

    assert_eq!(container.count(), 1);
    let (sql, params) = container.render(Dialect::MySql);
    assert_eq!(
        sql,
        "SELECT contact_id FROM custom_field_value_int alias_value INNER JOIN custom_item_xref_contact alias_contact ON alias_value.custom_item_id = alias_contact.custom_item_id WHERE alias_value.custom_field_id = :alias_custom_field_id"
    );
    assert_eq!(params.get("alias_custom_field_id"), Some(&ParamValue::Int(1)));
}

#[test]
fn test_golden_depth_two() {
    let provider = SingleIntField::new();
    let container = compiler(&provider, 2)
        .with_alias_scope(AliasScope::Shared)
        .compile(&FieldFilter::new(1), "alias")
        .unwrap();

    assert_eq!(container.count(), 3);
    let (sql, params) = container.render(Dialect::MySql);
    assert_eq!(
        sql,
        "SELECT contact_id FROM custom_field_value_int alias_value INNER JOIN custom_item_xref_contact alias_contact ON alias_value.custom_item_id = alias_contact.custom_item_id WHERE alias_value.custom_field_id = :alias_custom_field_id UNION ALL SELECT contact_id FROM custom_field_value_int alias_value INNER JOIN custom_item_xref_custom_item alias_item_xref_1 ON alias_item_xref_1.custom_item_id_lower = alias_value.custom_item_id INNER JOIN custom_item_xref_contact alias_contact ON alias_item_xref_1.custom_item_id_higher = alias_contact.custom_item_id WHERE alias_value.custom_field_id = :alias_custom_field_id UNION ALL SELECT contact_id FROM custom_field_value_int alias_value INNER JOIN custom_item_xref_custom_item alias_item_xref_1 ON alias_item_xref_1.custom_item_id_higher = alias_value.custom_item_id INNER JOIN custom_item_xref_contact alias_contact ON alias_item_xref_1.custom_item_id_lower = alias_contact.custom_item_id WHERE alias_value.custom_field_id = :alias_custom_field_id"
    );
    assert_eq!(params.len(), 1);
}

#[test]
fn test_per_fragment_depth_two() {
    let provider = SingleIntField::new();
    let container = compiler(&provider, 2)
        .compile(&FieldFilter::new(1), "alias")
        .unwrap();

    let (sql, params) = container.render(Dialect::MySql);
    insta::assert_snapshot!(sql.replace(" UNION ALL ", "\nUNION ALL\n"), @r"
    SELECT contact_id FROM custom_field_value_int alias_value INNER JOIN custom_item_xref_contact alias_contact ON alias_value.custom_item_id = alias_contact.custom_item_id WHERE alias_value.custom_field_id = :alias_custom_field_id
    UNION ALL
    SELECT contact_id FROM custom_field_value_int alias_1_value INNER JOIN custom_item_xref_custom_item alias_1_item_xref_1 ON alias_1_item_xref_1.custom_item_id_lower = alias_1_value.custom_item_id INNER JOIN custom_item_xref_contact alias_1_contact ON alias_1_item_xref_1.custom_item_id_higher = alias_1_contact.custom_item_id WHERE alias_1_value.custom_field_id = :alias_1_custom_field_id
    UNION ALL
    SELECT contact_id FROM custom_field_value_int alias_2_value INNER JOIN custom_item_xref_custom_item alias_2_item_xref_1 ON alias_2_item_xref_1.custom_item_id_higher = alias_2_value.custom_item_id INNER JOIN custom_item_xref_contact alias_2_contact ON alias_2_item_xref_1.custom_item_id_lower = alias_2_contact.custom_item_id WHERE alias_2_value.custom_field_id = :alias_2_custom_field_id
    ");

    // Every fragment binds the same field id under its own name
    assert_eq!(params.len(), 3);
    assert!(params.iter().all(|(_, v)| *v == ParamValue::Int(1)));
}

#[test]
fn test_fragment_counts() {
    let provider = SingleIntField::new();
    for (depth, expected) in [(1, 1), (2, 3), (3, 7), (4, 15)] {
        let container = compiler(&provider, depth)
            .compile(&FieldFilter::new(1), "f")
            .unwrap();
        assert_eq!(container.count(), expected, "depth {}", depth);
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let provider = SingleIntField::new();
    let compiler = compiler(&provider, 3);

    let first = compiler.compile(&FieldFilter::new(1), "f").unwrap();
    let second = compiler.compile(&FieldFilter::new(1), "f").unwrap();
    assert_eq!(first.render(Dialect::MySql), second.render(Dialect::MySql));
    assert_eq!(first.render(Dialect::Postgres), second.render(Dialect::Postgres));
}

#[test]
fn test_aliases_unique_across_fragments() {
    let provider = SingleIntField::new();
    let container = compiler(&provider, 4)
        .compile(&FieldFilter::new(1), "f")
        .unwrap();

    let mut seen_aliases = HashSet::new();
    let mut seen_params = HashSet::new();
    for fragment in container.fragments() {
        let mut tables = vec![fragment.source_alias().to_string()];
        tables.extend(
            fragment
                .query
                .joins
                .iter()
                .filter_map(|j| j.table.alias.clone()),
        );
        assert!(tables.contains(&fragment.contact_alias()));
        for alias in tables {
            assert!(seen_aliases.insert(alias.clone()), "alias {} reused", alias);
        }
        for (name, _) in fragment.params.iter() {
            assert!(seen_params.insert(name.to_string()), "param {} reused", name);
        }
    }
}

#[test]
fn test_unsupported_type_builds_nothing() {
    let provider = SingleIntField::new();
    let result = compiler(&provider, 3).compile(&FieldFilter::new(2), "f");
    assert_eq!(result, Err(QueryError::UnsupportedFieldType("float".to_string())));
}

#[test]
fn test_unknown_field() {
    let provider = SingleIntField::new();
    let result = compiler(&provider, 1).compile(&FieldFilter::new(7), "f");
    assert_eq!(result, Err(QueryError::UnknownField(7)));
    assert!(result.unwrap_err().is_recoverable());
}

#[test]
fn test_depth_read_once() {
    let provider = SingleIntField::new();
    let compiler = compiler(&provider, 2);
    assert_eq!(compiler.depth().get(), 2);
    assert_eq!(compiler.paths().len(), 3);
}
