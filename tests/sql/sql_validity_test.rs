//! Generated statements must be accepted by a real SQL parser.

use custom_objects::metadata::{Catalog, FieldTypeRegistry};
use custom_objects::model::{CustomField, CustomObject};
use custom_objects::query::{CustomFieldQueryCompiler, DepthLimit};
use custom_objects::segment::{
    ContactRestriction, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher, SegmentQuery,
    CUSTOM_OBJECT,
};
use custom_objects::sql::{table_col, Dialect, Query, TableRef};
use serde_json::{json, Value};
use sqlparser::dialect::{MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

fn catalog(registry: FieldTypeRegistry) -> Catalog {
    let object = CustomObject::new(1, "product", "Product")
        .with_field(CustomField::new(10, "Price", "price", "int"))
        .with_field(CustomField::new(11, "Colour", "colour", "select"))
        .with_field(CustomField::new(12, "Notes", "notes", "textarea"))
        .with_field(CustomField::new(13, "Shipped", "shipped", "datetime"));
    Catalog::new(vec![object], registry).unwrap()
}

fn filters() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        ("cmf_10", "gte", json!(10)),
        ("cmf_10", "!in", json!([1, 2, 3])),
        ("cmf_11", "in", json!(["red"])),
        ("cmf_12", "contains", json!("50% off")),
        ("cmf_12", "empty", Value::Null),
        ("cmf_13", "lt", json!("2024-01-01 00:00:00")),
        ("cmo_1", "eq", json!("Desk")),
        ("cmo_1", "!empty", Value::Null),
    ]
}

fn assert_parses(sql: &str, dialect: Dialect) {
    let statements = match dialect {
        Dialect::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, sql),
        _ => Parser::parse_sql(&MySqlDialect {}, sql),
    }
    .unwrap_or_else(|e| panic!("{:?} rejected:\n{}\n{}", dialect, sql, e));
    assert_eq!(statements.len(), 1, "{}", sql);
}

#[test]
fn test_unions_parse() {
    let catalog = catalog(FieldTypeRegistry::default());

    for depth in 1..=3 {
        let dispatcher = SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
            &catalog,
            DepthLimit::new(depth).unwrap(),
        ));
        for (field, operator, value) in filters() {
            let filter =
                SegmentFilter::try_from(RawSegmentFilter::new(field, CUSTOM_OBJECT, operator, value))
                    .unwrap();
            for restriction in [ContactRestriction::AllContacts, ContactRestriction::Contact(7)] {
                let container = dispatcher.build(&filter, "filter_0", restriction).unwrap();
                for dialect in [Dialect::MySql, Dialect::Postgres] {
                    let (sql, _) = container.render(dialect);
                    assert_parses(&sql, dialect);
                }
            }
        }
    }
}

#[test]
fn test_spliced_segment_parses() {
    let catalog = catalog(FieldTypeRegistry::with_prefix("mt_"));
    let dispatcher = SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
        &catalog,
        DepthLimit::new(2).unwrap(),
    ));
    let mut outer = SegmentQuery::new(
        Query::new()
            .select(vec![table_col("l", "id")])
            .from(TableRef::new("mt_leads").with_alias("l")),
    );

    for (k, (field, operator, value)) in filters().into_iter().enumerate() {
        let filter =
            SegmentFilter::try_from(RawSegmentFilter::new(field, CUSTOM_OBJECT, operator, value))
                .unwrap();
        dispatcher
            .apply(
                &filter,
                &mut outer,
                "l",
                &format!("filter_{}", k),
                ContactRestriction::AllContacts,
            )
            .unwrap();
    }

    for dialect in [Dialect::MySql, Dialect::Postgres] {
        let (sql, params) = outer.render(dialect);
        assert!(sql.contains("mt_custom_item_xref_contact"));
        assert!(!params.is_empty());
        assert_parses(&sql, dialect);
    }
}
