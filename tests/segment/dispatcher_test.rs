//! Segment definitions parsed from JSON and attached to a contact query.

use custom_objects::metadata::{Catalog, FieldTypeRegistry};
use custom_objects::query::{AliasScope, CustomFieldQueryCompiler, DepthLimit, QueryError};
use custom_objects::segment::{
    ContactRestriction, Glue, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher,
    SegmentQuery,
};
use custom_objects::sql::{table_col, Dialect, ParamValue, Query, TableRef};

const CATALOG: &str = r#"
[[objects]]
id = 1
alias = "product"
name_singular = "Product"

[[objects.fields]]
id = 10
label = "Price"
alias = "price"
type = "int"

[[objects.fields]]
id = 11
label = "Colour"
alias = "colour"
type = "select"

[[objects.fields]]
id = 12
label = "Weight"
alias = "weight"
type = "float"
"#;

const SEGMENT: &str = r#"[
    {"glue": "and", "field": "cmf_10", "object": "custom_object", "type": "int", "operator": "gt", "filter": "100"},
    {"glue": "and", "field": "cmf_12", "object": "custom_object", "type": "float", "operator": "eq", "filter": 1},
    {"glue": "or", "field": "cmf_11", "object": "custom_object", "type": "select", "operator": "!in", "filter": ["red", "blue"]},
    {"glue": "and", "field": "email", "object": "lead", "type": "email", "operator": "like", "filter": "%@x.org"},
    {"glue": "and", "field": "cmo_1", "object": "custom_object", "type": "text", "operator": "startsWith", "filter": "Desk"}
]"#;

fn catalog() -> Catalog {
    Catalog::from_toml_str(CATALOG, FieldTypeRegistry::default()).unwrap()
}

fn leads() -> SegmentQuery {
    SegmentQuery::new(
        Query::new()
            .select(vec![table_col("l", "id")])
            .from(TableRef::new("leads").with_alias("l")),
    )
}

fn segment() -> Vec<RawSegmentFilter> {
    serde_json::from_str(SEGMENT).unwrap()
}

#[test]
fn test_segment_json_routing() {
    let filters: Vec<SegmentFilter> = segment()
        .iter()
        .map(|raw| SegmentFilter::try_from(raw).unwrap())
        .collect();

    assert!(matches!(filters[0], SegmentFilter::CustomField { glue: Glue::And, .. }));
    assert!(matches!(filters[2], SegmentFilter::CustomField { glue: Glue::Or, .. }));
    assert!(filters[2].is_negative());
    assert!(matches!(filters[3], SegmentFilter::Native(_)));
    assert!(matches!(filters[4], SegmentFilter::CustomItem { .. }));
}

#[test]
fn test_failed_filter_does_not_abort_siblings() {
    let catalog = catalog();
    let dispatcher = SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
        &catalog,
        DepthLimit::new(2).unwrap(),
    ));
    let mut outer = leads();
    let mut errors = Vec::new();

    for (k, raw) in segment().iter().enumerate() {
        let result = SegmentFilter::try_from(raw).and_then(|filter| {
            dispatcher.apply(
                &filter,
                &mut outer,
                "l",
                &format!("filter_{}", k),
                ContactRestriction::AllContacts,
            )
        });
        if let Err(e) = result {
            errors.push((k, e));
        }
    }

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], (1, QueryError::UnsupportedFieldType("float".into())));
    assert!(matches!(errors[1], (3, QueryError::InvalidSegmentFilter(_))));
    assert_eq!(outer.condition_count(), 3);

    let (sql, params) = outer.render(Dialect::MySql);
    assert!(sql.starts_with("SELECT l.id FROM leads l WHERE l.id IN (SELECT filter_0_union.contact_id"));
    assert!(sql.contains(" OR l.id NOT IN (SELECT filter_2_union.contact_id"));
    assert!(sql.contains(" AND l.id IN (SELECT filter_4_union.contact_id"));
    assert!(!sql.contains("filter_1"));
    assert!(!sql.contains("filter_3"));

    assert_eq!(params.get("filter_0_value"), Some(&ParamValue::Int(100)));
    assert_eq!(params.get("filter_0_1_value"), Some(&ParamValue::Int(100)));
    assert_eq!(params.get("filter_2_value_0"), Some(&ParamValue::String("red".into())));
    assert_eq!(params.get("filter_2_value_1"), Some(&ParamValue::String("blue".into())));
    assert_eq!(params.get("filter_4_custom_object_id"), Some(&ParamValue::Int(1)));
    assert_eq!(params.get("filter_4_name"), Some(&ParamValue::String("Desk%".into())));
}

#[test]
fn test_fragment_aliases_stay_inside_their_filter() {
    let catalog = catalog();
    let dispatcher = SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
        &catalog,
        DepthLimit::new(3).unwrap(),
    ));
    let filter = SegmentFilter::try_from(&segment()[0]).unwrap();

    let container = dispatcher
        .build(&filter, "filter_0", ContactRestriction::AllContacts)
        .unwrap();
    let aliases: Vec<&str> = container.fragments().iter().map(|f| f.alias.as_str()).collect();

    assert_eq!(
        aliases,
        vec![
            "filter_0",
            "filter_0_1",
            "filter_0_2",
            "filter_0_3",
            "filter_0_4",
            "filter_0_5",
            "filter_0_6"
        ]
    );
}

#[test]
fn test_shared_scope_reuses_seed() {
    let catalog = catalog();
    let compiler = CustomFieldQueryCompiler::new(&catalog, DepthLimit::new(2).unwrap())
        .with_alias_scope(AliasScope::Shared);
    let dispatcher = SegmentFilterDispatcher::new(compiler);
    let filter = SegmentFilter::try_from(&segment()[0]).unwrap();

    let container = dispatcher
        .build(&filter, "f", ContactRestriction::AllContacts)
        .unwrap();

    assert_eq!(container.count(), 3);
    assert!(container.fragments().iter().all(|f| f.alias == "f"));
    assert_eq!(container.parameters().len(), 2);
}

#[test]
fn test_single_contact_restriction() {
    let catalog = catalog();
    let dispatcher = SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
        &catalog,
        DepthLimit::DIRECT,
    ));
    let filter = SegmentFilter::try_from(&segment()[4]).unwrap();

    let container = dispatcher
        .build(&filter, "f", ContactRestriction::Contact(42))
        .unwrap();
    let (sql, params) = container.render(Dialect::MySql);

    assert_eq!(
        sql,
        "SELECT contact_id FROM custom_item f_item \
         INNER JOIN custom_item_xref_contact f_contact ON f_item.id = f_contact.custom_item_id \
         WHERE f_item.custom_object_id = :f_custom_object_id AND f_item.name LIKE :f_name ESCAPE '!' \
         AND f_contact.contact_id = :f_contact_id"
    );
    assert_eq!(params.get("f_contact_id"), Some(&ParamValue::Int(42)));
}
