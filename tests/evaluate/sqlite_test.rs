//! Compiled filters executed against an in-memory SQLite database.
//!
//! Fixture (items are products, field 10 is `price`):
//!
//! ```text
//! item 1 (price 100) ── contact 10
//! item 2 (price 50)  ── item 5 ── contact 20        value on the lower side
//! item 7 (price 70)  ── item 3 ── contact 30        value on the higher side
//! item 8 (price 80)  ── item 9 ── item 4 ── contact 40
//! contact 99 has no items
//! ```
//!
//! Field 11 is `description`: `red lamp` on item 1, blank on item 2,
//! `50% off` on item 3.

use custom_objects::config::Settings;
use custom_objects::evaluate::{ContactFilterEvaluator, Evaluation, QueryExecutor, SqliteExecutor};
use custom_objects::metadata::{Catalog, FieldTypeRegistry};
use custom_objects::model::{CustomField, CustomObject, Operator};
use custom_objects::query::{CustomFieldQueryCompiler, DepthLimit, FieldFilter, ValueCondition};
use custom_objects::segment::{
    ContactRestriction, Glue, RawSegmentFilter, SegmentFilter, SegmentFilterDispatcher,
    SegmentQuery, CUSTOM_OBJECT,
};
use custom_objects::sql::{table_col, Dialect, Query, TableRef};
use serde_json::json;

const FIXTURE: &str = "
INSERT INTO custom_item (id, custom_object_id, name) VALUES
    (1, 1, 'Lamp'), (2, 1, 'Desk'), (3, 1, 'Chair'), (4, 1, 'Shelf'),
    (5, 1, 'Rug'), (7, 1, 'Sofa'), (8, 1, 'Bed'), (9, 1, 'Mirror');
INSERT INTO custom_field_value_int (custom_item_id, custom_field_id, value) VALUES
    (1, 10, 100), (2, 10, 50), (7, 10, 70), (8, 10, 80);
INSERT INTO custom_field_value_text (custom_item_id, custom_field_id, value) VALUES
    (1, 11, 'red lamp'), (2, 11, ''), (3, 11, '50% off');
INSERT INTO custom_item_xref_custom_item (custom_item_id_lower, custom_item_id_higher) VALUES
    (2, 5), (3, 7), (8, 9), (4, 9);
INSERT INTO custom_item_xref_contact (custom_item_id, contact_id) VALUES
    (1, 10), (5, 20), (3, 30), (4, 40);
CREATE TABLE leads (id INTEGER PRIMARY KEY);
INSERT INTO leads (id) VALUES (10), (20), (30), (40), (99);
";

fn executor() -> SqliteExecutor {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor.connection().execute_batch(FIXTURE).unwrap();
    executor
}

fn catalog() -> Catalog {
    let object = CustomObject::new(1, "product", "Product")
        .with_field(CustomField::new(10, "Price", "price", "int"))
        .with_field(CustomField::new(11, "Description", "description", "text"));
    Catalog::new(vec![object], FieldTypeRegistry::default()).unwrap()
}

fn dispatcher(catalog: &Catalog, depth: u32) -> SegmentFilterDispatcher<'_> {
    SegmentFilterDispatcher::new(CustomFieldQueryCompiler::new(
        catalog,
        DepthLimit::new(depth).unwrap(),
    ))
}

fn price(op: Operator, value: i64) -> SegmentFilter {
    SegmentFilter::CustomField {
        glue: Glue::And,
        filter: FieldFilter::new(10).with_condition(ValueCondition::new(op, value)),
    }
}

fn run(executor: &SqliteExecutor, sql: &str, params: &custom_objects::sql::Parameters) -> Vec<i64> {
    let mut ids = executor.contact_ids(sql, params).unwrap();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn matching(executor: &SqliteExecutor, depth: u32, filter: &SegmentFilter) -> Vec<i64> {
    let catalog = catalog();
    let container = dispatcher(&catalog, depth)
        .build(filter, "f", ContactRestriction::AllContacts)
        .unwrap();
    let (sql, params) = container.render(Dialect::MySql);
    run(executor, &sql, &params)
}

#[test]
fn test_depth_widens_reach() {
    let executor = executor();
    let filter = price(Operator::Gte, 50);

    assert_eq!(matching(&executor, 1, &filter), vec![10]);
    assert_eq!(matching(&executor, 2, &filter), vec![10, 20, 30]);
    assert_eq!(matching(&executor, 3, &filter), vec![10, 20, 30, 40]);
}

#[test]
fn test_value_condition_filters_rows() {
    let executor = executor();
    assert_eq!(matching(&executor, 3, &price(Operator::Eq, 50)), vec![20]);
    assert_eq!(matching(&executor, 3, &price(Operator::Lt, 75)), vec![20, 30]);
}

#[test]
fn test_text_operators() {
    let executor = executor();
    let contains = SegmentFilter::try_from(RawSegmentFilter::new(
        "cmf_11",
        CUSTOM_OBJECT,
        "contains",
        json!("lamp"),
    ))
    .unwrap();
    assert_eq!(matching(&executor, 2, &contains), vec![10]);

    let not_empty = SegmentFilter::try_from(RawSegmentFilter::new(
        "cmf_11",
        CUSTOM_OBJECT,
        "!empty",
        json!(null),
    ))
    .unwrap();
    assert_eq!(matching(&executor, 2, &not_empty), vec![10, 30]);
}

fn description(operator: &str, value: &str) -> SegmentFilter {
    SegmentFilter::try_from(RawSegmentFilter::new(
        "cmf_11",
        CUSTOM_OBJECT,
        operator,
        json!(value),
    ))
    .unwrap()
}

#[test]
fn test_wildcards_in_values_match_literally() {
    let executor = executor();

    assert_eq!(matching(&executor, 1, &description("contains", "50%")), vec![30]);
    assert_eq!(matching(&executor, 1, &description("startsWith", "50% off")), vec![30]);
    assert_eq!(matching(&executor, 1, &description("endsWith", "% off")), vec![30]);
    assert_eq!(matching(&executor, 1, &description("contains", "off")), vec![30]);

    // `_` and `%` are not wildcards here
    assert!(matching(&executor, 1, &description("contains", "0_")).is_empty());
    assert!(matching(&executor, 1, &description("startsWith", "%lamp")).is_empty());

    // `like` keeps the user's own wildcards
    assert_eq!(matching(&executor, 1, &description("like", "%lamp")), vec![10]);
}

#[test]
fn test_object_item_filter() {
    let executor = executor();
    let any_product = SegmentFilter::try_from(RawSegmentFilter::new(
        "cmo_1",
        CUSTOM_OBJECT,
        "!empty",
        json!(null),
    ))
    .unwrap();
    assert_eq!(matching(&executor, 1, &any_product), vec![10, 20, 30, 40]);

    let named = SegmentFilter::try_from(RawSegmentFilter::new(
        "cmo_1",
        CUSTOM_OBJECT,
        "eq",
        json!("Sofa"),
    ))
    .unwrap();
    assert_eq!(matching(&executor, 1, &named), Vec::<i64>::new());
    assert_eq!(matching(&executor, 2, &named), vec![30]);
}

#[test]
fn test_spliced_into_contact_query() {
    let executor = executor();
    let catalog = catalog();
    let dispatcher = dispatcher(&catalog, 3);
    let leads = || {
        SegmentQuery::new(
            Query::new()
                .select(vec![table_col("l", "id")])
                .from(TableRef::new("leads").with_alias("l")),
        )
    };

    let mut outer = leads();
    dispatcher
        .apply(&price(Operator::Gte, 60), &mut outer, "l", "a", ContactRestriction::AllContacts)
        .unwrap();
    let (sql, params) = outer.render(Dialect::MySql);
    assert_eq!(run(&executor, &sql, &params), vec![10, 30, 40]);

    // Contacts without any item match a negative filter too
    let mut outer = leads();
    dispatcher
        .apply(&price(Operator::Neq, 50), &mut outer, "l", "a", ContactRestriction::AllContacts)
        .unwrap();
    let (sql, params) = outer.render(Dialect::MySql);
    assert_eq!(run(&executor, &sql, &params), vec![10, 30, 40, 99]);

    // Two filters glued with OR
    let mut outer = leads();
    dispatcher
        .apply(&price(Operator::Eq, 100), &mut outer, "l", "a", ContactRestriction::AllContacts)
        .unwrap();
    let second = SegmentFilter::try_from(
        RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "eq", json!(80)).with_glue(Glue::Or),
    )
    .unwrap();
    dispatcher
        .apply(&second, &mut outer, "l", "b", ContactRestriction::AllContacts)
        .unwrap();
    let (sql, params) = outer.render(Dialect::MySql);
    assert_eq!(run(&executor, &sql, &params), vec![10, 40]);
}

#[test]
fn test_evaluator_matches_contact() {
    let executor = executor();
    let catalog = catalog();
    let evaluator = ContactFilterEvaluator::new(dispatcher(&catalog, 2));
    let filters = [RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "eq", json!(50))];

    assert_eq!(
        evaluator.evaluate(20, &filters, &executor).unwrap(),
        Evaluation {
            evaluated: true,
            matched: true
        }
    );
    assert_eq!(
        evaluator.evaluate(10, &filters, &executor).unwrap(),
        Evaluation {
            evaluated: true,
            matched: false
        }
    );
}

#[test]
fn test_evaluator_negative_filter() {
    let executor = executor();
    let catalog = catalog();
    let evaluator = ContactFilterEvaluator::new(dispatcher(&catalog, 2));
    let filters = [RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "neq", json!(50))];

    assert!(!evaluator.evaluate(20, &filters, &executor).unwrap().matched);
    assert!(evaluator.evaluate(99, &filters, &executor).unwrap().matched);
}

#[test]
fn test_evaluator_skips_bad_and_native_filters() {
    let executor = executor();
    let catalog = catalog();
    let evaluator = ContactFilterEvaluator::new(dispatcher(&catalog, 2));

    let filters = [
        RawSegmentFilter::new("email", "lead", "eq", json!("a@b.c")),
        RawSegmentFilter::new("cmf_404", CUSTOM_OBJECT, "eq", json!(1)),
        RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "like", json!("5%")),
        RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "gt", json!(90)),
    ];
    assert_eq!(
        evaluator.evaluate(10, &filters, &executor).unwrap(),
        Evaluation {
            evaluated: true,
            matched: true
        }
    );

    let only_native = [RawSegmentFilter::new("email", "lead", "eq", json!("a@b.c"))];
    assert_eq!(
        evaluator.evaluate(10, &only_native, &executor).unwrap(),
        Evaluation::default()
    );
}

#[test]
fn test_disabled_evaluator() {
    let executor = executor();
    let catalog = catalog();
    let settings = Settings::from_toml_str("[custom_objects]\nenabled = false").unwrap();
    let evaluator = ContactFilterEvaluator::new(dispatcher(&catalog, 2))
        .enabled(settings.custom_objects.enabled);
    let filters = [RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "eq", json!(50))];

    assert_eq!(
        evaluator.evaluate(20, &filters, &executor).unwrap(),
        Evaluation::default()
    );
}

#[test]
fn test_database_errors_propagate() {
    let executor = SqliteExecutor::new(rusqlite::Connection::open_in_memory().unwrap());
    let catalog = catalog();
    let evaluator = ContactFilterEvaluator::new(dispatcher(&catalog, 1));
    let filters = [RawSegmentFilter::new("cmf_10", CUSTOM_OBJECT, "eq", json!(50))];

    assert!(evaluator.evaluate(20, &filters, &executor).is_err());
}
