//! Select statement tests
//!
//! Covers joins over schema databases, union handling and the wire form of
//! result columns.

mod common;

use common::{assert_no_nulls, context};
use serde_json::json;
use xapi_model::{Specifier, schema::ApiContext};
use xapi_query::{
    ApiComponent, Expression, IntoExpression, IntoSource, ResultColumn, Select, Source,
    table::SystemTable,
};

fn order_lines() -> Select {
    let ctx = context();
    let orders = ctx.database(&Specifier::Id(100)).unwrap();
    let lines = ctx.database(&Specifier::Id(101)).unwrap();
    let number = orders.field(&"number".into()).unwrap().clone();
    let order_number = lines.field(&"order_number".into()).unwrap().clone();
    let qty = lines.field(&"qty".into()).unwrap().clone();

    Select::builder()
        .column(number.clone())
        .column(Expression::function("sum", [qty.clone()]).alias("items"))
        .from(
            orders
                .clone()
                .into_source()
                .with_alias("o")
                .left_join(lines.into_source().with_alias("l"))
                .on(order_number.into_expression().equal(number.clone())),
        )
        .where_clause(qty.into_expression().gt(0))
        .group_by(number)
        .having(Expression::alias_ref("items").gte(2))
        .order_by_desc(Expression::alias_ref("items"))
        .limit(20)
        .offset(40)
        .build()
}

#[test]
fn test_join_select_round_trips() {
    let ctx = context();
    let select = order_lines();
    assert!(select.is_valid());

    let built = select.build(false).unwrap();
    assert_no_nulls(&built);
    assert_eq!(
        built["from"]["s2"],
        json!({"type": "td", "alias": "l", "database": 101, "table": "record"})
    );

    let loaded = Select::load(&built, &ctx).unwrap();
    assert_eq!(loaded.build(false).unwrap(), built);
    assert!(loaded.is_valid());
}

#[test]
fn test_pretty_build_uses_paths() {
    let built = order_lines().build(true).unwrap();
    assert_eq!(built["from"]["s1"]["database"], json!("sales.orders"));
    assert_eq!(built["columns"][0]["e"]["database"], json!("sales.orders"));
}

#[test]
fn test_database_names_load_as_ids() {
    let ctx = context();
    let json = json!({
        "from": {"type": "table_database", "database": "sales.orders", "table": "record"}
    });
    let select = Select::load(&json, &ctx).unwrap();
    assert_eq!(
        select.build(false).unwrap(),
        json!({"distinct": false, "from": {"type": "td", "database": 100, "table": "record"}})
    );
}

#[test]
fn test_union_round_trip() {
    let ctx = context();
    let part = |table: SystemTable| {
        Select::builder()
            .column(Expression::column(table, "name"))
            .from(Source::system(table))
            .build()
    };
    let select = Select::builder()
        .union(part(SystemTable::User))
        .union(part(SystemTable::Team))
        .order_by_asc(1)
        .build();

    let built = select.build(false).unwrap();
    assert_eq!(built["union"].as_array().map(Vec::len), Some(2));
    let loaded = Select::load(&built, &ctx).unwrap();
    assert_eq!(loaded, select);
    assert!(loaded.is_valid());
}

#[test]
fn test_result_column_wire_form() {
    let column: ResultColumn = Expression::int(0).alias("a");
    assert_eq!(
        column.build(false).unwrap(),
        json!({"e": {"type": "number", "value": 0}, "alias": "a"})
    );
    assert_eq!(
        column.build(true).unwrap(),
        json!({"e": {"type": "number", "value": 0}, "alias": "a"})
    );
    assert!(ResultColumn::new(1).build(true).unwrap().get("alias").is_none());
}

#[test]
fn test_clone_is_independent() {
    let original = order_lines();
    let mut copy = original.clone();
    copy.limit = None;
    copy.columns.clear();
    assert_eq!(original.columns.len(), 2);
    assert!(original.limit.is_some());
}

#[test]
fn test_validate_error() {
    let mut select = order_lines();
    select.unions.push(Select::default());
    let err = select.validate().unwrap_err();
    assert!(err.to_string().starts_with("Validation failed for select"));
}
