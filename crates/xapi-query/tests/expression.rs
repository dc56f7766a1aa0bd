//! Expression round-trip tests
//!
//! Every expression variant is built, loaded back against a schema context
//! and rebuilt; the two wire forms must match and never contain `null`.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::{assert_no_nulls, context};
use serde_json::json;
use tracing_test::traced_test;
use xapi_model::{ApiError, Specifier, schema::ApiContext};
use xapi_query::{
    ApiComponent, CaseBranch, Expression, GroupConcat, IntoExpression, OrderTerm, SearchTerm,
    Select, Source,
    operator::{CompoundOperator, SearchOperator},
    table::{DatabaseTable, SystemTable},
};

fn samples() -> Vec<Expression> {
    let ctx = context();
    let orders = ctx.database(&Specifier::Id(100)).unwrap();
    let total = orders.field(&"total".into()).unwrap().clone();
    let sub = Select::builder()
        .column(Expression::count_rows())
        .from(Source::system(SystemTable::Task))
        .build();

    vec![
        Expression::null(),
        Expression::int(0),
        Expression::float(2.5),
        Expression::string("text"),
        Expression::datetime(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
        Expression::local_datetime(
            NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_milli_opt(7, 8, 9, 250)
                .unwrap(),
        ),
        Expression::alias_ref("a"),
        Expression::alias_ref("a").between(1, 10),
        Expression::alias_ref("a").like("%x%"),
        Expression::case(
            vec![CaseBranch::new(1, "one"), CaseBranch::new(2, "two")],
            Some(Expression::alias_ref("n")),
            Some(Expression::string("many")),
        ),
        Expression::alias_ref("name").collate("utf8_bin"),
        Expression::column(SystemTable::User, "name"),
        Expression::database_column(100_i64, DatabaseTable::Trash, "number"),
        total.clone().into_expression(),
        Expression::compound(
            CompoundOperator::Or,
            [Expression::alias_ref("a"), Expression::alias_ref("b")],
        ),
        Expression::count_rows(),
        Expression::exists(sub.clone()),
        Expression::function("lower", ["X"]),
        Expression::group_concat(
            GroupConcat::new([Expression::alias_ref("a")])
                .with_separator(",")
                .add_order_by(OrderTerm::asc(Expression::alias_ref("a"))),
        ),
        Expression::alias_ref("a").in_list([1, 2, 3]),
        Expression::alias_ref("a").in_select(sub.clone()),
        Expression::alias_ref("a").is_null(),
        Expression::search(
            SearchTerm::field(&*orders, "customer", SearchOperator::StartsWith)
                .with_value("Ada")
                .with_case_sensitive(true),
        ),
        Expression::search(SearchTerm::parameter(100_i64, "q", SearchOperator::IsNotNull)),
        sub.to_expression(),
        -Expression::alias_ref("a"),
        Expression::alias_ref("a").bit_invert(),
        Expression::alias_ref("a") << 2,
    ]
}

#[traced_test]
#[test]
fn test_every_variant_round_trips() {
    let ctx = context();
    for e in samples() {
        assert!(e.is_valid(), "{e} should be valid");
        let built = e.build(false).unwrap();
        assert_no_nulls(&built);
        let loaded = Expression::load(&built, &ctx).unwrap();
        assert_eq!(loaded.build(false).unwrap(), built, "{e}");
    }
}

#[test]
fn test_field_column_resolves_to_id_or_path() {
    let ctx = context();
    let total = ctx.field(&"sales.orders".into(), &"total".into()).unwrap();
    let e = total.into_expression();
    assert_eq!(
        e.build(false).unwrap(),
        json!({"type": "col", "table": "record", "column": "total", "database": 100})
    );
    assert_eq!(
        e.build(true).unwrap(),
        json!({"type": "col", "table": "record", "column": "total", "database": "sales.orders"})
    );
    assert_eq!(e.to_string(), "`sales.orders`.`record`.`total`");
}

#[test]
fn test_search_resolves_field_through_database() {
    let ctx = context();
    let json = json!({
        "type": "search",
        "database": "sales.orders.lines",
        "search": 1011,
        "op": ">",
        "value": "3",
        "cs": 0
    });
    let e = Expression::load(&json, &ctx).unwrap();
    assert_eq!(
        e.build(false).unwrap(),
        json!({
            "type": "search",
            "database": 101,
            "search": "qty",
            "op": ">",
            "value": "3",
            "cs": false
        })
    );
    assert_eq!(e.to_string(), "`qty` > \"3\"");

    let missing = json!({"type": "search", "database": 101, "search": "nope", "op": "="});
    assert!(matches!(
        Expression::load(&missing, &ctx),
        Err(ApiError::NotFound { kind: "field", .. })
    ));
}

#[test]
fn test_validity_propagates_upwards() {
    let broken = Expression::string("");
    assert!(!broken.is_valid());
    assert!(!Expression::alias_ref("a").equal(broken.clone()).is_valid());
    assert!(!Expression::alias_ref("a").in_list([broken.clone()]).is_valid());
    assert!(!Expression::function("f", [broken.clone()]).is_valid());
    assert!(!(!broken).is_valid());
}

#[test]
fn test_clone_is_independent() {
    let original = Expression::alias_ref("a").plus(1);
    let mut copy = original.clone();
    if let xapi_query::ExpressionKind::Binary { right, .. } = &mut copy.kind {
        **right = Expression::int(2);
    }
    assert_eq!(original.to_string(), "(`a`) + (1)");
    assert_eq!(copy.to_string(), "(`a`) + (2)");
}

#[test]
fn test_missing_required_field_fails() {
    let ctx = context();
    let err = Expression::load(&json!({"type": "between", "e": 1, "min": 0}), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Parse { .. }));
    let err = Expression::load(&json!({"value": 1}), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Parse { .. }));
    let err = Expression::load(&json!({"type": "dt", "value": "yesterday"}), &ctx).unwrap_err();
    assert!(matches!(err, ApiError::Parse { .. }));
}

#[test]
fn test_column_database_must_exist() {
    let ctx = context();
    let json = json!({"type": "col", "table": "record", "column": "total", "database": "sales.orders"});
    let e = Expression::load(&json, &ctx).unwrap();
    assert_eq!(e.build(false).unwrap()["database"], json!(100));

    let unknown = json!({"type": "col", "table": "record", "column": "x", "database": "no.such.db"});
    assert!(matches!(
        Expression::load(&unknown, &ctx),
        Err(ApiError::NotFound { kind: "database", .. })
    ));
}
