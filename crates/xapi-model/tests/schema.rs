//! Schema context tests
//!
//! These tests build a context from its JSON description and check element
//! lookups and specifier resolution against live elements.

use serde_json::json;
use tracing_test::traced_test;
use xapi_model::{
    ApiError, Reference, Specifier,
    schema::{ApiContext, Element, SchemaContext},
    to_specifier,
};

fn context() -> SchemaContext {
    SchemaContext::from_json(&json!({
        "groups": [{
            "group_id": 1,
            "name": "sales",
            "label": "Sales",
            "databases": [{
                "database_id": 100,
                "name": "orders",
                "label": "Orders",
                "format": "{number}",
                "fields": [
                    {"field_id": 1000, "name": "number", "type": "asciistring(16)", "key": true},
                    {"field_id": 1001, "name": "total", "type": "float(8)"},
                    {"field_id": 1002, "name": "status", "type": "request_status"}
                ],
                "databases": [{
                    "database_id": 101,
                    "name": "lines",
                    "fields": [{"field_id": 1010, "name": "qty", "type": "int(4)"}]
                }]
            }],
            "groups": [{
                "group_id": 2,
                "name": "archive",
                "databases": [{"database_id": 200, "name": "orders"}]
            }]
        }],
        "users": [{"user_id": 7, "name": "ada", "label": "Ada Lovelace"}],
        "teams": [{"team_id": 3, "name": "ops"}]
    }))
    .unwrap()
}

#[traced_test]
#[test]
fn test_databases_are_flattened() {
    let ctx = context();
    assert_eq!(ctx.databases().len(), 3);
    assert_eq!(ctx.database(&Specifier::Id(101)).unwrap().path(), "sales.orders.lines");
    assert_eq!(
        ctx.database(&"sales.archive.orders".into()).unwrap().id(),
        200
    );
}

#[test]
fn test_first_registered_name_wins() {
    let ctx = context();
    assert_eq!(ctx.database(&"orders".into()).unwrap().id(), 100);
}

#[test]
fn test_missing_database() {
    let ctx = context();
    assert!(matches!(
        ctx.database(&Specifier::Id(999)),
        Err(ApiError::NotFound {
            kind: "database",
            ..
        })
    ));
}

#[test]
fn test_field_lookup() {
    let ctx = context();
    let status = ctx.field(&Specifier::Id(100), &"Status".into()).unwrap();
    assert_eq!(status.type_name(), "request_status");
    assert_eq!(status.database().path, "sales.orders");
}

#[test]
fn test_users_and_teams() {
    let ctx = context();
    assert_eq!(ctx.users().get(&"ada lovelace".into()).unwrap().id(), 7);
    assert_eq!(ctx.teams().get(&Specifier::Id(3)).unwrap().label(), "ops");
    assert_eq!(ctx.groups().get(&"sales".into()).unwrap().groups().len(), 1);
}

#[test]
fn test_live_element_specifiers() {
    let ctx = context();
    let lines = ctx.database(&Specifier::Id(101)).unwrap();
    let reference = Reference::from(&*lines);
    assert_eq!(to_specifier(Some(&reference), false).unwrap(), Specifier::Id(101));
    assert_eq!(
        to_specifier(Some(&reference), true).unwrap(),
        Specifier::Name("sales.orders.lines".into())
    );
}

#[test]
fn test_invalid_schema_json() {
    assert!(matches!(
        SchemaContext::from_json(&json!({"groups": [{"name": "no id"}]})),
        Err(ApiError::Parse { .. })
    ));
}
