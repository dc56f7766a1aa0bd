use serde_json::{Value as JsonValue, json};
use xapi_model::schema::SchemaContext;

pub fn context() -> SchemaContext {
    SchemaContext::from_json(&json!({
        "groups": [{
            "group_id": 1,
            "name": "sales",
            "databases": [{
                "database_id": 100,
                "name": "orders",
                "fields": [
                    {"field_id": 1000, "name": "number", "type": "asciistring(16)", "key": true},
                    {"field_id": 1001, "name": "total", "type": "float(8)"},
                    {"field_id": 1002, "name": "customer", "type": "utf8string(64)"}
                ],
                "databases": [{
                    "database_id": 101,
                    "name": "lines",
                    "fields": [
                        {"field_id": 1010, "name": "order_number", "type": "asciistring(16)"},
                        {"field_id": 1011, "name": "qty", "type": "int(4)"}
                    ]
                }]
            }]
        }]
    }))
    .expect("fixture schema")
}

/// Fails when any value in the tree is `null`.
pub fn assert_no_nulls(json: &JsonValue) {
    match json {
        JsonValue::Null => panic!("null in built JSON"),
        JsonValue::Array(items) => items.iter().for_each(assert_no_nulls),
        JsonValue::Object(map) => map.values().for_each(assert_no_nulls),
        _ => {}
    }
}
