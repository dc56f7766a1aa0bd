//! JSON readers and writers shared by every component.

use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use xapi_model::{
    ApiError, Result, Specifier,
    schema::{ApiContext, Database},
};

pub(crate) type JsonObject = Map<String, JsonValue>;

pub(crate) fn object<'a>(json: &'a JsonValue, expected: &str) -> Result<&'a JsonObject> {
    json.as_object()
        .ok_or_else(|| ApiError::parse(expected, json, "not an object"))
}

/// A key that is present and not `null`.
pub(crate) fn field<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a JsonValue> {
    obj.get(key).filter(|v| !v.is_null())
}

pub(crate) fn required<'a>(obj: &'a JsonObject, key: &str, expected: &str) -> Result<&'a JsonValue> {
    field(obj, key).ok_or_else(|| ApiError::parse(expected, key, "missing field"))
}

pub(crate) fn string(obj: &JsonObject, key: &str, expected: &str) -> Result<String> {
    required(obj, key, expected)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ApiError::parse(expected, key, "expected a string"))
}

pub(crate) fn optional_string(obj: &JsonObject, key: &str, expected: &str) -> Result<Option<String>> {
    match field(obj, key) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ApiError::parse(expected, key, "expected a string")),
    }
}

/// Scalars are coerced to their text form.
pub(crate) fn text(obj: &JsonObject, key: &str, expected: &str) -> Result<String> {
    match required(obj, key, expected)? {
        JsonValue::String(s) => Ok(s.clone()),
        v @ (JsonValue::Number(_) | JsonValue::Bool(_)) => Ok(v.to_string()),
        _ => Err(ApiError::parse(expected, key, "expected a scalar")),
    }
}

pub(crate) fn array<'a>(obj: &'a JsonObject, key: &str, expected: &str) -> Result<&'a [JsonValue]> {
    required(obj, key, expected)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::parse(expected, key, "expected an array"))
}

/// A missing key reads as an empty array.
pub(crate) fn optional_array<'a>(
    obj: &'a JsonObject,
    key: &str,
    expected: &str,
) -> Result<&'a [JsonValue]> {
    match field(obj, key) {
        None => Ok(&[]),
        Some(_) => array(obj, key, expected),
    }
}

/// Loose truthiness: `false`, `0`, `""` and absent keys are false.
pub(crate) fn flag(obj: &JsonObject, key: &str) -> bool {
    match field(obj, key) {
        None => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

pub(crate) fn database(
    obj: &JsonObject,
    key: &str,
    ctx: &dyn ApiContext,
) -> Result<Arc<Database>> {
    let spec = Specifier::from_json(required(obj, key, "database")?)?;
    ctx.database(&spec)
}

/// Ordered JSON object under construction; absent values are never written.
#[derive(Debug, Default)]
pub(crate) struct WireObject(JsonObject);

impl WireObject {
    pub(crate) fn new() -> Self {
        WireObject(Map::new())
    }

    pub(crate) fn tagged(tag: &str) -> Self {
        WireObject::new().put("type", tag)
    }

    pub(crate) fn put(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn put_opt<V: Into<JsonValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.put(key, v),
            None => self,
        }
    }

    /// Empty lists are omitted.
    pub(crate) fn put_list(self, key: &str, values: Vec<JsonValue>) -> Self {
        if values.is_empty() {
            self
        } else {
            self.put(key, values)
        }
    }

    pub(crate) fn build(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_object_omits_absent_values() {
        let built = WireObject::tagged("x")
            .put_opt::<bool>("a", None)
            .put_list("b", vec![])
            .put_opt("c", Some(1))
            .build();
        assert_eq!(built, json!({"type": "x", "c": 1}));
    }

    #[test]
    fn test_readers() {
        let json = json!({"s": "v", "n": 2, "z": null, "l": [1], "f": 0});
        let obj = object(&json, "test").unwrap();
        assert_eq!(string(obj, "s", "test").unwrap(), "v");
        assert!(string(obj, "n", "test").is_err());
        assert_eq!(text(obj, "n", "test").unwrap(), "2");
        assert!(required(obj, "z", "test").is_err());
        assert_eq!(optional_string(obj, "z", "test").unwrap(), None);
        assert_eq!(optional_array(obj, "missing", "test").unwrap().len(), 0);
        assert_eq!(array(obj, "l", "test").unwrap().len(), 1);
        assert!(!flag(obj, "f"));
        assert!(flag(obj, "s"));
    }
}
