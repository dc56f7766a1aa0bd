use crate::error::{ApiError, Result};
use serde_json::{Map, Value as JsonValue};

/// A database record as returned by the server: `{"$id": 1, "<field>": ...}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub id: i64,
    pub values: Map<String, JsonValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Record {
            id,
            values: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let object = json
            .as_object()
            .ok_or_else(|| ApiError::parse("record", json, "not an object"))?;
        let id = object
            .get("$id")
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| ApiError::parse("record", json, "missing $id"))?;
        let values = object
            .iter()
            .filter(|(k, _)| k.as_str() != "$id")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Record { id, values })
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let record = Record::from_json(&json!({"$id": 3, "name": "Ada"})).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.get("name"), Some(&json!("Ada")));
        assert!(record.get("$id").is_none());
    }

    #[test]
    fn test_from_json_requires_id() {
        assert!(Record::from_json(&json!({"name": "Ada"})).is_err());
        assert!(Record::from_json(&json!([1])).is_err());
    }
}
