use crate::{
    error::{ApiError, Result},
    schema::{
        element::{Element, ElementHandle},
        record::Record,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Wire form of a schema reference: a numeric id or a name/path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Specifier {
    Id(i64),
    Name(String),
}

impl Specifier {
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Specifier::Id)
                .ok_or_else(|| ApiError::Specifier(format!("not an integer id: {n}"))),
            serde_json::Value::String(s) if !s.trim().is_empty() => {
                Ok(Specifier::Name(s.clone()))
            }
            other => Err(ApiError::Specifier(format!(
                "expected an id or a name, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Specifier::Id(id) => serde_json::Value::from(*id),
            Specifier::Name(name) => serde_json::Value::String(name.clone()),
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Id(id) => write!(f, "{id}"),
            Specifier::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<i64> for Specifier {
    fn from(id: i64) -> Self {
        Specifier::Id(id)
    }
}

impl From<&str> for Specifier {
    fn from(name: &str) -> Self {
        Specifier::Name(name.to_string())
    }
}

impl From<String> for Specifier {
    fn from(name: String) -> Self {
        Specifier::Name(name)
    }
}

/// Anything that can stand in for a schema element in a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Id(i64),
    Name(String),
    /// A record, addressed by its record id.
    Record(i64),
    Element(ElementHandle),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Id(id) | Reference::Record(id) => write!(f, "{id}"),
            Reference::Name(name) => write!(f, "{name}"),
            Reference::Element(handle) => write!(f, "{handle}"),
        }
    }
}

impl From<i64> for Reference {
    fn from(id: i64) -> Self {
        Reference::Id(id)
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Name(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Name(name)
    }
}

impl From<ElementHandle> for Reference {
    fn from(handle: ElementHandle) -> Self {
        Reference::Element(handle)
    }
}

impl From<&Record> for Reference {
    fn from(record: &Record) -> Self {
        Reference::Record(record.id)
    }
}

impl<T: Element> From<&T> for Reference {
    fn from(element: &T) -> Self {
        Reference::Element(element.handle())
    }
}

/// Resolves a reference to its wire specifier.
///
/// Pretty mode renders live elements as their dotted name path, which is
/// meant for debugging output only.
pub fn to_specifier(value: Option<&Reference>, pretty: bool) -> Result<Specifier> {
    match value {
        None => Err(ApiError::Specifier("value cannot be absent".to_string())),
        Some(Reference::Id(id)) | Some(Reference::Record(id)) => {
            if pretty {
                warn!(id, "No path available for a bare id; emitting the id");
            }
            Ok(Specifier::Id(*id))
        }
        Some(Reference::Name(name)) => {
            if name.trim().is_empty() {
                return Err(ApiError::Specifier("name cannot be empty".to_string()));
            }
            Ok(Specifier::Name(name.clone()))
        }
        Some(Reference::Element(handle)) if pretty => Ok(Specifier::Name(handle.path.clone())),
        Some(Reference::Element(handle)) => Ok(Specifier::Id(handle.id)),
    }
}

pub fn to_optional_specifier(value: Option<&Reference>, pretty: bool) -> Result<Option<Specifier>> {
    match value {
        None => Ok(None),
        some => to_specifier(some, pretty).map(Some),
    }
}

/// Validates a table, column or collation identifier.
pub fn to_identifier(value: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ApiError::Specifier("identifier cannot be empty".to_string()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::element::ElementKind;
    use serde_json::json;

    fn handle() -> ElementHandle {
        ElementHandle {
            kind: ElementKind::Database,
            id: 7,
            name: "orders".to_string(),
            path: "sales.orders".to_string(),
        }
    }

    #[test]
    fn test_to_specifier_cases() {
        assert_eq!(
            to_specifier(Some(&Reference::Id(5)), false).unwrap(),
            Specifier::Id(5)
        );
        assert_eq!(
            to_specifier(Some(&"orders".into()), true).unwrap(),
            Specifier::Name("orders".into())
        );
        assert_eq!(
            to_specifier(Some(&Reference::Record(42)), false).unwrap(),
            Specifier::Id(42)
        );
        let element = Reference::Element(handle());
        assert_eq!(to_specifier(Some(&element), false).unwrap(), Specifier::Id(7));
        assert_eq!(
            to_specifier(Some(&element), true).unwrap(),
            Specifier::Name("sales.orders".into())
        );
    }

    #[test]
    fn test_to_specifier_rejects_absent_and_empty() {
        assert!(matches!(to_specifier(None, false), Err(ApiError::Specifier(_))));
        assert!(matches!(
            to_specifier(Some(&"  ".into()), false),
            Err(ApiError::Specifier(_))
        ));
        assert_eq!(to_optional_specifier(None, false).unwrap(), None);
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("record").unwrap(), "record");
        assert!(to_identifier("").is_err());
    }

    #[test]
    fn test_specifier_wire_form() {
        assert_eq!(Specifier::from_json(&json!(3)).unwrap(), Specifier::Id(3));
        assert_eq!(
            Specifier::from_json(&json!("a.b")).unwrap(),
            Specifier::Name("a.b".into())
        );
        assert!(Specifier::from_json(&json!(1.5)).is_err());
        assert!(Specifier::from_json(&json!(null)).is_err());
        assert_eq!(Specifier::Id(3).to_json(), json!(3));
        assert_eq!(serde_json::to_value(Specifier::from("x")).unwrap(), json!("x"));
    }
}
