use crate::{
    error::{ApiError, Result},
    specifier::Specifier,
};
use std::{collections::HashMap, fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Group,
    Database,
    Field,
    User,
    Team,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Group => "group",
            ElementKind::Database => "database",
            ElementKind::Field => "field",
            ElementKind::User => "user",
            ElementKind::Team => "team",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A schema object addressable by id, name, label or dotted path.
pub trait Element {
    const KIND: ElementKind;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn label(&self) -> &str;

    /// Human-readable dotted path. Not a stable identifier.
    fn specifier(&self) -> String {
        self.name().to_string()
    }

    fn handle(&self) -> ElementHandle {
        ElementHandle {
            kind: Self::KIND,
            id: self.id(),
            name: self.name().to_string(),
            path: self.specifier(),
        }
    }
}

/// Detached snapshot of an element, held by AST nodes that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub kind: ElementKind,
    pub id: i64,
    pub name: String,
    pub path: String,
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Indexed collection of elements.
///
/// Name, label and path lookups are case-insensitive; the first element
/// registered under a key wins.
#[derive(Debug, Clone)]
pub struct ElementSet<T> {
    values: Vec<Arc<T>>,
    ids: HashMap<i64, usize>,
    names: HashMap<String, usize>,
    labels: HashMap<String, usize>,
    paths: HashMap<String, usize>,
}

impl<T> Default for ElementSet<T> {
    fn default() -> Self {
        ElementSet {
            values: Vec::new(),
            ids: HashMap::new(),
            names: HashMap::new(),
            labels: HashMap::new(),
            paths: HashMap::new(),
        }
    }
}

impl<T: Element> ElementSet<T> {
    pub fn new(values: impl IntoIterator<Item = Arc<T>>) -> Self {
        let mut set = ElementSet::default();
        for value in values {
            set.push(value);
        }
        set
    }

    fn push(&mut self, value: Arc<T>) {
        let index = self.values.len();
        self.ids.entry(value.id()).or_insert(index);
        self.names
            .entry(value.name().to_lowercase())
            .or_insert(index);
        self.labels
            .entry(value.label().to_lowercase())
            .or_insert(index);
        self.paths
            .entry(value.specifier().to_lowercase())
            .or_insert(index);
        self.values.push(value);
    }

    pub fn values(&self) -> &[Arc<T>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn find(&self, spec: &Specifier) -> Option<&Arc<T>> {
        let index = match spec {
            Specifier::Id(id) => self.ids.get(id),
            Specifier::Name(name) => {
                let key = name.trim().to_lowercase();
                self.names
                    .get(&key)
                    .or_else(|| self.labels.get(&key))
                    .or_else(|| self.paths.get(&key))
            }
        };
        index.map(|&i| &self.values[i])
    }

    pub fn get(&self, spec: &Specifier) -> Result<&Arc<T>> {
        self.find(spec)
            .ok_or_else(|| ApiError::not_found(T::KIND.as_str(), spec))
    }

    /// Resolves every specifier that matches, skipping misses.
    pub fn find_all(&self, specs: &[Specifier]) -> Vec<&Arc<T>> {
        specs.iter().filter_map(|s| self.find(s)).collect()
    }

    /// Resolves a wire specifier (number or non-empty string).
    pub fn parse(&self, json: &serde_json::Value) -> Result<&Arc<T>> {
        let spec = Specifier::from_json(json)?;
        self.get(&spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Widget {
        id: i64,
        name: &'static str,
        label: &'static str,
    }

    impl Element for Widget {
        const KIND: ElementKind = ElementKind::Field;

        fn id(&self) -> i64 {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }

        fn label(&self) -> &str {
            self.label
        }

        fn specifier(&self) -> String {
            format!("shop.{}", self.name)
        }
    }

    fn widgets() -> ElementSet<Widget> {
        ElementSet::new([
            Arc::new(Widget {
                id: 1,
                name: "price",
                label: "Unit Price",
            }),
            Arc::new(Widget {
                id: 2,
                name: "qty",
                label: "Quantity",
            }),
        ])
    }

    #[test]
    fn test_lookup_by_id_name_label_and_path() {
        let set = widgets();
        assert_eq!(set.get(&Specifier::Id(2)).unwrap().name, "qty");
        assert_eq!(set.get(&"PRICE".into()).unwrap().id, 1);
        assert_eq!(set.get(&"unit price".into()).unwrap().id, 1);
        assert_eq!(set.get(&"shop.qty".into()).unwrap().id, 2);
    }

    #[test]
    fn test_missing_element() {
        let set = widgets();
        assert!(set.find(&Specifier::Id(9)).is_none());
        assert!(matches!(
            set.get(&"tax".into()),
            Err(ApiError::NotFound { kind: "field", .. })
        ));
        let found = set.find_all(&[Specifier::Id(2), "tax".into(), "price".into()]);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_parse_wire_specifier() {
        let set = widgets();
        assert_eq!(set.parse(&serde_json::json!(1)).unwrap().name, "price");
        assert!(set.parse(&serde_json::json!("")).is_err());
        assert!(set.parse(&serde_json::json!(true)).is_err());
    }

    #[test]
    fn test_handle_snapshot() {
        let handle = widgets().values()[0].handle();
        assert_eq!(handle.kind, ElementKind::Field);
        assert_eq!(handle.path, "shop.price");
        assert_eq!(handle.to_string(), "shop.price");
    }
}
