use lazy_static::lazy_static;
use std::collections::HashMap;

/// One member of a closed, id-keyed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub id: i64,
    pub name: &'static str,
    pub label: String,
    pub style: &'static str,
}

/// A named enumeration with lookups by id and by case-insensitive name.
#[derive(Debug, PartialEq)]
pub struct EnumSet {
    name: &'static str,
    values: Vec<EnumValue>,
    ids: HashMap<i64, usize>,
    names: HashMap<String, usize>,
}

impl EnumSet {
    fn new(name: &'static str, entries: &[(i64, &'static str, &'static str)]) -> Self {
        let values: Vec<EnumValue> = entries
            .iter()
            .map(|&(id, name, style)| EnumValue {
                id,
                name,
                label: capitalize(name),
                style,
            })
            .collect();

        let ids = values.iter().enumerate().map(|(i, v)| (v.id, i)).collect();
        let names = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.to_lowercase(), i))
            .collect();

        EnumSet {
            name,
            values,
            ids,
            names,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn by_id(&self, id: i64) -> Option<&EnumValue> {
        self.ids.get(&id).map(|&i| &self.values[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&EnumValue> {
        self.names
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.values[i])
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const LEVELS: &[(i64, &str, &str)] = &[
    (0, "none", ""),
    (1, "success", "success"),
    (2, "info", "info"),
    (3, "notice", "warning"),
    (4, "warning", "danger"),
    (5, "primary", "primary"),
    (6, "secondary", "secondary"),
];

lazy_static! {
    pub static ref NOTIFICATION_LEVEL: EnumSet = EnumSet::new("notification_level", LEVELS);
    pub static ref NOTIFICATION_TYPE: EnumSet = EnumSet::new(
        "notification_type",
        &[(0, "message", ""), (1, "task", ""), (2, "request", "")]
    );
    pub static ref POST_LEVEL: EnumSet = EnumSet::new("post_level", LEVELS);
    pub static ref POST_TYPE: EnumSet =
        EnumSet::new("post_type", &[(0, "message", ""), (1, "event", "")]);
    pub static ref REQUEST_STATUS: EnumSet = EnumSet::new(
        "request_status",
        &[(0, "requested", ""), (1, "approved", ""), (2, "rejected", "")]
    );
    pub static ref SUBSCRIPTION_LEVEL: EnumSet = EnumSet::new(
        "subscription_level",
        &[
            (0, "none", ""),
            (1, "follow", ""),
            (2, "notify", ""),
            (3, "email", "")
        ]
    );
}

/// Every registered enumeration, in registration order.
pub fn enum_sets() -> [&'static EnumSet; 6] {
    [
        &*NOTIFICATION_LEVEL,
        &*NOTIFICATION_TYPE,
        &*POST_LEVEL,
        &*POST_TYPE,
        &*REQUEST_STATUS,
        &*SUBSCRIPTION_LEVEL,
    ]
}
