use super::{
    element::{Element, ElementKind, ElementSet},
    field::{Field, FieldSpec},
    record::Record,
};
use crate::{
    core::{format::FormatOptions, value::Value},
    error::{ApiError, Result},
    specifier::Specifier,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSpec {
    pub database_id: i64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Record display template, e.g. `"{first} {last}"` or `"{due%iso_d}"`.
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub databases: Vec<DatabaseSpec>,
}

#[derive(Debug)]
pub struct Database {
    database_id: i64,
    name: String,
    label: String,
    path: String,
    label_path: String,
    format: Option<String>,
    fields: ElementSet<Field>,
    databases: ElementSet<Database>,
}

impl Database {
    /// Builds a database and its nested databases under `parent`, given as
    /// `(path, label_path)` of the enclosing element.
    pub fn from_spec(spec: DatabaseSpec, parent: Option<(&str, &str)>) -> Result<Self> {
        let label = spec.label.unwrap_or_else(|| spec.name.clone());
        let (path, label_path) = match parent {
            Some((p, lp)) => (format!("{p}.{}", spec.name), format!("{lp} / {label}")),
            None => (spec.name.clone(), label.clone()),
        };

        let mut database = Database {
            database_id: spec.database_id,
            name: spec.name,
            label,
            path,
            label_path,
            format: spec.format,
            fields: ElementSet::default(),
            databases: ElementSet::default(),
        };

        let handle = database.handle();
        let fields = spec
            .fields
            .into_iter()
            .map(|f| Field::from_spec(f, handle.clone()).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let children = spec
            .databases
            .into_iter()
            .map(|d| {
                let scope = (database.path.as_str(), database.label_path.as_str());
                Database::from_spec(d, Some(scope)).map(Arc::new)
            })
            .collect::<Result<Vec<_>>>()?;

        database.fields = ElementSet::new(fields);
        database.databases = ElementSet::new(children);
        Ok(database)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label_path(&self) -> &str {
        &self.label_path
    }

    pub fn fields(&self) -> &ElementSet<Field> {
        &self.fields
    }

    pub fn databases(&self) -> &ElementSet<Database> {
        &self.databases
    }

    pub fn field(&self, spec: &Specifier) -> Result<&Arc<Field>> {
        self.fields.get(spec)
    }

    pub fn key_fields(&self) -> impl Iterator<Item = &Arc<Field>> {
        self.fields.iter().filter(|f| f.is_key())
    }

    /// Resolves a nested database by a dotted path relative to this one.
    pub fn get_database(&self, path: &str) -> Result<&Arc<Database>> {
        let mut segments = path.split('.');
        let first = segments
            .next()
            .ok_or_else(|| ApiError::not_found("database", path))?;
        let mut current = self.databases.get(&first.into())?;
        for segment in segments {
            current = current
                .databases
                .find(&segment.into())
                .ok_or_else(|| ApiError::not_found("database", path))?;
        }
        Ok(current)
    }

    /// Every nested database, depth first.
    pub fn descendants(&self) -> Vec<Arc<Database>> {
        let mut out = Vec::new();
        for child in self.databases.iter() {
            out.push(Arc::clone(child));
            out.extend(child.descendants());
        }
        out
    }

    /// Renders a one-line description of `record`.
    ///
    /// Placeholders are `{field}` or `{field%format}`; `{$id}` is the record
    /// id. Without an explicit or configured template the key fields are
    /// joined with spaces, falling back to the record id.
    pub fn format_record(&self, record: &Record, format: Option<&str>) -> Result<String> {
        let template = match format.or(self.format.as_deref()) {
            Some(t) => t.to_string(),
            None => {
                let keys: Vec<String> = self
                    .key_fields()
                    .map(|f| format!("{{{}}}", f.name()))
                    .collect();
                if keys.is_empty() {
                    "{$id}".to_string()
                } else {
                    keys.join(" ")
                }
            }
        };

        let mut out = String::new();
        let mut rest = template.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    out.push_str(&self.render_placeholder(&after[..end], record)?);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn render_placeholder(&self, token: &str, record: &Record) -> Result<String> {
        let (key, pattern) = match token.split_once('%') {
            Some((key, pattern)) => (key.trim(), Some(pattern)),
            None => (token.trim(), None),
        };
        if key == "$id" {
            return Ok(record.id.to_string());
        }

        let raw = record.get(key).map(Value::from).unwrap_or(Value::Null);
        let text = match self.fields.find(&key.into()) {
            Some(field) => {
                let opts = pattern.map(FormatOptions::from).unwrap_or_default();
                field.xtype().format(&raw, &opts)?
            }
            None => raw.as_string().unwrap_or_default(),
        };
        Ok(if text.is_empty() {
            "none".to_string()
        } else {
            text
        })
    }
}

impl Element for Database {
    const KIND: ElementKind = ElementKind::Database;

    fn id(&self) -> i64 {
        self.database_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn specifier(&self) -> String {
        self.path.clone()
    }
}
