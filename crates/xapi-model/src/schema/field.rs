use super::element::{Element, ElementHandle, ElementKind};
use crate::{core::types::XType, error::Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub field_id: i64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Part of the record's display key.
    #[serde(default)]
    pub key: bool,
}

#[derive(Debug, Clone)]
pub struct Field {
    field_id: i64,
    name: String,
    label: String,
    xtype: &'static XType,
    key: bool,
    database: ElementHandle,
    path: String,
}

impl Field {
    /// Fails when the declared type is not registered.
    pub fn from_spec(spec: FieldSpec, database: ElementHandle) -> Result<Self> {
        let xtype = XType::parse_name(&spec.type_name)?;
        let path = format!("{}.{}", database.path, spec.name);
        Ok(Field {
            field_id: spec.field_id,
            label: spec.label.unwrap_or_else(|| spec.name.clone()),
            name: spec.name,
            xtype,
            key: spec.key,
            database,
            path,
        })
    }

    pub fn type_name(&self) -> &str {
        self.xtype.name()
    }

    pub fn xtype(&self) -> &'static XType {
        self.xtype
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    /// The owning database.
    pub fn database(&self) -> &ElementHandle {
        &self.database
    }
}

impl Element for Field {
    const KIND: ElementKind = ElementKind::Field;

    fn id(&self) -> i64 {
        self.field_id
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
