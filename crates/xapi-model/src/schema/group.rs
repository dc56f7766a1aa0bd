use super::{
    database::{Database, DatabaseSpec},
    element::{Element, ElementKind, ElementSet},
};
use crate::error::Result;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSpec {
    pub group_id: i64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default)]
    pub databases: Vec<DatabaseSpec>,
}

#[derive(Debug)]
pub struct Group {
    group_id: i64,
    name: String,
    label: String,
    path: String,
    label_path: String,
    groups: ElementSet<Group>,
    databases: ElementSet<Database>,
}

impl Group {
    pub fn from_spec(spec: GroupSpec, parent: Option<(&str, &str)>) -> Result<Self> {
        let label = spec.label.unwrap_or_else(|| spec.name.clone());
        let (path, label_path) = match parent {
            Some((p, lp)) => (format!("{p}.{}", spec.name), format!("{lp} / {label}")),
            None => (spec.name.clone(), label.clone()),
        };
        let scope = Some((path.as_str(), label_path.as_str()));

        let groups = spec
            .groups
            .into_iter()
            .map(|g| Group::from_spec(g, scope).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let databases = spec
            .databases
            .into_iter()
            .map(|d| Database::from_spec(d, scope).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        Ok(Group {
            group_id: spec.group_id,
            name: spec.name,
            label,
            groups: ElementSet::new(groups),
            databases: ElementSet::new(databases),
            path,
            label_path,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label_path(&self) -> &str {
        &self.label_path
    }

    pub fn groups(&self) -> &ElementSet<Group> {
        &self.groups
    }

    pub fn databases(&self) -> &ElementSet<Database> {
        &self.databases
    }

    /// Every database in this group and its subgroups, nested ones included.
    pub fn all_databases(&self) -> Vec<Arc<Database>> {
        let mut out = Vec::new();
        for database in self.databases.iter() {
            out.push(Arc::clone(database));
            out.extend(database.descendants());
        }
        for group in self.groups.iter() {
            out.extend(group.all_databases());
        }
        out
    }
}

impl Element for Group {
    const KIND: ElementKind = ElementKind::Group;

    fn id(&self) -> i64 {
        self.group_id
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
