use super::{
    database::Database,
    element::ElementSet,
    field::Field,
    group::{Group, GroupSpec},
    user::{Team, TeamSpec, User, UserSpec},
};
use crate::{
    error::{ApiError, Result},
    specifier::Specifier,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Schema lookups needed while loading requests from JSON.
pub trait ApiContext {
    fn database(&self, spec: &Specifier) -> Result<Arc<Database>>;
}

/// Wire description of a whole schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaSpec {
    pub groups: Vec<GroupSpec>,
    pub users: Vec<UserSpec>,
    pub teams: Vec<TeamSpec>,
}

#[derive(Debug, Default)]
pub struct SchemaContext {
    groups: ElementSet<Group>,
    databases: ElementSet<Database>,
    users: ElementSet<User>,
    teams: ElementSet<Team>,
}

impl SchemaContext {
    pub fn new(spec: SchemaSpec) -> Result<Self> {
        let groups = spec
            .groups
            .into_iter()
            .map(|g| Group::from_spec(g, None).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let databases: Vec<Arc<Database>> =
            groups.iter().flat_map(|g| g.all_databases()).collect();

        debug!(
            groups = groups.len(),
            databases = databases.len(),
            "Schema context built"
        );

        Ok(SchemaContext {
            groups: ElementSet::new(groups),
            databases: ElementSet::new(databases),
            users: ElementSet::new(spec.users.into_iter().map(|u| Arc::new(User::from(u)))),
            teams: ElementSet::new(spec.teams.into_iter().map(|t| Arc::new(Team::from(t)))),
        })
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let spec: SchemaSpec = serde_json::from_value(json.clone())
            .map_err(|e| ApiError::parse("schema", "json", e.to_string()))?;
        SchemaContext::new(spec)
    }

    pub fn groups(&self) -> &ElementSet<Group> {
        &self.groups
    }

    /// All databases, flattened across groups and nesting levels.
    pub fn databases(&self) -> &ElementSet<Database> {
        &self.databases
    }

    pub fn users(&self) -> &ElementSet<User> {
        &self.users
    }

    pub fn teams(&self) -> &ElementSet<Team> {
        &self.teams
    }

    pub fn field(&self, database: &Specifier, field: &Specifier) -> Result<Arc<Field>> {
        let database = self.database(database)?;
        database.field(field).cloned()
    }
}

impl ApiContext for SchemaContext {
    fn database(&self, spec: &Specifier) -> Result<Arc<Database>> {
        debug!(%spec, "Resolving database");
        self.databases.get(spec).cloned()
    }
}
