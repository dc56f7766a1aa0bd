use super::element::{Element, ElementKind};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserSpec {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamSpec {
    pub team_id: i64,
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    user_id: i64,
    name: String,
    label: String,
}

impl From<UserSpec> for User {
    fn from(spec: UserSpec) -> Self {
        User {
            user_id: spec.user_id,
            label: spec.label.unwrap_or_else(|| spec.name.clone()),
            name: spec.name,
        }
    }
}

impl Element for User {
    const KIND: ElementKind = ElementKind::User;

    fn id(&self) -> i64 {
        self.user_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone)]
pub struct Team {
    team_id: i64,
    name: String,
    label: String,
}

impl From<TeamSpec> for Team {
    fn from(spec: TeamSpec) -> Self {
        Team {
            team_id: spec.team_id,
            label: spec.label.unwrap_or_else(|| spec.name.clone()),
            name: spec.name,
        }
    }
}

impl Element for Team {
    const KIND: ElementKind = ElementKind::Team;

    fn id(&self) -> i64 {
        self.team_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }
}
