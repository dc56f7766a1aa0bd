use crate::{
    api::ApiComponent,
    ast::{constraint::Constraint, select::Select},
    expressible::{IntoExpression, IntoSource},
    kind::SourceType,
    operator::JoinOperator,
    table::{DatabaseTable, SystemTable},
    variant::Variant,
    wire::{self, WireObject},
};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::trace;
use xapi_model::{Reference, Result, schema::ApiContext, to_specifier};

/// A row source in a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub kind: SourceKind,
    pub alias: Option<String>,
    pub meta: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    SystemTable(SystemTable),
    DatabaseTable {
        database: Reference,
        table: DatabaseTable,
    },
    Join(Join),
    Select(Box<Select>),
}

/// Two sources combined by a join operator.
///
/// Built without a constraint by the join helpers; `on` and `using` close it
/// into a [`Source`].
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub operator: JoinOperator,
    pub left: Box<Source>,
    pub right: Box<Source>,
    pub constraint: Option<Constraint>,
}

impl Join {
    pub fn new(operator: JoinOperator, left: impl IntoSource, right: impl IntoSource) -> Self {
        Join {
            operator,
            left: Box::new(left.into_source()),
            right: Box::new(right.into_source()),
            constraint: None,
        }
    }

    pub fn on(mut self, condition: impl IntoExpression) -> Source {
        self.constraint = Some(Constraint::On(condition.into_expression()));
        Source::new(SourceKind::Join(self))
    }

    pub fn using<I, S>(mut self, columns: I) -> Source
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint = Some(Constraint::Using(columns.into_iter().map(Into::into).collect()));
        Source::new(SourceKind::Join(self))
    }

    pub fn is_valid(&self) -> bool {
        self.left.is_valid()
            && self.right.is_valid()
            && self.constraint.as_ref().is_some_and(Constraint::is_valid)
    }
}

impl Source {
    pub fn new(kind: SourceKind) -> Self {
        Source {
            kind,
            alias: None,
            meta: None,
        }
    }

    pub fn system(table: SystemTable) -> Self {
        Source::new(SourceKind::SystemTable(table))
    }

    pub fn database(database: impl Into<Reference>, table: DatabaseTable) -> Self {
        Source::new(SourceKind::DatabaseTable {
            database: database.into(),
            table,
        })
    }

    pub fn select(select: Select) -> Self {
        Source::new(SourceKind::Select(Box::new(select)))
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_meta(mut self, meta: JsonValue) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn source_type(&self) -> SourceType {
        match &self.kind {
            SourceKind::SystemTable(_) => SourceType::SystemTable,
            SourceKind::DatabaseTable { .. } => SourceType::DatabaseTable,
            SourceKind::Join(_) => SourceType::Join,
            SourceKind::Select(_) => SourceType::Select,
        }
    }

    pub fn join(self, other: impl IntoSource) -> Join {
        Join::new(JoinOperator::Join, self, other)
    }

    pub fn left_join(self, other: impl IntoSource) -> Join {
        Join::new(JoinOperator::Left, self, other)
    }

    pub fn left_outer_join(self, other: impl IntoSource) -> Join {
        Join::new(JoinOperator::LeftOuter, self, other)
    }

    pub fn inner_join(self, other: impl IntoSource) -> Join {
        Join::new(JoinOperator::Inner, self, other)
    }

    pub fn cross_join(self, other: impl IntoSource) -> Join {
        Join::new(JoinOperator::Cross, self, other)
    }
}

impl ApiComponent for Source {
    const COMPONENT: &'static str = "source";

    fn is_valid(&self) -> bool {
        match &self.kind {
            SourceKind::SystemTable(_) => true,
            SourceKind::DatabaseTable { database, .. } => {
                !matches!(database, Reference::Name(name) if name.trim().is_empty())
            }
            SourceKind::Join(join) => join.is_valid(),
            SourceKind::Select(select) => select.is_valid(),
        }
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        let out = WireObject::tagged(self.source_type().name())
            .put_opt("meta", self.meta.clone())
            .put_opt("alias", self.alias.clone());
        let out = match &self.kind {
            SourceKind::SystemTable(table) => out.put("table", table.name()),
            SourceKind::DatabaseTable { database, table } => out
                .put("database", to_specifier(Some(database), pretty)?.to_json())
                .put("table", table.name()),
            SourceKind::Join(join) => out
                .put("op", join.operator.name())
                .put("s1", join.left.build(pretty)?)
                .put("s2", join.right.build(pretty)?)
                .put_opt(
                    "constraint",
                    join.constraint.as_ref().map(|c| c.build(pretty)).transpose()?,
                ),
            SourceKind::Select(select) => out.put("select", select.build(pretty)?),
        };
        Ok(out.build())
    }

    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = wire::object(json, "source")?;
        let source_type = SourceType::from_json(wire::required(obj, "type", "source")?)?;
        trace!(source = source_type.name(), "Loading source");

        let kind = match source_type {
            SourceType::SystemTable => {
                SourceKind::SystemTable(SystemTable::from_json(wire::required(obj, "table", "ts")?)?)
            }
            SourceType::DatabaseTable => {
                let database = wire::database(obj, "database", ctx)?;
                SourceKind::DatabaseTable {
                    database: Reference::from(&*database),
                    table: DatabaseTable::from_json(wire::required(obj, "table", "td")?)?,
                }
            }
            SourceType::Join => SourceKind::Join(Join {
                operator: JoinOperator::from_json(wire::required(obj, "op", "join")?)?,
                left: Box::new(Source::load(wire::required(obj, "s1", "join")?, ctx)?),
                right: Box::new(Source::load(wire::required(obj, "s2", "join")?, ctx)?),
                constraint: Some(Constraint::load(
                    wire::required(obj, "constraint", "join")?,
                    ctx,
                )?),
            }),
            SourceType::Select => SourceKind::Select(Box::new(Select::load(
                wire::required(obj, "select", "select")?,
                ctx,
            )?)),
        };

        Ok(Source {
            kind,
            alias: wire::optional_string(obj, "alias", "source")?,
            meta: wire::field(obj, "meta").cloned(),
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SourceKind::SystemTable(table) => write!(f, "`{}`", table.name())?,
            SourceKind::DatabaseTable { database, table } => {
                write!(f, "`{database}`.`{}`", table.name())?
            }
            SourceKind::Join(join) => {
                write!(f, "({}) {} ({})", join.left, join.operator, join.right)?;
                if let Some(constraint) = &join.constraint {
                    write!(f, " {constraint}")?;
                }
            }
            SourceKind::Select(select) => write!(f, "({select})")?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl From<Join> for Source {
    fn from(join: Join) -> Self {
        Source::new(SourceKind::Join(join))
    }
}
