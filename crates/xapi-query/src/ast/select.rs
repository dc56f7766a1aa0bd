//! Defines the AST for a SELECT statement and its wire form.

use crate::{
    api::{ApiComponent, build_all, join_display, load_all},
    ast::{expr::Expression, order_term::OrderTerm, result_column::ResultColumn, source::Source},
    builder::select::SelectBuilder,
    wire::{self, JsonObject, WireObject},
};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::trace;
use xapi_model::{Result, schema::ApiContext};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,

    /// Selects combined with `UNION`. Exclusive with `columns`.
    pub unions: Vec<Select>,

    /// The result columns. Empty means `*`.
    pub columns: Vec<ResultColumn>,

    /// e.g., `FROM users`
    pub from: Option<Source>,

    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Option<Expression>,
    pub order_by: Vec<OrderTerm>,
    pub limit: Option<Expression>,
    pub offset: Option<Expression>,
}

impl Select {
    pub fn builder() -> SelectBuilder {
        SelectBuilder::new()
    }

    pub fn to_expression(self) -> Expression {
        Expression::select(self)
    }

    pub fn to_source(self) -> Source {
        Source::select(self)
    }

    /// The select as a named sub-query source.
    pub fn alias(self, alias: impl Into<String>) -> Source {
        Source::select(self).with_alias(alias)
    }

    pub fn is_union(&self) -> bool {
        !self.unions.is_empty()
    }

    fn clauses_valid(&self) -> bool {
        let optional = [&self.where_clause, &self.having, &self.limit, &self.offset];
        self.from.as_ref().is_none_or(Source::is_valid)
            && optional.into_iter().all(|e| e.as_ref().is_none_or(Expression::is_valid))
            && self.group_by.iter().all(Expression::is_valid)
            && self.order_by.iter().all(OrderTerm::is_valid)
    }
}

fn build_optional(e: &Option<Expression>, pretty: bool) -> Result<Option<JsonValue>> {
    e.as_ref().map(|e| e.build(pretty)).transpose()
}

fn load_optional(obj: &JsonObject, key: &str, ctx: &dyn ApiContext) -> Result<Option<Expression>> {
    wire::field(obj, key)
        .map(|json| Expression::load(json, ctx))
        .transpose()
}

impl ApiComponent for Select {
    const COMPONENT: &'static str = "select";

    fn is_valid(&self) -> bool {
        self.unions.iter().all(Select::is_valid)
            && self.columns.iter().all(ResultColumn::is_valid)
            && !(self.is_union() && !self.columns.is_empty())
            && self.clauses_valid()
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        let out = if self.is_union() {
            WireObject::new().put("union", build_all(&self.unions, pretty)?)
        } else {
            WireObject::new()
                .put("distinct", self.distinct)
                .put_list("columns", build_all(&self.columns, pretty)?)
                .put_opt("from", self.from.as_ref().map(|s| s.build(pretty)).transpose()?)
        };
        let out = out
            .put_opt("where", build_optional(&self.where_clause, pretty)?)
            .put_list("group", build_all(&self.group_by, pretty)?)
            .put_opt("having", build_optional(&self.having, pretty)?)
            .put_list("order", build_all(&self.order_by, pretty)?)
            .put_opt("limit", build_optional(&self.limit, pretty)?)
            .put_opt("offset", build_optional(&self.offset, pretty)?);
        Ok(out.build())
    }

    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = wire::object(json, "select")?;
        let unions: Vec<Select> = load_all(wire::optional_array(obj, "union", "select")?, ctx)?;
        trace!(unions = unions.len(), "Loading select");

        Ok(Select {
            distinct: wire::flag(obj, "distinct"),
            unions,
            columns: load_all(wire::optional_array(obj, "columns", "select")?, ctx)?,
            from: wire::field(obj, "from")
                .map(|json| Source::load(json, ctx))
                .transpose()?,
            where_clause: load_optional(obj, "where", ctx)?,
            group_by: load_all(wire::optional_array(obj, "group", "select")?, ctx)?,
            having: load_optional(obj, "having", ctx)?,
            order_by: load_all(wire::optional_array(obj, "order", "select")?, ctx)?,
            limit: load_optional(obj, "limit", ctx)?,
            offset: load_optional(obj, "offset", ctx)?,
        })
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_union() {
            let parts = self.unions.iter().map(ToString::to_string).collect::<Vec<_>>();
            write!(f, "({})", parts.join(" UNION "))?;
        } else {
            write!(f, "SELECT ")?;
            if self.distinct {
                write!(f, "DISTINCT ")?;
            }
            if self.columns.is_empty() {
                write!(f, "*")?;
            } else {
                write!(f, "{}", join_display(&self.columns))?;
            }
            if let Some(from) = &self.from {
                write!(f, " FROM {from}")?;
            }
        }
        if let Some(e) = &self.where_clause {
            write!(f, " WHERE {e}")?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY {}", join_display(&self.group_by))?;
        }
        if let Some(e) = &self.having {
            write!(f, " HAVING {e}")?;
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", join_display(&self.order_by))?;
        }
        if let Some(e) = &self.limit {
            write!(f, " LIMIT {e}")?;
        }
        if let Some(e) = &self.offset {
            write!(f, " OFFSET {e}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SystemTable;
    use serde_json::json;
    use xapi_model::schema::SchemaContext;

    fn tasks() -> Select {
        Select::builder()
            .column(Expression::column(SystemTable::Task, "id"))
            .from(Source::system(SystemTable::Task))
            .build()
    }

    #[test]
    fn test_display() {
        let select = Select::builder()
            .distinct()
            .column(Expression::column(SystemTable::Task, "name").alias("n"))
            .from(Source::system(SystemTable::Task))
            .where_clause(Expression::column(SystemTable::Task, "done").equal(0))
            .order_by_desc(Expression::alias_ref("n"))
            .limit(10)
            .build();
        assert_eq!(
            select.to_string(),
            "SELECT DISTINCT `task`.`name` AS `n` FROM `task` WHERE (`task`.`done`) = (0) \
             ORDER BY `n` DESC LIMIT 10"
        );
    }

    #[test]
    fn test_star_and_empty_lists_omitted() {
        let select = Select::builder().from(Source::system(SystemTable::User)).build();
        assert_eq!(select.to_string(), "SELECT * FROM `user`");
        assert_eq!(
            select.build(false).unwrap(),
            json!({"distinct": false, "from": {"type": "ts", "table": "user"}})
        );
    }

    #[test]
    fn test_unions_and_columns_are_exclusive() {
        let mut select = Select::builder().union(tasks()).union(tasks()).build();
        assert!(select.is_valid());
        assert_eq!(
            select.to_string(),
            "(SELECT `task`.`id` FROM `task` UNION SELECT `task`.`id` FROM `task`)"
        );

        select.columns.push(ResultColumn::new(1));
        assert!(!select.is_valid());
        assert!(select.validate().is_err());
    }

    #[test]
    fn test_union_round_trip() {
        let select = Select::builder()
            .union(tasks())
            .union(tasks())
            .order_by_asc(1)
            .limit(5)
            .build();
        let built = select.build(false).unwrap();
        assert!(built.get("distinct").is_none());
        let loaded = Select::load(&built, &SchemaContext::default()).unwrap();
        assert_eq!(loaded, select);
    }

    #[test]
    fn test_conflicting_json_loads_but_is_invalid() {
        let json = json!({
            "union": [{"columns": [{"e": 1}]}],
            "columns": [{"e": 2}]
        });
        let select = Select::load(&json, &SchemaContext::default()).unwrap();
        assert!(!select.is_valid());
    }

    #[test]
    fn test_alias_makes_sub_query_source() {
        let source = tasks().alias("t");
        assert_eq!(source.to_string(), "(SELECT `task`.`id` FROM `task`) AS t");
        assert_eq!(
            tasks().to_expression().to_string(),
            "(SELECT `task`.`id` FROM `task`)"
        );
    }

    #[test]
    fn test_invalid_clause_invalidates_select() {
        let mut select = tasks();
        select.having = Some(Expression::string(""));
        assert!(!select.is_valid());
    }
}
