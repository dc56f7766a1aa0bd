use crate::{
    api::ApiComponent,
    ast::expr::Expression,
    expressible::IntoExpression,
    wire::{self, WireObject},
};
use serde_json::Value as JsonValue;
use std::fmt;
use xapi_model::{Result, schema::ApiContext};

/// An output column of a select, optionally renamed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub expression: Expression,
    pub alias: Option<String>,
}

impl ResultColumn {
    pub fn new(expression: impl IntoExpression) -> Self {
        ResultColumn {
            expression: expression.into_expression(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl ApiComponent for ResultColumn {
    const COMPONENT: &'static str = "result column";

    fn is_valid(&self) -> bool {
        self.expression.is_valid()
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        Ok(WireObject::new()
            .put("e", self.expression.build(pretty)?)
            .put_opt("alias", self.alias.clone())
            .build())
    }

    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = wire::object(json, "result column")?;
        Ok(ResultColumn {
            expression: Expression::load(wire::required(obj, "e", "result column")?, ctx)?,
            alias: wire::optional_string(obj, "alias", "result column")?,
        })
    }
}

impl fmt::Display for ResultColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS `{alias}`")?;
        }
        Ok(())
    }
}
