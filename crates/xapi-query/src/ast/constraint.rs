use crate::{
    api::{ApiComponent, join_display},
    ast::expr::Expression,
    kind::ConstraintType,
    variant::Variant,
    wire::{self, WireObject},
};
use serde_json::Value as JsonValue;
use std::fmt;
use xapi_model::{Result, schema::ApiContext};

/// Join constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    On(Expression),
    Using(Vec<String>),
}

impl Constraint {
    pub fn constraint_type(&self) -> ConstraintType {
        match self {
            Constraint::On(_) => ConstraintType::On,
            Constraint::Using(_) => ConstraintType::Using,
        }
    }
}

impl ApiComponent for Constraint {
    const COMPONENT: &'static str = "constraint";

    fn is_valid(&self) -> bool {
        match self {
            Constraint::On(e) => e.is_valid(),
            Constraint::Using(columns) => !columns.is_empty(),
        }
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        let out = WireObject::tagged(self.constraint_type().name());
        let out = match self {
            Constraint::On(e) => out.put("e", e.build(pretty)?),
            Constraint::Using(columns) => out.put("columns", columns.clone()),
        };
        Ok(out.build())
    }

    /// A `using` constraint without a column array loads as empty.
    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = wire::object(json, "constraint")?;
        match ConstraintType::from_json(wire::required(obj, "type", "constraint")?)? {
            ConstraintType::On => Ok(Constraint::On(Expression::load(
                wire::required(obj, "e", "constraint")?,
                ctx,
            )?)),
            ConstraintType::Using => {
                let columns = wire::field(obj, "columns")
                    .and_then(JsonValue::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|c| c.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(Constraint::Using(columns))
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::On(e) => write!(f, "ON ({e})"),
            Constraint::Using(columns) => write!(f, "USING ({})", join_display(columns)),
        }
    }
}
