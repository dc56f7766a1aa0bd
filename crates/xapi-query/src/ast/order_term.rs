use crate::{
    api::ApiComponent,
    ast::expr::Expression,
    expressible::IntoExpression,
    kind::OrderType,
    variant::Variant,
    wire::{self, WireObject},
};
use serde_json::Value as JsonValue;
use std::fmt;
use xapi_model::{Result, schema::ApiContext};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    pub expression: Expression,
    pub order: OrderType,
}

impl OrderTerm {
    pub fn new(expression: impl IntoExpression, order: OrderType) -> Self {
        OrderTerm {
            expression: expression.into_expression(),
            order,
        }
    }

    pub fn asc(expression: impl IntoExpression) -> Self {
        OrderTerm::new(expression, OrderType::Asc)
    }

    pub fn desc(expression: impl IntoExpression) -> Self {
        OrderTerm::new(expression, OrderType::Desc)
    }
}

impl ApiComponent for OrderTerm {
    const COMPONENT: &'static str = "order term";

    fn is_valid(&self) -> bool {
        self.expression.is_valid()
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        Ok(WireObject::new()
            .put("e", self.expression.build(pretty)?)
            .put("order", self.order.name())
            .build())
    }

    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = wire::object(json, "order term")?;
        Ok(OrderTerm {
            expression: Expression::load(wire::required(obj, "e", "order term")?, ctx)?,
            order: OrderType::from_json(wire::required(obj, "order", "order term")?)?,
        })
    }
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.expression, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xapi_model::{ApiError, schema::SchemaContext};

    #[test]
    fn test_order_term() {
        let term = OrderTerm::desc(Expression::alias_ref("total"));
        assert_eq!(term.to_string(), "`total` DESC");
        assert_eq!(
            term.build(false).unwrap(),
            json!({"e": {"type": "alias", "alias": "total"}, "order": "desc"})
        );
    }

    #[test]
    fn test_order_is_required() {
        let err = OrderTerm::load(&json!({"e": 1}), &SchemaContext::default()).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
        let err = OrderTerm::load(&json!({"e": 1, "order": "up"}), &SchemaContext::default());
        assert!(matches!(err, Err(ApiError::UnknownVariant { .. })));
    }
}
