//! Conversions of plain values into AST nodes.

use crate::{
    ast::{
        expr::{ColumnRef, Expression, ExpressionKind},
        result_column::ResultColumn,
        select::Select,
        source::{Join, Source},
    },
    table::{DatabaseTable, SystemTable, Table},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use xapi_model::{
    Reference, Value,
    schema::{Database, Element, Field},
};

/// Anything usable where an expression is expected.
pub trait IntoExpression {
    fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
    fn into_expression(self) -> Expression {
        self
    }
}

impl IntoExpression for () {
    fn into_expression(self) -> Expression {
        Expression::null()
    }
}

impl<T: IntoExpression> IntoExpression for Option<T> {
    fn into_expression(self) -> Expression {
        self.map_or_else(Expression::null, IntoExpression::into_expression)
    }
}

impl IntoExpression for bool {
    fn into_expression(self) -> Expression {
        Expression::int(i64::from(self))
    }
}

impl IntoExpression for i64 {
    fn into_expression(self) -> Expression {
        Expression::int(self)
    }
}

impl IntoExpression for i32 {
    fn into_expression(self) -> Expression {
        Expression::int(i64::from(self))
    }
}

impl IntoExpression for u32 {
    fn into_expression(self) -> Expression {
        Expression::int(i64::from(self))
    }
}

impl IntoExpression for f64 {
    fn into_expression(self) -> Expression {
        Expression::float(self)
    }
}

impl IntoExpression for &str {
    fn into_expression(self) -> Expression {
        Expression::string(self)
    }
}

impl IntoExpression for String {
    fn into_expression(self) -> Expression {
        Expression::string(self)
    }
}

impl IntoExpression for DateTime<Utc> {
    fn into_expression(self) -> Expression {
        Expression::datetime(self)
    }
}

impl IntoExpression for NaiveDateTime {
    fn into_expression(self) -> Expression {
        Expression::local_datetime(self)
    }
}

impl IntoExpression for Select {
    fn into_expression(self) -> Expression {
        Expression::select(self)
    }
}

/// A field reads from the `record` table of its database.
impl IntoExpression for &Field {
    fn into_expression(self) -> Expression {
        Expression::new(ExpressionKind::Column(ColumnRef {
            table: Table::Database(DatabaseTable::Record),
            column: self.name().to_string(),
            database: Some(Reference::Element(self.database().clone())),
        }))
    }
}

impl IntoExpression for Arc<Field> {
    fn into_expression(self) -> Expression {
        self.as_ref().into_expression()
    }
}

/// A request parameter, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRef(pub String);

/// A named attribute of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRef(pub String);

impl IntoExpression for ParameterRef {
    fn into_expression(self) -> Expression {
        Expression::alias_ref(self.0)
    }
}

impl IntoExpression for AttributeRef {
    fn into_expression(self) -> Expression {
        Expression::alias_ref(self.0)
    }
}

/// Typed values map to the closest literal. Values without a literal form
/// are written as their string form.
impl IntoExpression for Value {
    fn into_expression(self) -> Expression {
        match self {
            Value::Null => Expression::null(),
            Value::Int(v) => Expression::int(v),
            Value::Float(v) => Expression::float(v),
            Value::Boolean(v) => v.into_expression(),
            Value::String(v) => Expression::string(v),
            Value::Timestamp(v) => Expression::datetime(v),
            other => Expression::string(other.to_string()),
        }
    }
}

pub fn to_expression(value: impl IntoExpression) -> Expression {
    value.into_expression()
}

/// `None` stays absent instead of becoming the null literal.
pub fn to_optional_expression<T: IntoExpression>(value: Option<T>) -> Option<Expression> {
    value.map(IntoExpression::into_expression)
}

pub trait IntoResultColumn {
    fn into_result_column(self) -> ResultColumn;
}

impl<T: IntoExpression> IntoResultColumn for T {
    fn into_result_column(self) -> ResultColumn {
        ResultColumn::new(self)
    }
}

impl IntoResultColumn for ResultColumn {
    fn into_result_column(self) -> ResultColumn {
        self
    }
}

pub trait IntoSource {
    fn into_source(self) -> Source;
}

impl IntoSource for Source {
    fn into_source(self) -> Source {
        self
    }
}

impl IntoSource for SystemTable {
    fn into_source(self) -> Source {
        Source::system(self)
    }
}

impl IntoSource for Select {
    fn into_source(self) -> Source {
        Source::select(self)
    }
}

impl IntoSource for Join {
    fn into_source(self) -> Source {
        Source::from(self)
    }
}

/// A database reads as its `record` table.
impl IntoSource for &Database {
    fn into_source(self) -> Source {
        Source::database(self, DatabaseTable::Record)
    }
}

impl IntoSource for Arc<Database> {
    fn into_source(self) -> Source {
        self.as_ref().into_source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiComponent;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(true.into_expression(), Expression::int(1));
        assert_eq!(false.into_expression(), Expression::int(0));
        assert_eq!(().into_expression(), Expression::null());
        assert_eq!(None::<i64>.into_expression(), Expression::null());
        assert_eq!(Some("a").into_expression(), Expression::string("a"));
        assert_eq!(to_optional_expression(None::<i64>), None);
    }

    #[test]
    fn test_datetime_wire_form() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            dt.into_expression().build(false).unwrap(),
            json!({"type": "dt", "value": "2024-01-02T03:04:05.000Z"})
        );
        let local = dt.naive_utc();
        assert_eq!(
            local.into_expression().build(false).unwrap(),
            json!({"type": "ldt", "value": "2024-01-02T03:04:05.000"})
        );
    }

    #[test]
    fn test_references_become_aliases() {
        assert_eq!(
            ParameterRef("p".into()).into_expression(),
            Expression::alias_ref("p")
        );
        assert_eq!(
            AttributeRef("a".into()).into_expression().to_string(),
            "`a`"
        );
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(Value::Int(3).into_expression(), Expression::int(3));
        assert_eq!(Value::Boolean(true).into_expression(), Expression::int(1));
        assert_eq!(Value::Null.into_expression(), Expression::null());
    }
}
