use crate::{
    api::{ApiComponent, build_all, join_display, load_all},
    ast::{order_term::OrderTerm, result_column::ResultColumn, select::Select},
    expressible::IntoExpression,
    kind::ExpressionType,
    operator::{BinaryOperator, CompoundOperator, SearchOperator, UnaryOperator},
    table::Table,
    variant::Variant,
    wire::{self, JsonObject, WireObject},
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value as JsonValue};
use std::fmt;
use tracing::{trace, warn};
use xapi_model::{
    ApiError, Reference, Result, Specifier, Value,
    core::types::{LOCAL_DATETIME_FORMAT, parse_local_datetime, parse_timestamp},
    schema::{ApiContext, Element},
    to_identifier, to_optional_specifier, to_specifier,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    /// Opaque client data, echoed on the wire under `meta`.
    pub meta: Option<JsonValue>,
}

/// Expression types
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Null,
    Number(Number),
    String(String),
    DateTime(DateTime<Utc>),
    LocalDateTime(NaiveDateTime),
    /// Reference to a result column alias, parameter or attribute.
    Alias(String),
    Between {
        operand: Box<Expression>,
        min: Box<Expression>,
        max: Box<Expression>,
    },
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Case {
        base: Option<Box<Expression>>,
        branches: Vec<CaseBranch>,
        else_value: Option<Box<Expression>>,
    },
    Collate {
        operand: Box<Expression>,
        collation: String,
    },
    Column(ColumnRef),
    Compound {
        operator: CompoundOperator,
        operands: Vec<Expression>,
    },
    CountRows,
    Exists(Box<Expression>),
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    GroupConcat(GroupConcat),
    In {
        operand: Box<Expression>,
        values: Vec<Expression>,
    },
    InSelect {
        operand: Box<Expression>,
        select: Box<Select>,
    },
    IsNull(Box<Expression>),
    Search(SearchTerm),
    Select(Box<Select>),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
}

impl ExpressionKind {
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            ExpressionKind::Null => ExpressionType::Null,
            ExpressionKind::Number(_) => ExpressionType::Number,
            ExpressionKind::String(_) => ExpressionType::String,
            ExpressionKind::DateTime(_) => ExpressionType::DateTime,
            ExpressionKind::LocalDateTime(_) => ExpressionType::LocalDateTime,
            ExpressionKind::Alias(_) => ExpressionType::Alias,
            ExpressionKind::Between { .. } => ExpressionType::Between,
            ExpressionKind::Binary { .. } => ExpressionType::Binary,
            ExpressionKind::Case { .. } => ExpressionType::Case,
            ExpressionKind::Collate { .. } => ExpressionType::Collate,
            ExpressionKind::Column(_) => ExpressionType::Column,
            ExpressionKind::Compound { .. } => ExpressionType::Compound,
            ExpressionKind::CountRows => ExpressionType::CountRows,
            ExpressionKind::Exists(_) => ExpressionType::Exists,
            ExpressionKind::FunctionCall { .. } => ExpressionType::Function,
            ExpressionKind::GroupConcat(_) => ExpressionType::GroupConcat,
            ExpressionKind::In { .. } => ExpressionType::In,
            ExpressionKind::InSelect { .. } => ExpressionType::InSelect,
            ExpressionKind::IsNull(_) => ExpressionType::IsNull,
            ExpressionKind::Search(_) => ExpressionType::Search,
            ExpressionKind::Select(_) => ExpressionType::Select,
            ExpressionKind::Unary { .. } => ExpressionType::Unary,
        }
    }
}

/// One `WHEN ... THEN ...` arm of a case expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub when: Expression,
    pub then: Expression,
}

impl CaseBranch {
    pub fn new(when: impl IntoExpression, then: impl IntoExpression) -> Self {
        CaseBranch {
            when: when.into_expression(),
            then: then.into_expression(),
        }
    }
}

/// A column of a system table, or of a table of one user database.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Table,
    pub column: String,
    /// Required exactly when `table` is a database table.
    pub database: Option<Reference>,
}

impl ColumnRef {
    pub fn is_valid(&self) -> bool {
        !self.column.is_empty() && self.table.is_system() == self.database.is_none()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(database) = &self.database {
            write!(f, "`{database}`.")?;
        }
        write!(f, "`{}`.`{}`", self.table.name(), self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupConcat {
    pub arguments: Vec<Expression>,
    pub distinct: bool,
    pub separator: Option<String>,
    pub order_by: Vec<OrderTerm>,
}

impl GroupConcat {
    pub fn new<I, T>(arguments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        GroupConcat {
            arguments: arguments.into_iter().map(IntoExpression::into_expression).collect(),
            distinct: false,
            separator: None,
            order_by: Vec::new(),
        }
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn add_order_by(mut self, term: OrderTerm) -> Self {
        self.order_by.push(term);
        self
    }

    pub fn is_valid(&self) -> bool {
        !self.arguments.is_empty()
            && self.arguments.iter().all(Expression::is_valid)
            && self.order_by.iter().all(OrderTerm::is_valid)
    }
}

impl fmt::Display for GroupConcat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GROUP_CONCAT(")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        write!(f, "{}", join_display(&self.arguments))?;
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", join_display(&self.order_by))?;
        }
        if let Some(separator) = &self.separator {
            write!(f, " SEPARATOR '{separator}'")?;
        }
        write!(f, ")")
    }
}

/// What a search term matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// A field of the searched database, by name.
    Field(String),
    /// A request parameter, written `$name` on the wire.
    Parameter(String),
}

impl SearchTarget {
    fn to_wire(&self) -> String {
        match self {
            SearchTarget::Field(name) => name.clone(),
            SearchTarget::Parameter(name) => format!("${name}"),
        }
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTarget::Field(name) => write!(f, "`{name}`"),
            SearchTarget::Parameter(name) => write!(f, "${name}"),
        }
    }
}

/// Full-text search over one database.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    pub database: Reference,
    pub target: SearchTarget,
    pub operator: SearchOperator,
    pub value: Option<String>,
    pub case_sensitive: bool,
    /// JSON path inside the target, for JSON fields.
    pub json: Option<String>,
}

impl SearchTerm {
    pub fn new(database: impl Into<Reference>, target: SearchTarget, operator: SearchOperator) -> Self {
        SearchTerm {
            database: database.into(),
            target,
            operator,
            value: None,
            case_sensitive: false,
            json: None,
        }
    }

    pub fn field(
        database: impl Into<Reference>,
        field: impl Into<String>,
        operator: SearchOperator,
    ) -> Self {
        SearchTerm::new(database, SearchTarget::Field(field.into()), operator)
    }

    pub fn parameter(
        database: impl Into<Reference>,
        parameter: impl Into<String>,
        operator: SearchOperator,
    ) -> Self {
        SearchTerm::new(database, SearchTarget::Parameter(parameter.into()), operator)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_json(mut self, path: impl Into<String>) -> Self {
        self.json = Some(path.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        match &self.target {
            SearchTarget::Field(name) | SearchTarget::Parameter(name) => !name.is_empty(),
        }
    }

    /// Evaluates the term against a candidate value on the client.
    pub fn matches(&self, candidate: &Value) -> bool {
        let expected = self.value.as_deref().map_or(Value::Null, Value::from);
        if self.case_sensitive {
            if let (Some(a), Some(b)) = (candidate.as_str(), expected.as_str()) {
                return match self.operator {
                    SearchOperator::Contains => a.contains(b),
                    SearchOperator::NotContains => !a.contains(b),
                    SearchOperator::StartsWith => a.starts_with(b),
                    SearchOperator::NotStartsWith => !a.starts_with(b),
                    SearchOperator::EndsWith => a.ends_with(b),
                    SearchOperator::NotEndsWith => !a.ends_with(b),
                    op => op.eval(candidate, &expected),
                };
            }
        }
        self.operator.eval(candidate, &expected)
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = &self.value else {
            return write!(f, "all");
        };
        write!(f, "{}", self.target)?;
        if let Some(json) = &self.json {
            write!(f, "{{{json}}}")?;
        }
        write!(f, " {} \"{value}\"", self.operator)
    }
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Expression { kind, meta: None }
    }

    pub fn with_meta(mut self, meta: JsonValue) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn expression_type(&self) -> ExpressionType {
        self.kind.expression_type()
    }

    pub fn null() -> Self {
        Expression::new(ExpressionKind::Null)
    }

    pub fn int(value: i64) -> Self {
        Expression::new(ExpressionKind::Number(Number::from(value)))
    }

    /// Non-finite values have no wire form and become `NULL`.
    pub fn float(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Expression::new(ExpressionKind::Number(n)),
            None => {
                warn!(value, "Non-finite number replaced by NULL");
                Expression::null()
            }
        }
    }

    pub fn number(value: Number) -> Self {
        Expression::new(ExpressionKind::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::String(value.into()))
    }

    pub fn datetime(value: DateTime<Utc>) -> Self {
        Expression::new(ExpressionKind::DateTime(value))
    }

    pub fn local_datetime(value: NaiveDateTime) -> Self {
        Expression::new(ExpressionKind::LocalDateTime(value))
    }

    pub fn alias_ref(alias: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::Alias(alias.into()))
    }

    /// Column of a system table.
    pub fn column(table: impl Into<Table>, column: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::Column(ColumnRef {
            table: table.into(),
            column: column.into(),
            database: None,
        }))
    }

    /// Column of a per-database table.
    pub fn database_column(
        database: impl Into<Reference>,
        table: crate::table::DatabaseTable,
        column: impl Into<String>,
    ) -> Self {
        Expression::new(ExpressionKind::Column(ColumnRef {
            table: Table::Database(table),
            column: column.into(),
            database: Some(database.into()),
        }))
    }

    pub fn binary(left: impl IntoExpression, operator: BinaryOperator, right: impl IntoExpression) -> Self {
        Expression::new(ExpressionKind::Binary {
            left: Box::new(left.into_expression()),
            operator,
            right: Box::new(right.into_expression()),
        })
    }

    pub fn unary(operator: UnaryOperator, operand: impl IntoExpression) -> Self {
        Expression::new(ExpressionKind::Unary {
            operator,
            operand: Box::new(operand.into_expression()),
        })
    }

    pub fn compound<I, T>(operator: CompoundOperator, operands: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        Expression::new(ExpressionKind::Compound {
            operator,
            operands: operands.into_iter().map(IntoExpression::into_expression).collect(),
        })
    }

    pub fn function<I, T>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        Expression::new(ExpressionKind::FunctionCall {
            name: name.into(),
            arguments: arguments.into_iter().map(IntoExpression::into_expression).collect(),
        })
    }

    pub fn case(
        branches: Vec<CaseBranch>,
        base: Option<Expression>,
        else_value: Option<Expression>,
    ) -> Self {
        Expression::new(ExpressionKind::Case {
            base: base.map(Box::new),
            branches,
            else_value: else_value.map(Box::new),
        })
    }

    pub fn count_rows() -> Self {
        Expression::new(ExpressionKind::CountRows)
    }

    pub fn exists(select: Select) -> Self {
        Expression::new(ExpressionKind::Exists(Box::new(select.into_expression())))
    }

    pub fn group_concat(group_concat: GroupConcat) -> Self {
        Expression::new(ExpressionKind::GroupConcat(group_concat))
    }

    pub fn search(term: SearchTerm) -> Self {
        Expression::new(ExpressionKind::Search(term))
    }

    pub fn select(select: Select) -> Self {
        Expression::new(ExpressionKind::Select(Box::new(select)))
    }

    pub fn and(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::And, other)
    }

    pub fn or(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Or, other)
    }

    pub fn equal(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Equal, other)
    }

    pub fn not_equal(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::NotEqual, other)
    }

    pub fn lt(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Less, other)
    }

    pub fn lte(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::LessOrEqual, other)
    }

    pub fn gt(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Greater, other)
    }

    pub fn gte(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::GreaterOrEqual, other)
    }

    pub fn is(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Is, other)
    }

    pub fn is_null(self) -> Self {
        Expression::new(ExpressionKind::IsNull(Box::new(self)))
    }

    pub fn is_not_null(self) -> Self {
        Expression::unary(UnaryOperator::Not, self.is_null())
    }

    pub fn like(self, pattern: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Like, pattern)
    }

    pub fn regexp(self, pattern: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Regexp, pattern)
    }

    pub fn plus(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Plus, other)
    }

    pub fn minus(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Minus, other)
    }

    pub fn multiply(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Multiply, other)
    }

    pub fn divide(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Divide, other)
    }

    pub fn modulo(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::Modulo, other)
    }

    pub fn bit_and(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::BitAnd, other)
    }

    pub fn bit_or(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::BitOr, other)
    }

    pub fn shift_left(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::ShiftLeft, other)
    }

    pub fn shift_right(self, other: impl IntoExpression) -> Self {
        Expression::binary(self, BinaryOperator::ShiftRight, other)
    }

    pub fn negate(self) -> Self {
        Expression::unary(UnaryOperator::Negate, self)
    }

    pub fn bit_invert(self) -> Self {
        Expression::unary(UnaryOperator::BitInvert, self)
    }

    pub fn between(self, min: impl IntoExpression, max: impl IntoExpression) -> Self {
        Expression::new(ExpressionKind::Between {
            operand: Box::new(self),
            min: Box::new(min.into_expression()),
            max: Box::new(max.into_expression()),
        })
    }

    /// An empty list can never match and yields the false literal.
    pub fn in_list<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoExpression,
    {
        let values: Vec<Expression> = values.into_iter().map(IntoExpression::into_expression).collect();
        if values.is_empty() {
            return Expression::int(0);
        }
        Expression::new(ExpressionKind::In {
            operand: Box::new(self),
            values,
        })
    }

    pub fn in_select(self, select: Select) -> Self {
        Expression::new(ExpressionKind::InSelect {
            operand: Box::new(self),
            select: Box::new(select),
        })
    }

    pub fn collate(self, collation: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::Collate {
            operand: Box::new(self),
            collation: collation.into(),
        })
    }

    pub fn alias(self, alias: impl Into<String>) -> ResultColumn {
        ResultColumn::new(self).with_alias(alias)
    }
}

fn child(obj: &JsonObject, key: &str, expected: &str, ctx: &dyn ApiContext) -> Result<Box<Expression>> {
    Expression::load(wire::required(obj, key, expected)?, ctx).map(Box::new)
}

fn optional_child(obj: &JsonObject, key: &str, ctx: &dyn ApiContext) -> Result<Option<Box<Expression>>> {
    wire::field(obj, key)
        .map(|json| Expression::load(json, ctx).map(Box::new))
        .transpose()
}

fn children(obj: &JsonObject, key: &str, expected: &str, ctx: &dyn ApiContext) -> Result<Vec<Expression>> {
    load_all(wire::array(obj, key, expected)?, ctx)
}

fn load_column(obj: &JsonObject, ctx: &dyn ApiContext) -> Result<ColumnRef> {
    let table = Table::parse(&wire::string(obj, "table", "col")?)?;
    let column = wire::string(obj, "column", "col")?;
    match (table.is_system(), wire::field(obj, "database").is_some()) {
        (true, true) => Err(ApiError::parse(
            "col",
            table.name(),
            "system tables take no database",
        )),
        (false, false) => Err(ApiError::parse(
            "col",
            table.name(),
            "database tables need a database",
        )),
        (true, false) => Ok(ColumnRef {
            table,
            column,
            database: None,
        }),
        (false, true) => {
            let database = wire::database(obj, "database", ctx)?;
            Ok(ColumnRef {
                table,
                column,
                database: Some(Reference::from(&*database)),
            })
        }
    }
}

fn load_search(obj: &JsonObject, ctx: &dyn ApiContext) -> Result<SearchTerm> {
    let database = wire::database(obj, "database", ctx)?;
    let target = match Specifier::from_json(wire::required(obj, "search", "search")?)? {
        Specifier::Name(name) if name.starts_with('$') => {
            SearchTarget::Parameter(name[1..].to_string())
        }
        spec => SearchTarget::Field(database.field(&spec)?.name().to_string()),
    };
    Ok(SearchTerm {
        database: Reference::from(&*database),
        target,
        operator: SearchOperator::from_json(wire::required(obj, "op", "search")?)?,
        value: wire::optional_string(obj, "value", "search")?,
        case_sensitive: wire::flag(obj, "cs"),
        json: wire::optional_string(obj, "json", "search")?,
    })
}

fn load_case(obj: &JsonObject, ctx: &dyn ApiContext) -> Result<ExpressionKind> {
    let branches = wire::array(obj, "cases", "case")?
        .iter()
        .map(|json| {
            let branch = wire::object(json, "case")?;
            Ok(CaseBranch {
                when: *child(branch, "when", "case", ctx)?,
                then: *child(branch, "then", "case", ctx)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ExpressionKind::Case {
        base: optional_child(obj, "base", ctx)?,
        branches,
        else_value: optional_child(obj, "else", ctx)?,
    })
}

impl ApiComponent for Expression {
    const COMPONENT: &'static str = "expression";

    fn is_valid(&self) -> bool {
        match &self.kind {
            ExpressionKind::Null
            | ExpressionKind::Number(_)
            | ExpressionKind::DateTime(_)
            | ExpressionKind::LocalDateTime(_)
            | ExpressionKind::CountRows => true,
            ExpressionKind::String(value) => !value.is_empty(),
            ExpressionKind::Alias(alias) => !alias.is_empty(),
            ExpressionKind::Between { operand, min, max } => {
                operand.is_valid() && min.is_valid() && max.is_valid()
            }
            ExpressionKind::Binary { left, right, .. } => left.is_valid() && right.is_valid(),
            ExpressionKind::Case {
                base,
                branches,
                else_value,
            } => {
                !branches.is_empty()
                    && base.as_ref().is_none_or(|e| e.is_valid())
                    && else_value.as_ref().is_none_or(|e| e.is_valid())
                    && branches.iter().all(|b| b.when.is_valid() && b.then.is_valid())
            }
            ExpressionKind::Collate { operand, collation } => {
                operand.is_valid() && !collation.is_empty()
            }
            ExpressionKind::Column(column) => column.is_valid(),
            ExpressionKind::Compound { operands, .. } => {
                !operands.is_empty() && operands.iter().all(Expression::is_valid)
            }
            ExpressionKind::Exists(operand) | ExpressionKind::IsNull(operand) => operand.is_valid(),
            ExpressionKind::FunctionCall { name, arguments } => {
                !name.is_empty() && arguments.iter().all(Expression::is_valid)
            }
            ExpressionKind::GroupConcat(group_concat) => group_concat.is_valid(),
            ExpressionKind::In { operand, values } => {
                operand.is_valid() && values.iter().all(Expression::is_valid)
            }
            ExpressionKind::InSelect { operand, select } => operand.is_valid() && select.is_valid(),
            ExpressionKind::Search(term) => term.is_valid(),
            ExpressionKind::Select(select) => select.is_valid(),
            ExpressionKind::Unary { operand, .. } => operand.is_valid(),
        }
    }

    fn build(&self, pretty: bool) -> Result<JsonValue> {
        let out = WireObject::tagged(self.expression_type().name()).put_opt("meta", self.meta.clone());
        let out = match &self.kind {
            ExpressionKind::Null | ExpressionKind::CountRows => out,
            ExpressionKind::Number(n) => out.put("value", n.clone()),
            ExpressionKind::String(s) => out.put("value", s.as_str()),
            ExpressionKind::DateTime(dt) => {
                out.put("value", dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            ExpressionKind::LocalDateTime(dt) => {
                out.put("value", dt.format(LOCAL_DATETIME_FORMAT).to_string())
            }
            ExpressionKind::Alias(alias) => out.put("alias", alias.as_str()),
            ExpressionKind::Between { operand, min, max } => out
                .put("e", operand.build(pretty)?)
                .put("min", min.build(pretty)?)
                .put("max", max.build(pretty)?),
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => out
                .put("op", operator.name())
                .put("e1", left.build(pretty)?)
                .put("e2", right.build(pretty)?),
            ExpressionKind::Case {
                base,
                branches,
                else_value,
            } => {
                let cases = branches
                    .iter()
                    .map(|b| {
                        Ok(WireObject::new()
                            .put("when", b.when.build(pretty)?)
                            .put("then", b.then.build(pretty)?)
                            .build())
                    })
                    .collect::<Result<Vec<_>>>()?;
                out.put("cases", cases)
                    .put_opt("base", base.as_ref().map(|e| e.build(pretty)).transpose()?)
                    .put_opt("else", else_value.as_ref().map(|e| e.build(pretty)).transpose()?)
            }
            ExpressionKind::Collate { operand, collation } => out
                .put("e", operand.build(pretty)?)
                .put("collation", to_identifier(collation)?),
            ExpressionKind::Column(column) => out
                .put("table", column.table.name())
                .put("column", to_identifier(&column.column)?)
                .put_opt(
                    "database",
                    to_optional_specifier(column.database.as_ref(), pretty)?.map(|s| s.to_json()),
                ),
            ExpressionKind::Compound { operator, operands } => out
                .put("op", operator.name())
                .put("expressions", build_all(operands, pretty)?),
            ExpressionKind::Exists(operand) | ExpressionKind::IsNull(operand) => {
                out.put("e", operand.build(pretty)?)
            }
            ExpressionKind::FunctionCall { name, arguments } => out
                .put("function", name.as_str())
                .put("args", build_all(arguments, pretty)?),
            ExpressionKind::GroupConcat(group_concat) => out
                .put("args", build_all(&group_concat.arguments, pretty)?)
                .put("distinct", group_concat.distinct)
                .put_opt("separator", group_concat.separator.clone())
                .put_list("order", build_all(&group_concat.order_by, pretty)?),
            ExpressionKind::In { operand, values } => out
                .put("e", operand.build(pretty)?)
                .put("values", build_all(values, pretty)?),
            ExpressionKind::InSelect { operand, select } => out
                .put("e", operand.build(pretty)?)
                .put("select", select.build(pretty)?),
            ExpressionKind::Search(term) => out
                .put("database", to_specifier(Some(&term.database), pretty)?.to_json())
                .put("search", term.target.to_wire())
                .put("op", term.operator.name())
                .put_opt("value", term.value.clone())
                .put("cs", term.case_sensitive)
                .put_opt("json", term.json.clone()),
            ExpressionKind::Select(select) => out.put("select", select.build(pretty)?),
            ExpressionKind::Unary { operator, operand } => out
                .put("op", operator.name())
                .put("e", operand.build(pretty)?),
        };
        Ok(out.build())
    }

    /// Bare scalars are shorthand: booleans read as 1/0, numbers and
    /// strings as literals.
    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self> {
        let obj = match json {
            JsonValue::Bool(b) => return Ok(Expression::int(i64::from(*b))),
            JsonValue::Number(n) => return Ok(Expression::number(n.clone())),
            JsonValue::String(s) => return Ok(Expression::string(s.as_str())),
            other => wire::object(other, "expression")?,
        };
        let expression_type = ExpressionType::from_json(wire::required(obj, "type", "expression")?)?;
        trace!(expression = expression_type.name(), "Loading expression");

        let kind = match expression_type {
            ExpressionType::Null => ExpressionKind::Null,
            ExpressionType::Number => match wire::required(obj, "value", "number")? {
                JsonValue::Number(n) => ExpressionKind::Number(n.clone()),
                other => return Err(ApiError::parse("number", other, "expected a number")),
            },
            ExpressionType::String => ExpressionKind::String(wire::text(obj, "value", "string")?),
            ExpressionType::DateTime => {
                let value = wire::string(obj, "value", "dt")?;
                let parsed = parse_timestamp(&value)
                    .ok_or_else(|| ApiError::parse("dt", &value, "not an ISO-8601 timestamp"))?;
                ExpressionKind::DateTime(parsed)
            }
            ExpressionType::LocalDateTime => {
                let value = wire::string(obj, "value", "ldt")?;
                let parsed = parse_local_datetime(&value)
                    .ok_or_else(|| ApiError::parse("ldt", &value, "not an ISO-8601 date time"))?;
                ExpressionKind::LocalDateTime(parsed)
            }
            ExpressionType::Alias => ExpressionKind::Alias(wire::string(obj, "alias", "alias")?),
            ExpressionType::Between => ExpressionKind::Between {
                operand: child(obj, "e", "between", ctx)?,
                min: child(obj, "min", "between", ctx)?,
                max: child(obj, "max", "between", ctx)?,
            },
            ExpressionType::Binary => ExpressionKind::Binary {
                left: child(obj, "e1", "binary", ctx)?,
                operator: BinaryOperator::from_json(wire::required(obj, "op", "binary")?)?,
                right: child(obj, "e2", "binary", ctx)?,
            },
            ExpressionType::Case => load_case(obj, ctx)?,
            ExpressionType::Collate => ExpressionKind::Collate {
                operand: child(obj, "e", "collate", ctx)?,
                collation: wire::string(obj, "collation", "collate")?,
            },
            ExpressionType::Column => ExpressionKind::Column(load_column(obj, ctx)?),
            ExpressionType::Compound => ExpressionKind::Compound {
                operator: CompoundOperator::from_json(wire::required(obj, "op", "compound")?)?,
                operands: children(obj, "expressions", "compound", ctx)?,
            },
            ExpressionType::CountRows => ExpressionKind::CountRows,
            ExpressionType::Exists => ExpressionKind::Exists(child(obj, "e", "exists", ctx)?),
            ExpressionType::Function => ExpressionKind::FunctionCall {
                name: wire::string(obj, "function", "function")?,
                arguments: load_all(wire::optional_array(obj, "args", "function")?, ctx)?,
            },
            ExpressionType::GroupConcat => ExpressionKind::GroupConcat(GroupConcat {
                arguments: children(obj, "args", "group_concat", ctx)?,
                distinct: wire::flag(obj, "distinct"),
                separator: wire::optional_string(obj, "separator", "group_concat")?,
                order_by: load_all(wire::optional_array(obj, "order", "group_concat")?, ctx)?,
            }),
            ExpressionType::In => ExpressionKind::In {
                operand: child(obj, "e", "in", ctx)?,
                values: children(obj, "values", "in", ctx)?,
            },
            ExpressionType::InSelect => ExpressionKind::InSelect {
                operand: child(obj, "e", "in_select", ctx)?,
                select: Box::new(Select::load(wire::required(obj, "select", "in_select")?, ctx)?),
            },
            ExpressionType::IsNull => ExpressionKind::IsNull(child(obj, "e", "is_null", ctx)?),
            ExpressionType::Search => ExpressionKind::Search(load_search(obj, ctx)?),
            ExpressionType::Select => ExpressionKind::Select(Box::new(Select::load(
                wire::required(obj, "select", "select")?,
                ctx,
            )?)),
            ExpressionType::Unary => ExpressionKind::Unary {
                operator: UnaryOperator::from_json(wire::required(obj, "op", "unary")?)?,
                operand: child(obj, "e", "unary", ctx)?,
            },
        };

        Ok(Expression {
            kind,
            meta: wire::field(obj, "meta").cloned(),
        })
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Null => write!(f, "NULL"),
            ExpressionKind::Number(n) => write!(f, "{n}"),
            ExpressionKind::String(s) => write!(f, "'{s}'"),
            ExpressionKind::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ExpressionKind::LocalDateTime(dt) => write!(f, "{}", dt.format(LOCAL_DATETIME_FORMAT)),
            ExpressionKind::Alias(alias) => write!(f, "`{alias}`"),
            ExpressionKind::Between { operand, min, max } => {
                write!(f, "({operand}) BETWEEN ({min}) AND ({max})")
            }
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => write!(f, "({left}) {operator} ({right})"),
            ExpressionKind::Case {
                base,
                branches,
                else_value,
            } => {
                write!(f, "CASE")?;
                if let Some(base) = base {
                    write!(f, " ({base})")?;
                }
                for branch in branches {
                    write!(f, " WHEN ({}) THEN ({})", branch.when, branch.then)?;
                }
                if let Some(else_value) = else_value {
                    write!(f, " ELSE ({else_value})")?;
                }
                write!(f, " END")
            }
            ExpressionKind::Collate { operand, collation } => write!(f, "({operand}) COLLATE {collation}"),
            ExpressionKind::Column(column) => write!(f, "{column}"),
            ExpressionKind::Compound { operator, operands } => {
                let parts = operands.iter().map(|e| format!("({e})")).collect::<Vec<_>>();
                let separator = format!(" {operator} ");
                write!(f, "{}", parts.join(separator.as_str()))
            }
            ExpressionKind::CountRows => write!(f, "COUNT(*)"),
            ExpressionKind::Exists(operand) => write!(f, "EXISTS ({operand})"),
            ExpressionKind::FunctionCall { name, arguments } => {
                write!(f, "{}({})", name.to_uppercase(), join_display(arguments))
            }
            ExpressionKind::GroupConcat(group_concat) => write!(f, "{group_concat}"),
            ExpressionKind::In { operand, values } => write!(f, "{operand} IN ({})", join_display(values)),
            ExpressionKind::InSelect { operand, select } => write!(f, "{operand} IN ({select})"),
            ExpressionKind::IsNull(operand) => write!(f, "{operand} IS NULL"),
            ExpressionKind::Search(term) => write!(f, "{term}"),
            ExpressionKind::Select(select) => write!(f, "({select})"),
            ExpressionKind::Unary { operator, operand } => write!(f, "{operator} ({operand})"),
        }
    }
}

impl std::ops::Not for Expression {
    type Output = Expression;

    fn not(self) -> Expression {
        Expression::unary(UnaryOperator::Not, self)
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self.negate()
    }
}

macro_rules! binary_op {
    ($($trait:ident, $method:ident => $sugar:ident;)+) => {
        $(
            impl<R: IntoExpression> std::ops::$trait<R> for Expression {
                type Output = Expression;

                fn $method(self, rhs: R) -> Expression {
                    self.$sugar(rhs)
                }
            }
        )+
    };
}

binary_op! {
    Add, add => plus;
    Sub, sub => minus;
    Mul, mul => multiply;
    Div, div => divide;
    Rem, rem => modulo;
    BitAnd, bitand => bit_and;
    BitOr, bitor => bit_or;
    Shl, shl => shift_left;
    Shr, shr => shift_right;
}
