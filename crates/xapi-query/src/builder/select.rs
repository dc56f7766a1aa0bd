use crate::{
    ast::{order_term::OrderTerm, select::Select},
    expressible::{IntoExpression, IntoResultColumn, IntoSource},
};

#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    ast: Select,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.ast.distinct = true;
        self
    }

    pub fn column(mut self, column: impl IntoResultColumn) -> Self {
        self.ast.columns.push(column.into_result_column());
        self
    }

    pub fn columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoResultColumn,
    {
        self.ast
            .columns
            .extend(columns.into_iter().map(IntoResultColumn::into_result_column));
        self
    }

    pub fn union(mut self, select: Select) -> Self {
        self.ast.unions.push(select);
        self
    }

    pub fn from(mut self, source: impl IntoSource) -> Self {
        self.ast.from = Some(source.into_source());
        self
    }

    pub fn where_clause(mut self, condition: impl IntoExpression) -> Self {
        self.ast.where_clause = Some(condition.into_expression());
        self
    }

    pub fn group_by(mut self, e: impl IntoExpression) -> Self {
        self.ast.group_by.push(e.into_expression());
        self
    }

    pub fn having(mut self, condition: impl IntoExpression) -> Self {
        self.ast.having = Some(condition.into_expression());
        self
    }

    pub fn order_by(mut self, term: OrderTerm) -> Self {
        self.ast.order_by.push(term);
        self
    }

    pub fn order_by_asc(self, e: impl IntoExpression) -> Self {
        self.order_by(OrderTerm::asc(e))
    }

    pub fn order_by_desc(self, e: impl IntoExpression) -> Self {
        self.order_by(OrderTerm::desc(e))
    }

    pub fn limit(mut self, limit: impl IntoExpression) -> Self {
        self.ast.limit = Some(limit.into_expression());
        self
    }

    pub fn offset(mut self, offset: impl IntoExpression) -> Self {
        self.ast.offset = Some(offset.into_expression());
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}
