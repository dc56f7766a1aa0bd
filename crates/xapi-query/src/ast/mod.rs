pub mod constraint;
pub mod expr;
pub mod order_term;
pub mod result_column;
pub mod select;
pub mod source;

pub use constraint::Constraint;
pub use expr::{
    CaseBranch, ColumnRef, Expression, ExpressionKind, GroupConcat, SearchTarget, SearchTerm,
};
pub use order_term::OrderTerm;
pub use result_column::ResultColumn;
pub use select::Select;
pub use source::{Join, Source, SourceKind};
