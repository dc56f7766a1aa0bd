pub mod api;
pub mod ast;
pub mod builder;
pub mod expressible;
pub mod kind;
pub mod macros;
pub mod operator;
pub mod table;
pub mod variant;
mod wire;

pub use api::ApiComponent;
pub use ast::{
    CaseBranch, ColumnRef, Constraint, Expression, ExpressionKind, GroupConcat, Join, OrderTerm,
    ResultColumn, SearchTarget, SearchTerm, Select, Source, SourceKind,
};
pub use builder::select::SelectBuilder;
pub use expressible::{IntoExpression, IntoResultColumn, IntoSource};
pub use variant::Variant;
pub use xapi_model::{ApiError, Result};

#[doc(hidden)]
pub mod __private {
    pub use lazy_static::lazy_static;
    pub use serde;
}
