pub mod core;
pub mod error;
pub mod schema;
pub mod specifier;

pub use crate::core::{
    format::FormatOptions,
    types::{TypeKind, XType},
    value::Value,
};
pub use error::{ApiError, Result};
pub use specifier::{Reference, Specifier, to_identifier, to_optional_specifier, to_specifier};
