use serde_json::Value as JsonValue;
use std::fmt;
use xapi_model::{ApiError, Result};

/// A member of a closed registry of named constants.
///
/// Implemented by the [`variants!`](crate::variants) macro.
pub trait Variant: Copy + Eq + fmt::Display + 'static {
    /// Registry name used in error messages.
    const KIND: &'static str;

    /// Canonical wire name.
    fn name(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn aliases(&self) -> &'static [&'static str];

    /// Every member, in declaration order.
    fn values() -> &'static [Self];

    /// Looks up a canonical name or alias.
    fn parse(value: &str) -> Result<Self>;

    fn from_json(json: &JsonValue) -> Result<Self> {
        match json.as_str() {
            Some(s) => Self::parse(s),
            None => Err(ApiError::unknown(Self::KIND, json)),
        }
    }

    fn to_json(&self) -> JsonValue {
        JsonValue::from(self.name())
    }
}
