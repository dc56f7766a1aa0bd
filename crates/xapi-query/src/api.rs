use serde_json::Value as JsonValue;
use std::fmt;
use xapi_model::{ApiError, Result, schema::ApiContext};

/// Protocol shared by every request node.
///
/// `build` and `load` are inverse over the wire form: loading the output of
/// `build(false)` yields a node that builds to the same JSON.
pub trait ApiComponent: Sized + Clone + fmt::Display {
    /// Name used in validation errors.
    const COMPONENT: &'static str;

    /// Structural validity, recomputed over the whole subtree on each call.
    fn is_valid(&self) -> bool;

    /// Serializes to the wire form. Pretty mode renders schema references
    /// as dotted paths and is meant for debugging only.
    fn build(&self, pretty: bool) -> Result<JsonValue>;

    fn load(json: &JsonValue, ctx: &dyn ApiContext) -> Result<Self>;

    fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                component: Self::COMPONENT.to_string(),
                detail: self.to_string(),
            })
        }
    }
}

pub(crate) fn build_all<T: ApiComponent>(items: &[T], pretty: bool) -> Result<Vec<JsonValue>> {
    items.iter().map(|item| item.build(pretty)).collect()
}

pub(crate) fn load_all<T: ApiComponent>(items: &[JsonValue], ctx: &dyn ApiContext) -> Result<Vec<T>> {
    items.iter().map(|item| T::load(item, ctx)).collect()
}

/// Joins the display forms with `", "`.
pub(crate) fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
