use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Input that cannot be parsed into the expected type or node.
    #[error("Invalid {expected} ({value}): {reason}")]
    Parse {
        expected: String,
        value: String,
        reason: String,
    },

    /// A name outside of a closed registry.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid specifier: {0}")]
    Specifier(String),

    #[error("{kind} not found: {specifier}")]
    NotFound {
        kind: &'static str,
        specifier: String,
    },

    /// Raised only by an explicit `validate()` call.
    #[error("Validation failed for {component}: {detail}")]
    Validation { component: String, detail: String },
}

impl ApiError {
    pub fn parse(
        expected: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        ApiError::Parse {
            expected: expected.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown(kind: &'static str, value: impl fmt::Display) -> Self {
        ApiError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }

    pub fn not_found(kind: &'static str, specifier: impl fmt::Display) -> Self {
        ApiError::NotFound {
            kind,
            specifier: specifier.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ApiError::parse("int(1)", "200", "greater than 127");
        assert_eq!(err.to_string(), "Invalid int(1) (200): greater than 127");

        let err = ApiError::unknown("binary operator", "xor");
        assert_eq!(err.to_string(), "Unknown binary operator: xor");

        let err = ApiError::not_found("database", "sales.orders");
        assert_eq!(err.to_string(), "database not found: sales.orders");
    }
}
