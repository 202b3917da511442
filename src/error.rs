//! Defines the crate's primary error type `AppError` and a convenience `Result` alias.
//!
//! Uses the `thiserror` crate for ergonomic error definition and provides `From`
//! implementations to convert common external errors into `AppError` variants.
//! Errors that do not implement `Clone` are wrapped in `Arc` so `AppError` stays cloneable,
//! which matters because the shared handle may hand the same failure to many callers.

use std::sync::Arc;
use thiserror::Error;

/// The primary error enumeration for all crate-specific errors.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// A required connection variable is unset or empty.
    #[error("Missing configuration: environment variable {0} is not set")]
    MissingConfig(&'static str),

    /// An optional variable is present but malformed, or pool settings contradict each other.
    #[error("Invalid configuration: {var}={value:?} ({reason})")]
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A pool was requested outside a Tokio runtime.
    #[error("No Tokio runtime: the connection handle must be built from within a runtime")]
    NoRuntime,

    /// Error originating from the MySQL client (`sqlx`).
    #[error("Database Error: {0}")]
    Db(Arc<sqlx::Error>),

    /// Error while rendering output as JSON (`serde_json`).
    #[error("JSON Error: {0}")]
    Json(Arc<serde_json::Error>),

    /// Error related to standard I/O operations.
    #[error("I/O Error: {0}")]
    Io(Arc<std::io::Error>),

    /// Error originating from user interaction prompts (`dialoguer`).
    #[error("Dialoguer Error: {0}")]
    Dialoguer(Arc<dialoguer::Error>),

    /// Error related to progress spinner templating (`indicatif`).
    #[error("Progress Style Template Error: {0}")]
    Template(Arc<indicatif::style::TemplateError>),
}

/// A specialized `Result` type using the crate's `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

// --- From implementations ---
// These allow easy conversion from external error types into AppError
// using the `?` operator. Arc is used for non-Clone error types.

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Db(Arc::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(Arc::new(err))
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Dialoguer(Arc::new(err))
    }
}

impl From<indicatif::style::TemplateError> for AppError {
    fn from(err: indicatif::style::TemplateError) -> Self {
        AppError::Template(Arc::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_the_variable() {
        let err = AppError::MissingConfig("DB_HOST");
        assert_eq!(
            err.to_string(),
            "Missing configuration: environment variable DB_HOST is not set"
        );
    }

    #[test]
    fn invalid_config_includes_value_and_reason() {
        let err = AppError::InvalidConfig {
            var: "DB_PORT",
            value: "abc".to_string(),
            reason: "expected an integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration: DB_PORT=\"abc\" (expected an integer)"
        );
    }

    #[test]
    fn no_runtime_explains_the_requirement() {
        assert!(AppError::NoRuntime.to_string().contains("Tokio runtime"));
    }

    #[test]
    fn db_errors_convert_and_stay_cloneable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        let cloned = err.clone();
        assert!(matches!(cloned, AppError::Db(_)));
        assert!(cloned.to_string().starts_with("Database Error:"));
    }
}
