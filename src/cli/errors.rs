use thiserror::Error;

use crate::app::errors::AppError;

/// Errors surfaced by the command line front end
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    #[error("Search failed: {message}")]
    Search { message: String },

    #[error("Request failed: {0}")]
    Request(#[from] AppError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::configuration(format!("{err:#}"))
    }
}

impl From<inquire::error::InquireError> for CliError {
    fn from(err: inquire::error::InquireError) -> Self {
        match err {
            inquire::error::InquireError::OperationCanceled
            | inquire::error::InquireError::OperationInterrupted => Self::UserCancelled,
            err => Self::Prompt { message: err.to_string() },
        }
    }
}
