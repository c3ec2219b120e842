//! Readiness-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("Page element not found: {id}")]
    MissingElement { id: String },

    #[error("Page element cannot perform {action}: {id}")]
    UnsupportedAction { id: String, action: String },

    #[error("Quotation status request failed: {message}")]
    QuotationProbe { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Event channel closed")]
    ChannelClosed,

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl ReadinessError {
    pub fn missing(id: impl Into<String>) -> Self {
        ReadinessError::MissingElement { id: id.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        ReadinessError::ConfigurationError { field: field.into() }
    }
}

pub type ReadinessResult<T> = Result<T, ReadinessError>;
