//! Error types for signature-derived CLIs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The declared target shape is invalid (ordering, duplicates, nesting).
    /// Raised at construction time, never at parse time.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A declared type has no coercion strategy.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// User-input parse failure, passed through from the parsing layer.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// A field name that was never declared.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for field {0}: {1}")]
    FieldValue(String, String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
