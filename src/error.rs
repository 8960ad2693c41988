//! Error types for payload extraction

use serde_json::Value;
use thiserror::Error;

/// Boxed error returned by external collaborators such as [`crate::AttachmentSource`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the individual extraction stages
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input had the wrong shape (non-list where a list was expected, etc.)
    #[error("Expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A required key is absent from an otherwise well-typed structure
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// One of the fixed matching patterns failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Base64 or UTF-8 decoding failed
    #[error("Failed to decode part {part}: {details}")]
    Encoding { part: String, details: String },

    /// Text normalization failed
    #[error("Failed to format text: {0}")]
    Formatting(String),

    /// The attachment collaborator failed to deliver data
    #[error("Failed to fetch attachment {attachment_id}: {source}")]
    Source {
        attachment_id: String,
        #[source]
        source: BoxError,
    },

    /// Anything not classified above
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ExtractError {
    pub fn type_mismatch(expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: json_kind(found).to_string(),
        }
    }
}

/// Errors raised by [`crate::assemble`]
#[derive(Error, Debug)]
pub enum AssembleError {
    /// The payload lacked a key the extraction required
    #[error("Missing key in message payload: {key}")]
    Payload { key: String },

    /// Any other extraction failure
    #[error("Failed to extract message: {0}")]
    Service(#[source] ExtractError),
}

impl From<ExtractError> for AssembleError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::MissingKey(key) => Self::Payload { key },
            other => Self::Service(other),
        }
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

pub const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
