//! Structured error types for the report engine.
//!
//! Layout and PDF serialization never fail. Errors only come from the edges:
//! parsing input JSON, editing a record with values outside its catalogs,
//! decoding photos, and reading configuration.

use thiserror::Error;

/// The unified error type returned by the public `laudo` API.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON input failed to parse as a valid report request.
    #[error("Failed to parse report input: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// A damage type that is not part of the fixed catalog.
    #[error("Unknown damage type: '{0}'")]
    UnknownDamageType(String),
    /// An operation on a damage type that has not been selected on the record.
    #[error("Damage type '{0}' is not selected on this record")]
    DamageNotSelected(String),
    /// An engineer registration state that is not a Brazilian federative unit.
    #[error("Unknown state code: '{0}'")]
    UnknownStateCode(String),
    /// A photo payload that is not a supported image data URI.
    #[error("Invalid photo: {0}")]
    InvalidPhoto(String),
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the inspection record schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::ParseError { source: e, hint }
    }
}

/// Failure reported by an external capability (geocoder, description service).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no result for '{0}'")]
    NotFound(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}
