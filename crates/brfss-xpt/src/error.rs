//! Error types for XPT decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading XPT files.
#[derive(Debug, Error)]
pub enum XptError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid XPT file format.
    #[error("invalid XPT file: {message}")]
    InvalidFormat { message: String },

    /// Missing required header record.
    #[error("missing header: expected {expected}")]
    MissingHeader { expected: &'static str },

    /// The file uses a transport version this reader does not decode.
    #[error("unsupported transport version: {version}")]
    UnsupportedVersion { version: &'static str },

    /// Invalid NAMESTR record.
    #[error("invalid NAMESTR at index {index}: {message}")]
    InvalidNamestr { index: usize, message: String },

    /// Numeric header field parsing error.
    #[error("failed to parse numeric field: {field}")]
    NumericParse { field: String },

    /// Float conversion error (IEEE/IBM).
    #[error("float conversion error: {message}")]
    FloatConversion { message: String },

    /// Observation data overflow.
    #[error("observation length overflow")]
    ObservationOverflow,

    /// Truncated final observation that is not blank padding.
    #[error("unexpected trailing bytes in observations")]
    TrailingBytes,

    /// A character value could not be decoded with the selected encoding.
    #[error("column {column}, row {row}: value is not valid {encoding}")]
    Encoding {
        column: String,
        row: usize,
        encoding: &'static str,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XPT operations.
pub type Result<T> = std::result::Result<T, XptError>;

impl XptError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a MissingHeader error.
    pub fn missing_header(expected: &'static str) -> Self {
        Self::MissingHeader { expected }
    }

    /// Whether retrying with a different text encoding could succeed.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }
}
