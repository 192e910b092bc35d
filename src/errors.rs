/*!
 * Error types for the lingport library.
 *
 * Each codec concern gets its own enum so callers can decide how fatal a
 * failure is: a malformed structured value may only cost one field, while an
 * unsupported XLIFF version aborts the whole import. `AppError` wraps them
 * all for the binary.
 */

use thiserror::Error;

use crate::value_codec::ValueEncoding;

/// Errors raised by the structured value codec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// The encoded text could not be turned back into a value
    #[error("Malformed {encoding} value: {reason}")]
    Malformed {
        /// Encoding the text claimed to use
        encoding: ValueEncoding,
        /// What the underlying decoder reported
        reason: String,
    },

    /// The value has no representation in the requested encoding
    #[error("Value cannot be encoded as {encoding}: {reason}")]
    Unrepresentable {
        /// Requested encoding
        encoding: ValueEncoding,
        /// Why encoding failed
        reason: String,
    },

    /// The encoding name is not one we know
    #[error("Unknown value encoding: {0}")]
    UnknownEncoding(String),
}

/// Errors raised by the format registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Nothing is registered under the given key
    #[error("No format registered for {kind} '{key}'")]
    NotFound {
        /// What was looked up: extension, mime type or filetype
        kind: &'static str,
        /// The value that failed to resolve
        key: String,
    },

    /// The same extension and version were registered twice
    #[error("Format already registered: {0}")]
    Duplicate(String),

    /// The format exists but cannot run in this build or environment
    #[error("Format {format} is not supported: {reason}")]
    Unsupported {
        /// Filetype of the unavailable format, e.g. `xliff_2.1`
        format: String,
        /// Why it is unavailable
        reason: String,
    },
}

/// Errors raised while decoding an interchange file
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be read
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid UTF-8
    #[error("Import file is not valid UTF-8")]
    NotUtf8,

    /// No codec for this file
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// The XML could not be parsed
    #[error("Malformed XML: {}", .0.join("; "))]
    MalformedXml(Vec<String>),

    /// The XLIFF root carries no version attribute
    #[error("XLIFF document does not declare a version")]
    MissingVersion,

    /// The XLIFF major version is not one we can read
    #[error("Unsupported XLIFF version: {0}")]
    UnsupportedVersion(String),

    /// A single message or unit was unusable and the policy says abort
    #[error("Malformed entry #{position}: {reason}")]
    MalformedEntry {
        /// 1-based position of the entry in the file
        position: usize,
        /// What was wrong with it
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the structured value codec
    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    /// Error from the format registry
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Error while importing
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
