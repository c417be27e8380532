//! Error types for the directory crate.
//!
//! Loading records from disk is the only fallible part of the directory;
//! lookups return `Option` and filtering never fails.

use thiserror::Error;

/// Errors that can occur while loading or validating hospital records
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// File or directory could not be found
    #[error("Failed to open path: {path}")]
    PathNotFound { path: String },

    /// I/O error occurred while reading a record file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A record file was not a valid JSON array of hospitals
    ///
    /// Keeps the file name so a bad file in a directory load is easy to find
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two records share the same identifier
    #[error("Duplicate hospital id: {id}")]
    DuplicateId { id: String },

    /// A record field had an invalid value
    #[error("Invalid value for {field} on hospital {id}: {reason}")]
    InvalidValue {
        id: String,
        field: String,
        reason: String,
    },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, DirectoryError>;
