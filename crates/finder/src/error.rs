//! Error types for the finder session.

use directory::DirectoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    /// The session was created outside a tokio runtime, so the debounce
    /// timer has nowhere to run
    #[error("Search session requires a tokio runtime")]
    NoRuntime,

    /// Records could not be read from disk
    #[error("Failed to load hospitals: {0}")]
    Directory(#[from] DirectoryError),

    /// Any other record source failure
    #[error("Hospital source failed: {0}")]
    Source(String),

    #[error("Load task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, FinderError>;
