//! Finder crate for the Medisphere hospital search.
//!
//! This crate wraps the pure filter from `pipeline` in a session that
//! debounces query edits, tracks whether records loaded, and publishes
//! result sets to subscribers.

pub mod config;
pub mod debounce;
pub mod error;
pub mod session;
pub mod source;

pub use config::{DEFAULT_DEBOUNCE, FinderConfig};
pub use debounce::Debouncer;
pub use error::{FinderError, Result};
pub use session::{LoadState, SearchResults, SearchSession};
pub use source::{FileSource, HospitalSource, StaticSource};
