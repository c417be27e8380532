//! # Directory Crate
//!
//! This crate holds the hospital records the finder searches over.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Hospital, HospitalDirectory, SPECIALTIES)
//! - **parser**: Parse JSON record files into Rust structs
//! - **index**: Load, insert, and validate directory contents
//! - **error**: Error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use directory::HospitalDirectory;
//! use std::path::Path;
//!
//! let directory = HospitalDirectory::load_from_path(Path::new("data/hospitals.json"))?;
//! let apollo = directory.get("2").unwrap();
//! println!("{} ({})", apollo.name, apollo.location);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DirectoryError, Result};
pub use types::{Hospital, HospitalDirectory, HospitalId, SPECIALTIES};
