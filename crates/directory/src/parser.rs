//! Parser for hospital record files.
//!
//! A record file is a JSON array of hospital documents:
//!
//! ```json
//! [
//!   { "_id": "2", "name": "Apollo Hospitals", "location": "Chennai, Tamil Nadu",
//!     "specialty": ["oncology", "cardiology"], "website": "https://example.com" }
//! ]
//! ```
//!
//! Specialty tags are lowercased on the way in; everything else is kept
//! exactly as written.

use crate::error::{DirectoryError, Result};
use crate::types::Hospital;
use std::fs;
use std::path::Path;

/// Parse a JSON array of hospitals from a string.
///
/// `file` is only used to label parse errors.
pub fn parse_hospitals(json: &str, file: &str) -> Result<Vec<Hospital>> {
    let mut hospitals: Vec<Hospital> =
        serde_json::from_str(json).map_err(|source| DirectoryError::ParseError {
            file: file.to_string(),
            source,
        })?;

    for hospital in &mut hospitals {
        normalize_specialties(hospital);
    }
    Ok(hospitals)
}

/// Read and parse a single record file
pub fn parse_hospitals_file(path: &Path) -> Result<Vec<Hospital>> {
    if !path.exists() {
        return Err(DirectoryError::PathNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_hospitals(&content, &file)
}

fn normalize_specialties(hospital: &mut Hospital) {
    for tag in &mut hospital.specialties {
        let trimmed = tag.trim();
        if trimmed.len() != tag.len() || trimmed.chars().any(char::is_uppercase) {
            *tag = trimmed.to_lowercase();
        }
    }
}
