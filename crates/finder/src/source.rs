//! Record sources for the finder.
//!
//! The session treats its source as read-only input that is fetched once
//! on load and again only on an explicit reload.

use crate::error::Result;
use directory::{Hospital, HospitalDirectory};
use std::path::PathBuf;

/// Supplies the hospital list.
///
/// `fetch` may block (disk, network); the session runs it on the blocking
/// pool.
pub trait HospitalSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<Vec<Hospital>>;
}

/// Fixed, in-memory list of hospitals.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    hospitals: Vec<Hospital>,
}

impl StaticSource {
    pub fn new(hospitals: Vec<Hospital>) -> Self {
        Self { hospitals }
    }

    /// The built-in sample directory
    pub fn sample() -> Self {
        Self::new(HospitalDirectory::sample().into_hospitals())
    }
}

impl HospitalSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self) -> Result<Vec<Hospital>> {
        Ok(self.hospitals.clone())
    }
}

/// Hospitals read from a JSON file or a directory of JSON files on each
/// fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HospitalSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self) -> Result<Vec<Hospital>> {
        let directory = HospitalDirectory::load_from_path(&self.path)?;
        Ok(directory.into_hospitals())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinderError;

    #[test]
    fn test_static_source() {
        let hospitals = StaticSource::sample().fetch().unwrap();
        assert_eq!(hospitals.len(), 6);
    }

    #[test]
    fn test_file_source_missing_path() {
        let err = FileSource::new("/no/such/hospitals.json").fetch().unwrap_err();
        assert!(matches!(err, FinderError::Directory(_)));
    }
}
