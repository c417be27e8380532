//! Building and validating the HospitalDirectory.
//!
//! - Load record files (a single JSON file or a directory of them)
//! - Insert records, rejecting duplicate ids
//! - Derive the list of specialties present in the data
//! - Validate the loaded records

use crate::error::{DirectoryError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl HospitalDirectory {
    /// Load hospitals from a JSON file, or from every `*.json` file in a
    /// directory.
    ///
    /// Directory files are parsed in parallel and merged in file-name order,
    /// so the resulting record order does not depend on thread scheduling.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        info!("Loading hospitals from {:?}", path);

        if !path.exists() {
            return Err(DirectoryError::PathNotFound {
                path: path.display().to_string(),
            });
        }

        let files = if path.is_dir() {
            record_files_in(path)?
        } else {
            vec![path.to_path_buf()]
        };

        // collect() on an indexed parallel iterator keeps input order
        let parsed: Vec<Result<Vec<Hospital>>> = files
            .par_iter()
            .map(|file| parser::parse_hospitals_file(file))
            .collect();

        let mut directory = HospitalDirectory::new();
        for (file, hospitals) in files.iter().zip(parsed) {
            let hospitals = hospitals?;
            debug!("Parsed {} hospitals from {:?}", hospitals.len(), file);
            for hospital in hospitals {
                directory.insert(hospital)?;
            }
        }

        directory.validate()?;

        info!(
            "Loaded {} hospitals from {} file(s)",
            directory.len(),
            files.len()
        );
        Ok(directory)
    }

    /// Build a directory from records already in memory.
    pub fn from_hospitals(hospitals: impl IntoIterator<Item = Hospital>) -> Result<Self> {
        let mut directory = HospitalDirectory::new();
        for hospital in hospitals {
            directory.insert(hospital)?;
        }
        Ok(directory)
    }

    /// Append a hospital, keeping insertion order.
    ///
    /// Fails with `DuplicateId` if a hospital with the same id is present.
    pub fn insert(&mut self, hospital: Hospital) -> Result<()> {
        if self.by_id.contains_key(&hospital.id) {
            return Err(DirectoryError::DuplicateId { id: hospital.id });
        }
        self.by_id.insert(hospital.id.clone(), self.hospitals.len());
        self.hospitals.push(hospital);
        Ok(())
    }

    /// Distinct specialties present in the directory, sorted.
    pub fn specialties(&self) -> Vec<String> {
        self.hospitals
            .iter()
            .flat_map(|h| h.specialties.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate record integrity
    ///
    /// Check that:
    /// - every hospital has a non-empty id and name
    /// - specialty tags are lowercase
    pub fn validate(&self) -> Result<()> {
        for hospital in &self.hospitals {
            if hospital.id.trim().is_empty() {
                return Err(DirectoryError::InvalidValue {
                    id: hospital.id.clone(),
                    field: "id".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if hospital.name.trim().is_empty() {
                return Err(DirectoryError::InvalidValue {
                    id: hospital.id.clone(),
                    field: "name".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if let Some(tag) = hospital
                .specialties
                .iter()
                .find(|t| t.chars().any(char::is_uppercase))
            {
                return Err(DirectoryError::InvalidValue {
                    id: hospital.id.clone(),
                    field: "specialty".to_string(),
                    reason: format!("tag {:?} is not lowercase", tag),
                });
            }
        }
        Ok(())
    }

    /// The built-in sample directory used when no data path is given.
    pub fn sample() -> Self {
        let hospitals = [
            Hospital::new(
                "1",
                "Kamalnayan Bajaj Hospital",
                "Mumbai, Maharashtra",
                &["cardiology", "orthopedics", "neurology"],
            ),
            Hospital::new(
                "2",
                "Apollo Hospitals",
                "Chennai, Tamil Nadu",
                &["oncology", "cardiology", "pediatrics"],
            ),
            Hospital::new(
                "3",
                "Fortis Memorial Research Institute",
                "Gurugram, Haryana",
                &["neurology", "orthopedics", "dermatology"],
            ),
            Hospital::new(
                "4",
                "Max Super Specialty Hospital",
                "Delhi, NCR",
                &["cardiology", "oncology", "pediatrics"],
            ),
            Hospital::new(
                "5",
                "Kokilaben Dhirubhai Ambani Hospital",
                "Mumbai, Maharashtra",
                &["neurology", "cardiology", "orthopedics"],
            ),
            Hospital::new(
                "6",
                "Manipal Hospitals",
                "Bangalore, Karnataka",
                &["pediatrics", "oncology", "dermatology"],
            ),
        ];

        let mut directory = HospitalDirectory::new();
        for hospital in hospitals {
            let hospital = hospital.with_website("https://example.com");
            directory.by_id.insert(hospital.id.clone(), directory.hospitals.len());
            directory.hospitals.push(hospital);
        }
        directory
    }
}

/// `*.json` files directly inside `dir`, sorted by file name
fn record_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
