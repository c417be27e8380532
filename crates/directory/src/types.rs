//! Core domain types for the hospital directory.
//!
//! This module defines the data structures shared by every other crate:
//! - `Hospital`, the searchable record
//! - `HospitalDirectory`, the insertion-ordered in-memory store
//! - `SPECIALTIES`, the catalog offered by the specialty selector

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque unique identifier for a hospital (a document id upstream)
pub type HospitalId = String;

/// Specialties offered by the specialty selector, in display order.
pub const SPECIALTIES: [&str; 6] = [
    "cardiology",
    "orthopedics",
    "oncology",
    "neurology",
    "pediatrics",
    "dermatology",
];

// =============================================================================
// Hospital
// =============================================================================

/// A hospital in the directory.
///
/// Field aliases accept the upstream document names (`_id`, `specialty`,
/// `logoUrl`). A missing or `null` location is read as an empty string and
/// missing specialties as an empty list, so such a record simply fails any
/// non-empty predicate instead of failing to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(alias = "_id")]
    pub id: HospitalId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    /// Lowercase category tags; order is insignificant
    #[serde(default, alias = "specialty", deserialize_with = "null_as_default")]
    pub specialties: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, alias = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Hospital {
    /// Create a hospital with no website or logo.
    pub fn new(
        id: impl Into<HospitalId>,
        name: impl Into<String>,
        location: impl Into<String>,
        specialties: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            website: String::new(),
            logo_url: None,
        }
    }

    /// Builder-style setter for the website link
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    /// Short specialty label for result cards: the first `max` tags,
    /// followed by "+N more" when some are hidden.
    ///
    /// ```ignore
    /// // ["oncology", "cardiology", "pediatrics"] with max = 2
    /// assert_eq!(h.specialty_summary(2), "oncology, cardiology +1 more");
    /// ```
    pub fn specialty_summary(&self, max: usize) -> String {
        let shown = self
            .specialties
            .iter()
            .take(max)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let hidden = self.specialties.len().saturating_sub(max);
        if hidden > 0 {
            format!("{} +{} more", shown, hidden)
        } else {
            shown
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// HospitalDirectory
// =============================================================================

/// In-memory store of hospitals.
///
/// Records are kept in insertion order, which is the order search results
/// are returned in. A side index gives O(1) lookup by id.
#[derive(Debug, Clone, Default)]
pub struct HospitalDirectory {
    pub(crate) hospitals: Vec<Hospital>,
    pub(crate) by_id: HashMap<HospitalId, usize>,
}

impl HospitalDirectory {
    /// Creates a new, empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// All hospitals in insertion order
    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// Get a hospital by id
    pub fn get(&self, id: &str) -> Option<&Hospital> {
        self.by_id.get(id).map(|&idx| &self.hospitals[idx])
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    /// Consume the directory, yielding its records in order
    pub fn into_hospitals(self) -> Vec<Hospital> {
        self.hospitals
    }
}
