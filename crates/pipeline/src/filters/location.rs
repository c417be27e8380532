//! Filter for the location input.

use crate::query::QueryTerms;
use crate::traits::Filter;
use directory::Hospital;

/// Keeps hospitals whose location contains the location term,
/// case-insensitively. A hospital with no location fails any non-empty term.
pub struct LocationFilter;

impl Filter for LocationFilter {
    fn name(&self) -> &str {
        "LocationFilter"
    }

    fn is_active(&self, terms: &QueryTerms) -> bool {
        terms.location.is_some()
    }

    fn matches(&self, hospital: &Hospital, terms: &QueryTerms) -> bool {
        match terms.location.as_deref() {
            Some(term) => hospital.location.to_lowercase().contains(term),
            None => true,
        }
    }
}
