//! Filter for the specialty selector.

use crate::query::QueryTerms;
use crate::traits::Filter;
use directory::Hospital;

/// Keeps hospitals with at least one specialty tag containing the
/// specialty term.
///
/// ## Algorithm
/// Substring rather than equality, so "cardio" selects "cardiology".
/// Tags are lowercased again here because records built in memory may
/// not have gone through the loader.
pub struct SpecialtyFilter;

impl Filter for SpecialtyFilter {
    fn name(&self) -> &str {
        "SpecialtyFilter"
    }

    fn is_active(&self, terms: &QueryTerms) -> bool {
        terms.specialty.is_some()
    }

    fn matches(&self, hospital: &Hospital, terms: &QueryTerms) -> bool {
        let Some(term) = terms.specialty.as_deref() else {
            return true;
        };
        hospital
            .specialties
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
    }
}
