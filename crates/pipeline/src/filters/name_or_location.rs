//! Filter for the free-text name search box.
//!
//! The search box is permissive: a hospital matches when the term appears
//! at the start of its name, at the start of any word of its name, anywhere
//! in its name, or anywhere in its location. The first two cases are
//! contained in the third, so the observable rule is "name or location
//! contains the term".

use crate::query::QueryTerms;
use crate::traits::Filter;
use directory::Hospital;

/// Keeps hospitals whose name or location contains the name term.
///
/// ## Algorithm
/// Case-insensitive substring test on the lowercased name, then on the
/// lowercased location. The term is already trimmed and lowercased.
pub struct NameOrLocationFilter;

impl Filter for NameOrLocationFilter {
    fn name(&self) -> &str {
        "NameOrLocationFilter"
    }

    fn is_active(&self, terms: &QueryTerms) -> bool {
        terms.name.is_some()
    }

    fn matches(&self, hospital: &Hospital, terms: &QueryTerms) -> bool {
        let Some(term) = terms.name.as_deref() else {
            return true;
        };
        hospital.name.to_lowercase().contains(term)
            || hospital.location.to_lowercase().contains(term)
    }
}
