//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible predicates to be applied to a list of hospitals.

use crate::query::QueryTerms;
use directory::Hospital;
use rayon::prelude::*;

/// Lists at least this long are filtered on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// A single search predicate.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared with a debounce task
/// - A filter that is not active for the given terms must leave the list
///   untouched, which is how empty query fields impose no constraint
/// - `apply` takes ownership of the Vec and must keep the input order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether this filter constrains anything for `terms`
    fn is_active(&self, terms: &QueryTerms) -> bool;

    /// Whether `hospital` passes this filter. Only called when active.
    fn matches(&self, hospital: &Hospital, terms: &QueryTerms) -> bool;

    /// Apply this filter to a set of hospitals, preserving their order.
    fn apply(&self, hospitals: Vec<Hospital>, terms: &QueryTerms) -> Vec<Hospital> {
        if !self.is_active(terms) {
            return hospitals;
        }
        if hospitals.len() >= PARALLEL_THRESHOLD {
            // indexed parallel collect keeps input order
            hospitals
                .into_par_iter()
                .filter(|h| self.matches(h, terms))
                .collect()
        } else {
            hospitals
                .into_iter()
                .filter(|h| self.matches(h, terms))
                .collect()
        }
    }
}
