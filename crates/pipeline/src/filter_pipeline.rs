//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! filters together using the builder pattern. A hospital survives the
//! pipeline only if every active filter accepts it.

use crate::filters::{LocationFilter, NameOrLocationFilter, SpecialtyFilter};
use crate::query::QueryState;
use crate::traits::Filter;
use directory::Hospital;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(NameOrLocationFilter)
///     .add_filter(LocationFilter)
///     .add_filter(SpecialtyFilter);
///
/// let results = pipeline.apply(hospitals, &query);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The finder's pipeline: name/location, then location, then specialty.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(NameOrLocationFilter)
            .add_filter(LocationFilter)
            .add_filter(SpecialtyFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the hospitals.
    ///
    /// ## Algorithm
    /// 1. Normalize the query into match terms once
    /// 2. For each filter in order:
    ///    a. Skip it if inactive for these terms
    ///    b. Apply it, logging input and output counts
    /// 3. Return the surviving hospitals in their original order
    pub fn apply(&self, hospitals: Vec<Hospital>, query: &QueryState) -> Vec<Hospital> {
        let terms = query.terms();
        let mut current = hospitals;
        for filter in &self.filters {
            if !filter.is_active(&terms) {
                continue;
            }
            if current.is_empty() {
                break;
            }
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, &terms);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::standard()
    }
}
