//! Search/filter engine for the hospital finder.
//!
//! This crate provides:
//! - `QueryState`, an immutable snapshot of the three search inputs
//! - the Filter trait and one filter per input
//! - `FilterPipeline` for composing filters
//! - `filter`, the pure entry point used by the finder session
//!
//! ## Matching
//! A hospital is kept when it satisfies every non-empty input:
//! 1. name query: name or location contains the trimmed term
//! 2. location query: location contains the term
//! 3. specialty query: some specialty tag contains the term
//!
//! All comparisons are case-insensitive. The result keeps input order;
//! there is no ranking.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{filter, QueryState};
//!
//! let query = QueryState::new().with_name_query("apo");
//! let results = filter(directory.hospitals(), &query);
//! ```

pub mod traits;
pub mod query;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use query::{QueryField, QueryState, QueryTerms};
pub use filter_pipeline::FilterPipeline;

use directory::Hospital;

/// Filter `hospitals` with the standard pipeline.
///
/// Pure and deterministic: the input is not modified and the surviving
/// hospitals come back in input order.
pub fn filter(hospitals: &[Hospital], query: &QueryState) -> Vec<Hospital> {
    if query.is_empty() {
        return hospitals.to_vec();
    }
    FilterPipeline::standard().apply(hospitals.to_vec(), query)
}
