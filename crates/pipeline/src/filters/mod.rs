//! Filter implementations for the hospital finder.
//!
//! One filter per search input; `FilterPipeline::standard()` chains all
//! three.

pub mod location;
pub mod name_or_location;
pub mod specialty;

// Re-export for convenience
pub use location::LocationFilter;
pub use name_or_location::NameOrLocationFilter;
pub use specialty::SpecialtyFilter;
