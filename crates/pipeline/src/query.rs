//! Query state for the hospital finder.
//!
//! `QueryState` is an immutable snapshot of the three search inputs. Every
//! edit produces a new snapshot, so a snapshot handed to the filter can
//! never change underneath it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three search inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryField {
    /// Free-text name search (also matches location)
    Name,
    Location,
    Specialty,
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QueryField::Name => "name",
            QueryField::Location => "location",
            QueryField::Specialty => "specialty",
        };
        f.write_str(label)
    }
}

impl FromStr for QueryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "q" => Ok(QueryField::Name),
            "location" => Ok(QueryField::Location),
            "specialty" | "tag" => Ok(QueryField::Specialty),
            other => Err(format!("unknown query field: {}", other)),
        }
    }
}

/// Snapshot of the current search inputs.
///
/// Empty fields impose no constraint. Use the `with_*` methods to derive a
/// new snapshot:
///
/// ```ignore
/// let query = QueryState::new().with_name_query("apo").with_tag_query("cardio");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryState {
    name_query: String,
    location_query: String,
    tag_query: String,
}

impl QueryState {
    /// Empty query; matches every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn location_query(&self) -> &str {
        &self.location_query
    }

    pub fn tag_query(&self) -> &str {
        &self.tag_query
    }

    pub fn with_name_query(self, value: impl Into<String>) -> Self {
        Self {
            name_query: value.into(),
            ..self
        }
    }

    pub fn with_location_query(self, value: impl Into<String>) -> Self {
        Self {
            location_query: value.into(),
            ..self
        }
    }

    pub fn with_tag_query(self, value: impl Into<String>) -> Self {
        Self {
            tag_query: value.into(),
            ..self
        }
    }

    /// New snapshot with `field` replaced by `value`
    pub fn with_field(self, field: QueryField, value: impl Into<String>) -> Self {
        match field {
            QueryField::Name => self.with_name_query(value),
            QueryField::Location => self.with_location_query(value),
            QueryField::Specialty => self.with_tag_query(value),
        }
    }

    pub fn field(&self, field: QueryField) -> &str {
        match field {
            QueryField::Name => &self.name_query,
            QueryField::Location => &self.location_query,
            QueryField::Specialty => &self.tag_query,
        }
    }

    /// True when no field is set (a whitespace-only field counts as set)
    pub fn is_empty(&self) -> bool {
        self.name_query.is_empty() && self.location_query.is_empty() && self.tag_query.is_empty()
    }

    /// Lowercased match terms, computed once per filter pass.
    pub fn terms(&self) -> QueryTerms {
        QueryTerms {
            name: non_empty(self.name_query.trim().to_lowercase()),
            location: non_empty(self.location_query.to_lowercase()),
            specialty: non_empty(self.tag_query.to_lowercase()),
        }
    }
}

/// Normalized terms the filters match against.
///
/// `None` means the corresponding predicate is inactive. Only the name term
/// is trimmed; location and specialty are used as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTerms {
    pub name: Option<String>,
    pub location: Option<String>,
    pub specialty: Option<String>,
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
