//! Final result rows, one per dependency entry

use super::{DependencyEntry, Priority, Recommendation};
use serde::{Serialize, Serializer};
use std::fmt;

/// Sentinel for values that are structurally inapplicable
pub const NOT_APPLICABLE: &str = "n/a";

/// Sentinel for values that could not be determined because of a failure
pub const UNKNOWN: &str = "Unknown";

/// Column headers in output order
pub const COLUMN_HEADERS: [&str; 11] = [
    "name",
    "dev",
    "current",
    "latest",
    "earliest_compatible",
    "latest_compatible",
    "peer_requirement",
    "distance",
    "recommendation",
    "note",
    "migration_link",
];

/// A rendered cell value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A concrete value
    Value(String),
    /// Inapplicable for this package
    NotApplicable,
    /// Could not be determined
    Unknown,
}

impl Field {
    /// Creates a value field
    pub fn value(v: impl Into<String>) -> Self {
        Field::Value(v.into())
    }

    /// Value when present, otherwise `n/a`
    pub fn or_not_applicable(v: Option<impl Into<String>>) -> Self {
        v.map_or(Field::NotApplicable, |v| Field::Value(v.into()))
    }

    /// Value when present, otherwise `Unknown`
    pub fn or_unknown(v: Option<impl Into<String>>) -> Self {
        v.map_or(Field::Unknown, |v| Field::Value(v.into()))
    }

    /// Returns the concrete value, if any
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => write!(f, "{}", v),
            Field::NotApplicable => write!(f, "{}", NOT_APPLICABLE),
            Field::Unknown => write!(f, "{}", UNKNOWN),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Final output row for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub name: String,
    pub is_dev: bool,
    pub current: Field,
    pub latest: Field,
    pub earliest_compatible: Field,
    pub latest_compatible: Field,
    pub peer_requirement: Field,
    pub distance: Field,
    pub priority: Priority,
    pub target_version: Field,
    pub note: String,
    pub migration_link: Field,
}

impl ResultRecord {
    /// Row for a package whose processing failed entirely
    pub fn failed(entry: &DependencyEntry, note: impl Into<String>) -> Self {
        Self {
            name: entry.name.clone(),
            is_dev: entry.is_dev,
            current: Field::or_unknown(entry.current_version().map(|v| v.to_string())),
            latest: Field::Unknown,
            earliest_compatible: Field::Unknown,
            latest_compatible: Field::Unknown,
            peer_requirement: Field::Unknown,
            distance: Field::Unknown,
            priority: Priority::Unknown,
            target_version: Field::NotApplicable,
            note: note.into(),
            migration_link: Field::NotApplicable,
        }
    }

    /// The recommendation carried by this row
    pub fn recommendation(&self) -> Recommendation {
        Recommendation::new(
            self.priority,
            self.target_version.as_value().map(str::to_string),
            self.note.clone(),
        )
    }

    /// Cell values in `COLUMN_HEADERS` order
    pub fn columns(&self) -> [String; 11] {
        [
            self.name.clone(),
            self.is_dev.to_string(),
            self.current.to_string(),
            self.latest.to_string(),
            self.earliest_compatible.to_string(),
            self.latest_compatible.to_string(),
            self.peer_requirement.to_string(),
            self.distance.to_string(),
            self.recommendation().to_string(),
            self.note.clone(),
            self.migration_link.to_string(),
        ]
    }
}
