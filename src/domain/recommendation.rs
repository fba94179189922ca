//! Recommendation and version-distance types

use serde::{Deserialize, Serialize};
use std::fmt;

/// How urgently a dependency needs attention for the target framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// The current version does not work with the target
    MustUpgrade,
    /// The current version works but a newer compatible one exists
    OptionalUpgrade,
    /// Nothing to do
    Keep,
    /// Could not be determined
    Unknown,
}

impl Priority {
    /// All priorities in display order
    pub const ALL: [Priority; 4] = [
        Priority::MustUpgrade,
        Priority::OptionalUpgrade,
        Priority::Keep,
        Priority::Unknown,
    ];

    /// The label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            Priority::MustUpgrade => "MustUpgrade",
            Priority::OptionalUpgrade => "OptionalUpgrade",
            Priority::Keep => "Keep",
            Priority::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Recommended action for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Priority of the action
    pub priority: Priority,
    /// Version to move to, when there is one
    pub target_version: Option<String>,
    /// Human-readable explanation
    pub note: String,
}

impl Recommendation {
    /// Creates a new recommendation
    pub fn new(priority: Priority, target_version: Option<String>, note: impl Into<String>) -> Self {
        Self {
            priority,
            target_version,
            note: note.into(),
        }
    }

    /// Keep the current version
    pub fn keep(note: impl Into<String>) -> Self {
        Self::new(Priority::Keep, None, note)
    }

    /// Optionally upgrade to the given version
    pub fn optional(target: impl Into<String>, note: impl Into<String>) -> Self {
        Self::new(Priority::OptionalUpgrade, Some(target.into()), note)
    }

    /// Upgrade is required; target may be unavailable
    pub fn must(target: Option<String>, note: impl Into<String>) -> Self {
        Self::new(Priority::MustUpgrade, target, note)
    }

    /// Nothing could be determined
    pub fn unknown(note: impl Into<String>) -> Self {
        Self::new(Priority::Unknown, None, note)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target_version {
            Some(target) => write!(f, "{} {}", self.priority, target),
            None => write!(f, "{}", self.priority),
        }
    }
}

/// The version component a distance is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceComponent {
    Major,
    Minor,
    Patch,
}

impl DistanceComponent {
    fn singular(&self) -> &'static str {
        match self {
            DistanceComponent::Major => "major",
            DistanceComponent::Minor => "minor",
            DistanceComponent::Patch => "patch",
        }
    }

    fn plural(&self) -> &'static str {
        match self {
            DistanceComponent::Major => "majors",
            DistanceComponent::Minor => "minors",
            DistanceComponent::Patch => "patches",
        }
    }
}

/// How far the current version is from the comparison baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Distance {
    /// Same release
    Equal,
    /// Current is newer than the baseline
    Ahead,
    /// Current is behind; the first differing component wins
    Behind {
        component: DistanceComponent,
        count: u64,
    },
    /// Current or baseline could not be parsed
    Unparsable,
    /// There is no baseline to compare against
    NoBaseline,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Equal => write!(f, "equal"),
            Distance::Ahead => write!(f, "ahead"),
            Distance::Behind { component, count } => {
                let unit = if *count == 1 {
                    component.singular()
                } else {
                    component.plural()
                };
                write!(f, "{} {} behind", count, unit)
            }
            Distance::Unparsable => write!(f, "unparsable"),
            Distance::NoBaseline => write!(f, "n/a"),
        }
    }
}
