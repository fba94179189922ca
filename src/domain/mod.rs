//! Core domain models for peercheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency entries read from the project manifest
//! - Per-version verdicts and the per-package compatibility aggregate
//! - Recommendations and version-distance descriptors
//! - Final result rows

mod compatibility;
mod dependency;
mod record;
mod recommendation;

pub use compatibility::{CompatibilityResult, CompatibilityVerdict, Probe};
pub use dependency::DependencyEntry;
pub use record::{Field, ResultRecord, COLUMN_HEADERS};
pub use recommendation::{Distance, DistanceComponent, Priority, Recommendation};
