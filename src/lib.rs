//! peercheck - framework compatibility checker library
//!
//! This library provides the core functionality for checking npm
//! dependencies against a target framework major:
//! - Scanning each package's release history for compatible versions
//! - Classifying versions by peer requirement or heuristics
//! - Recommending an action and a target version per package
//! - Running packages concurrently on a bounded worker pool

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod migration;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod recommend;
pub mod registry;
pub mod scan;
pub mod version;
