//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of result records
//! - Summary counts per priority

use crate::domain::ResultRecord;
use crate::output::{OutputFormatter, Summary};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Framework package the results were computed for
    framework: String,
    /// Target framework major
    target_major: u64,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(framework: impl Into<String>, target_major: u64) -> Self {
        Self {
            framework: framework.into(),
            target_major,
        }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Framework package name
    framework: &'a str,
    /// Summary statistics
    summary: JsonSummary,
    /// One record per dependency, in output order
    records: &'a [ResultRecord],
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    counts: Summary,
    /// Target framework major
    target_major: u64,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, records: &[ResultRecord], writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            framework: &self.framework,
            summary: JsonSummary {
                counts: Summary::from_records(records),
                target_major: self.target_major,
            },
            records,
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
