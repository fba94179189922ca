//! Output formatting for compatibility results
//!
//! This module provides:
//! - Text output for human-readable display
//! - CSV output in the fixed column order
//! - JSON output for machine processing

mod csv;
mod json;
mod text;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::domain::{Priority, ResultRecord};
use serde::Serialize;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// Comma-separated values
    Csv,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Summary only
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Adds peer ranges, compatible windows and migration links
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, csv, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
    /// Framework package the results were computed for
    pub framework: String,
    /// Target framework major
    pub target_major: u64,
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(
        format: OutputFormat,
        verbosity: Verbosity,
        framework: impl Into<String>,
        target_major: u64,
    ) -> Self {
        Self {
            format,
            verbosity,
            color: true,
            framework: framework.into(),
            target_major,
        }
    }

    /// Create configuration from CLI flags
    pub fn from_cli(
        json: bool,
        csv: bool,
        verbose: bool,
        quiet: bool,
        framework: impl Into<String>,
        target_major: u64,
    ) -> Self {
        let format = if json {
            OutputFormat::Json
        } else if csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self::new(format, verbosity, framework, target_major)
    }
}

/// Counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub must_upgrade: usize,
    pub optional_upgrade: usize,
    pub keep: usize,
    pub unknown: usize,
}

impl Summary {
    /// Tally a set of records
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut summary = Summary {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.priority {
                Priority::MustUpgrade => summary.must_upgrade += 1,
                Priority::OptionalUpgrade => summary.optional_upgrade += 1,
                Priority::Keep => summary.keep += 1,
                Priority::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    /// Count for one priority
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::MustUpgrade => self.must_upgrade,
            Priority::OptionalUpgrade => self.optional_upgrade,
            Priority::Keep => self.keep,
            Priority::Unknown => self.unknown,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the sorted result records
    fn format(&self, records: &[ResultRecord], writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.color,
            config.framework,
            config.target_major,
        )),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.framework, config.target_major)),
    }
}
