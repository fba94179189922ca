//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Production vs development dependency grouping
//! - Priority labels with colors
//! - Peer ranges, compatible windows and migration links in verbose mode
//! - Summary with a per-priority breakdown

use crate::domain::{Priority, ResultRecord};
use crate::output::{OutputFormatter, Summary, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Minimum width of the name column
const MIN_NAME_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
    /// Framework package name shown in the header
    framework: String,
    /// Target framework major
    target_major: u64,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, framework: impl Into<String>, target_major: u64) -> Self {
        Self::with_color(verbosity, true, framework, target_major)
    }

    /// Create a new text formatter with color option
    pub fn with_color(
        verbosity: Verbosity,
        color: bool,
        framework: impl Into<String>,
        target_major: u64,
    ) -> Self {
        Self {
            verbosity,
            color,
            framework: framework.into(),
            target_major,
        }
    }

    fn priority_label(&self, priority: Priority) -> String {
        if !self.color {
            return priority.label().to_string();
        }
        match priority {
            Priority::MustUpgrade => priority.label().red().bold().to_string(),
            Priority::OptionalUpgrade => priority.label().yellow().to_string(),
            Priority::Keep => priority.label().green().to_string(),
            Priority::Unknown => priority.label().dimmed().to_string(),
        }
    }

    /// Format a single result line
    fn format_record(
        &self,
        record: &ResultRecord,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let label = self.priority_label(record.priority);
        let target = record
            .target_version
            .as_value()
            .map(|v| format!(" {}", v))
            .unwrap_or_default();

        if self.color {
            let name_display = format!("{:width$}", record.name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} [{}{}] {}",
                name_display,
                record.current.to_string().dimmed(),
                "→".dimmed(),
                record.latest.to_string().bright_white().bold(),
                label,
                target,
                record.note.dimmed()
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}{}] {}",
                record.name,
                record.current,
                record.latest,
                label,
                target,
                record.note,
                width = max_name_len
            )?;
        }

        if self.verbosity == Verbosity::Verbose {
            self.format_details(record, max_name_len, writer)?;
        }
        Ok(())
    }

    fn format_details(
        &self,
        record: &ResultRecord,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let details = format!(
            "peer: {}  compatible: {}..{}  distance: {}  guide: {}",
            record.peer_requirement,
            record.earliest_compatible,
            record.latest_compatible,
            record.distance,
            record.migration_link
        );
        let indent = " ".repeat(max_name_len + 3);
        if self.color {
            writeln!(writer, "{}{}", indent, details.dimmed())
        } else {
            writeln!(writer, "{}{}", indent, details)
        }
    }

    fn format_group(
        &self,
        title: &str,
        records: &[&ResultRecord],
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if self.color {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        for record in records {
            self.format_record(record, max_name_len, writer)?;
        }
        writeln!(writer)
    }

    fn format_summary(&self, summary: &Summary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.total == 0 {
            return writeln!(writer, "No dependencies to check");
        }

        let parts: Vec<String> = Priority::ALL
            .iter()
            .filter(|p| summary.count(**p) > 0)
            .map(|p| format!("{} {}", summary.count(*p), self.priority_label(*p)))
            .collect();

        if self.color {
            writeln!(
                writer,
                "{}: {} package(s) ({})",
                "Summary".bold(),
                summary.total,
                parts.join(", ")
            )
        } else {
            writeln!(
                writer,
                "Summary: {} package(s) ({})",
                summary.total,
                parts.join(", ")
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, records: &[ResultRecord], writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = Summary::from_records(records);

        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&summary, writer);
        }

        let header = format!("{} {}", self.framework, self.target_major);
        if self.color {
            writeln!(writer, "Compatibility with {}", header.cyan().bold())?;
        } else {
            writeln!(writer, "Compatibility with {}", header)?;
        }
        writeln!(writer)?;

        let max_name_len = records
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max(MIN_NAME_WIDTH);

        let (dev, prod): (Vec<&ResultRecord>, Vec<&ResultRecord>) =
            records.iter().partition(|r| r.is_dev);
        self.format_group("Dependencies", &prod, max_name_len, writer)?;
        self.format_group("Dev dependencies", &dev, max_name_len, writer)?;

        self.format_summary(&summary, writer)
    }
}
