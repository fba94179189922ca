//! CSV output formatter
//!
//! One header row followed by one row per record, quoted per RFC 4180.

use crate::domain::{ResultRecord, COLUMN_HEADERS};
use crate::output::OutputFormatter;
use std::borrow::Cow;
use std::io::Write;

/// CSV formatter
#[derive(Debug, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new() -> Self {
        Self
    }

    fn write_row<'a>(
        &self,
        cells: impl IntoIterator<Item = &'a str>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let row: Vec<Cow<'a, str>> = cells.into_iter().map(escape).collect();
        writeln!(writer, "{}", row.join(","))
    }
}

/// Quote a cell when it contains a separator, quote or line break
fn escape(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

impl OutputFormatter for CsvFormatter {
    fn format(&self, records: &[ResultRecord], writer: &mut dyn Write) -> std::io::Result<()> {
        self.write_row(COLUMN_HEADERS, writer)?;
        for record in records {
            let columns = record.columns();
            self.write_row(columns.iter().map(String::as_str), writer)?;
        }
        Ok(())
    }
}
