//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{write_csv, CSV_HEADER};
pub use json_format::write_json;
pub use plain::{
    print_error, print_info, print_results, print_scan_header, print_success, print_warning,
    write_compact, write_plain, write_scan_header,
};

use crate::error::ExportResult;
use crate::scanner::ScanResult;
use std::fmt;
use std::io::Write;

/// File formats results can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// JSON array of records
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Write `results` in this format.
    pub fn write<W: Write>(self, writer: W, results: &[ScanResult]) -> ExportResult<()> {
        match self {
            Self::Csv => write_csv(writer, results),
            Self::Json => write_json(writer, results),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Json => write!(f, "JSON"),
        }
    }
}
