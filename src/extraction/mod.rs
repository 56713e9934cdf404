//! Listing field extraction.
//!
//! Raw listing text is turned into a fully populated [`ListingRecord`]. Each
//! source format has its own entry point; every field independently degrades
//! to a default when nothing matches, so extraction only fails on input that
//! is not text or on a format it does not know.

pub mod email;
pub mod links;
pub mod normalize;
pub mod pdf;
pub mod rules;
pub mod tabular;

use std::fmt;
use std::path::Path;

use crate::errors::AnalyzerError;
use crate::models::ListingRecord;

pub use normalize::normalize_property_type;
pub use tabular::{extract_row, TabularRow};

/// Default number of leading PDF lines re-scanned for header values.
pub const DEFAULT_HEADER_LINES: usize = 10;

/// Kind of document the listing text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Email,
    Pdf,
    Csv,
    Spreadsheet,
    PlainText,
}

impl SourceFormat {
    /// Maps a file extension (with or without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Result<Self, AnalyzerError> {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            "txt" => Ok(Self::PlainText),
            "eml" => Ok(Self::Email),
            other => Err(AnalyzerError::ConfigurationError(format!(
                "Unsupported file type: .{}",
                other
            ))),
        }
    }

    /// Format of a file, judged by its extension.
    pub fn from_path(path: &Path) -> Result<Self, AnalyzerError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            AnalyzerError::ConfigurationError(format!(
                "Cannot determine file type of {}",
                path.display()
            ))
        })?;
        Self::from_extension(ext)
    }

    /// Row-oriented formats decoded by header instead of by pattern.
    pub fn is_tabular(self) -> bool {
        matches!(self, Self::Csv | Self::Spreadsheet)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Email => "email",
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
            Self::PlainText => "plain_text",
        };
        f.write_str(name)
    }
}

/// Tunables for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leading lines treated as the PDF header region.
    pub header_lines: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
        }
    }
}

/// Format-dispatching extractor.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Extracts a record from already-decoded text.
    pub fn extract(&self, raw_text: &str, format: SourceFormat) -> ListingRecord {
        tracing::debug!("Extracting listing from {} source", format);
        let text = normalize::normalize_line_endings(raw_text);

        if format.is_tabular() {
            let row = tabular::first_row(&text);
            if row.is_empty() {
                tracing::debug!("No data row found, using default listing");
            }
            return extract_row(&row);
        }

        match format {
            SourceFormat::Pdf => pdf::parse_pdf_text(&text, self.options.header_lines),
            _ => email::parse_listing_text(&text),
        }
    }

    /// Decodes `bytes` as UTF-8, then extracts.
    pub fn extract_bytes(
        &self,
        bytes: &[u8],
        format: SourceFormat,
    ) -> Result<ListingRecord, AnalyzerError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            AnalyzerError::InputError(format!("{} input is not valid UTF-8 text: {}", format, e))
        })?;
        Ok(self.extract(text, format))
    }
}

/// Extracts a record with default options.
pub fn extract(raw_text: &str, format: SourceFormat) -> ListingRecord {
    Extractor::default().extract(raw_text, format)
}

/// Extracts a record from raw bytes with default options.
pub fn extract_bytes(bytes: &[u8], format: SourceFormat) -> Result<ListingRecord, AnalyzerError> {
    Extractor::default().extract_bytes(bytes, format)
}
