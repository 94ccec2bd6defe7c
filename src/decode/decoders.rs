//! CSV decoder implementation

use super::types::{CsvRow, DecoderConfig};
use crate::error::{Error, Result};

const UTF8_BOM: char = '\u{feff}';

/// Header-delimited CSV decoder
#[derive(Debug, Clone, Default)]
pub struct CsvDecoder {
    config: DecoderConfig,
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with custom settings
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode a CSV body into rows, in file order
    ///
    /// Blank lines are skipped. Rows shorter than the header leave their
    /// trailing fields absent; fields beyond the header are ignored. When a
    /// header name repeats, the later column wins.
    pub fn decode(&self, body: &str) -> Result<Vec<CsvRow>> {
        let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);

        let trim = if self.config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.config.delimiter)
            .trim(trim)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| Error::csv(format!("Failed to read header row: {e}")))?
            .clone();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| Error::csv(format!("Failed to read data row {line}: {e}")))?;

            let row: CsvRow = headers.iter().zip(record.iter()).collect();
            rows.push(row);
        }

        Ok(rows)
    }
}
