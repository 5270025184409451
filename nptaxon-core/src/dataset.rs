// Tabular boundary between roster CSV exports and the engine.
//
// Reading is forgiving the way spreadsheet exports need: BOM stripped, UTF-8
// with a Windows-1252 fallback, delimiter sniffed from the header, short rows
// padded. A row wider than the header is rejected rather than truncated.
// Blank cells and configured blank markers surface as `None`.

use crate::config::TaxonomyConfig;
use crate::error::{TaxonomyError, TaxonomyResult};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b'|', b';'];

/// Decode file bytes: UTF-8 (BOM optional), else Windows-1252. Never fails.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("input is not UTF-8, decoding as Windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Most frequent candidate delimiter on the header line; comma on ties.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let mut best = (b',', 0usize);
    for delimiter in DELIMITER_CANDIDATES {
        let count = header.bytes().filter(|&b| b == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Build a dataset, padding short rows with `None`. Rows are numbered
    /// from 1 in the error for a row wider than the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> TaxonomyResult<Self> {
        let expected = headers.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() > expected {
                return Err(TaxonomyError::ExtraFields {
                    row: index + 1,
                    found: row.len(),
                    expected,
                });
            }
            row.resize(expected, None);
            padded.push(row);
        }
        Ok(Self {
            headers,
            rows: padded,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, config: &TaxonomyConfig) -> TaxonomyResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let dataset = Self::from_bytes(&bytes, config)?;
        info!(
            "📄 Read {} rows × {} columns from {}",
            dataset.len(),
            dataset.headers.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_bytes(bytes: &[u8], config: &TaxonomyConfig) -> TaxonomyResult<Self> {
        let text = decode_text(bytes);
        let delimiter = sniff_delimiter(&text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(TaxonomyError::EmptyDataset);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() || config.is_blank_marker(cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Resolve a required column, or fail before any row is touched.
    pub fn require_column(&self, name: &str) -> TaxonomyResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TaxonomyError::MissingColumn {
                column: name.to_string(),
                found: self.headers.clone(),
            })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(|cell| cell.as_deref()))
    }

    /// Replace a column's values, appending the column if it does not exist.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) {
        let index = match self.column_index(name) {
            Some(index) => index,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.headers.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[index] = value;
        }
    }

    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    pub fn write_to<W: Write>(&self, mut writer: W, write_bom: bool) -> TaxonomyResult<()> {
        if write_bom {
            writer.write_all(UTF8_BOM)?;
        }
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>, write_bom: bool) -> TaxonomyResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file), write_bom)?;
        info!("💾 Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}
