//! # CSV Issue Store
//!
//! Reads and writes the CSV exchange file: a fixed 17-column header followed
//! by one row per issue. Files are written in a configurable legacy encoding
//! and opened per row group, so an export that is interrupted keeps every row
//! written so far.

mod encoding;
mod list;
mod row;

use std::fs::{self, File, OpenOptions};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

pub use encoding::TextEncoding;
pub use list::{decode_list, encode_list};
pub use row::{COLUMN_COUNT, CsvRow, IssueRow, UPDATE_HEADER, col, header, is_issue_key};
use thiserror::Error;

/// Errors raised by the CSV issue store
#[derive(Debug, Error)]
pub enum CsvError {
  #[error("Unknown text encoding '{0}'")]
  UnknownEncoding(String),
  #[error("Line {line}: expected {expected} columns, found {found}")]
  ColumnCount { line: u64, expected: usize, found: usize },
  #[error("Line {line}: '{key}' is not an issue key")]
  InvalidKey { line: u64, key: String },
  #[error("Malformed list cell '{cell}': {reason}")]
  ListLiteral { cell: String, reason: String },
  #[error("Failed to access {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error(transparent)]
  Csv(#[from] csv::Error),
}

/// Result of appending one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
  /// Every character was written as is
  Exact,
  /// Some characters could not be represented and were substituted
  Lossy,
}

/// A CSV exchange file
#[derive(Debug, Clone)]
pub struct CsvIssueStore {
  path: PathBuf,
  encoding: TextEncoding,
  custom_field_label: String,
}

impl CsvIssueStore {
  /// Open a store for a path, encoding label, and custom field column label
  pub fn new(path: impl Into<PathBuf>, encoding_label: &str, custom_field_label: &str) -> Result<Self, CsvError> {
    Ok(Self {
      path: path.into(),
      encoding: TextEncoding::for_label(encoding_label)?,
      custom_field_label: custom_field_label.to_string(),
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn encoding(&self) -> TextEncoding {
    self.encoding
  }

  fn io_error(&self, source: std::io::Error) -> CsvError {
    CsvError::Io {
      path: self.path.clone(),
      source,
    }
  }

  /// Render cells as one CRLF-terminated CSV line
  fn render(cells: &[String]) -> Result<String, CsvError> {
    let mut writer = csv::WriterBuilder::new()
      .terminator(csv::Terminator::CRLF)
      .from_writer(Vec::new());
    writer.write_record(cells)?;
    let bytes = writer
      .into_inner()
      .map_err(|e| CsvError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Create or truncate the file and write the header row
  pub fn write_header(&self) -> Result<(), CsvError> {
    let line = Self::render(&header(&self.custom_field_label))?;
    let (bytes, _) = self.encoding.encode_lossy(&line);

    let mut file = File::create(&self.path).map_err(|e| self.io_error(e))?;
    file.write_all(&bytes).map_err(|e| self.io_error(e))?;
    Ok(())
  }

  /// Append one issue row
  pub fn append_row(&self, row: &IssueRow) -> Result<AppendOutcome, CsvError> {
    let line = Self::render(&row.to_cells())?;
    let (bytes, lossy) = self.encoding.encode_lossy(&line);

    let mut file = OpenOptions::new()
      .append(true)
      .create(true)
      .open(&self.path)
      .map_err(|e| self.io_error(e))?;
    file.write_all(&bytes).map_err(|e| self.io_error(e))?;

    Ok(if lossy { AppendOutcome::Lossy } else { AppendOutcome::Exact })
  }

  /// Read every record in file order, header included
  pub fn read_rows(&self) -> Result<RowIter, CsvError> {
    let bytes = fs::read(&self.path).map_err(|e| self.io_error(e))?;
    let (text, had_decode_errors) = self.encoding.decode(&bytes);

    let reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_reader(Cursor::new(text.into_bytes()));

    Ok(RowIter {
      records: reader.into_records(),
      had_decode_errors,
    })
  }
}

/// Lazy iterator over the records of a CSV file
pub struct RowIter {
  records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
  had_decode_errors: bool,
}

impl RowIter {
  /// Whether malformed byte sequences were replaced while decoding the file
  pub fn had_decode_errors(&self) -> bool {
    self.had_decode_errors
  }
}

impl Iterator for RowIter {
  type Item = Result<CsvRow, CsvError>;

  fn next(&mut self) -> Option<Self::Item> {
    self
      .records
      .next()
      .map(|record| record.map(|r| CsvRow::from_record(&r)).map_err(CsvError::from))
  }
}
