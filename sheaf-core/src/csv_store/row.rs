//! Row layout of the CSV exchange file.

use std::sync::LazyLock;

use csv::StringRecord;
use regex::Regex;

use super::CsvError;
use super::list::{decode_list, encode_list};

/// Number of columns in every row
pub const COLUMN_COUNT: usize = 17;

/// Column positions
pub mod col {
  pub const UPDATE: usize = 0;
  pub const KEY: usize = 1;
  pub const PROJECT: usize = 2;
  pub const SUMMARY: usize = 3;
  pub const ISSUE_TYPE: usize = 4;
  pub const PRIORITY: usize = 5;
  pub const COMPONENTS: usize = 6;
  pub const LABELS: usize = 7;
  pub const CUSTOM_FIELD: usize = 8;
  pub const STATUS: usize = 9;
  pub const RESOLUTION: usize = 10;
  pub const ASSIGNEE: usize = 11;
  pub const REPORTER: usize = 12;
  pub const WATCHERS: usize = 13;
  pub const DUE_DATE: usize = 14;
  pub const CREATED: usize = 15;
  pub const DESCRIPTION: usize = 16;
}

/// Text of the first header cell, used to recognise the header row
pub const UPDATE_HEADER: &str = "update";

static ISSUE_KEY_PATTERN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+-\d+$").expect("Failed to compile issue key regex"));

/// Header cells in column order; the custom field column carries its label.
///
/// Starred columns are informational and never re-applied on import.
pub fn header(custom_field_label: &str) -> [String; COLUMN_COUNT] {
  [
    UPDATE_HEADER,
    "key*",
    "project*",
    "summary",
    "issuetype",
    "priority",
    "components",
    "labels",
    custom_field_label,
    "status*",
    "resolution*",
    "assignee",
    "reporter*",
    "watchers",
    "duedate",
    "created*",
    "description",
  ]
  .map(str::to_string)
}

/// Whether a string looks like an issue key (`PROJ-123`)
pub fn is_issue_key(value: &str) -> bool {
  ISSUE_KEY_PATTERN.is_match(value)
}

/// One issue flattened into a CSV row.
///
/// Users are stored as display strings and list-valued fields as lists; the
/// list literal encoding happens when the row is turned into cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueRow {
  pub update: String,
  pub key: String,
  pub project: String,
  pub summary: String,
  pub issue_type: String,
  pub priority: String,
  pub components: Vec<String>,
  pub labels: Vec<String>,
  pub custom_field: String,
  pub status: String,
  pub resolution: String,
  pub assignee: String,
  pub reporter: String,
  pub watchers: Vec<String>,
  pub due_date: String,
  pub created: String,
  pub description: String,
}

impl IssueRow {
  /// Cells in column order
  pub fn to_cells(&self) -> [String; COLUMN_COUNT] {
    [
      self.update.clone(),
      self.key.clone(),
      self.project.clone(),
      self.summary.clone(),
      self.issue_type.clone(),
      self.priority.clone(),
      encode_list(&self.components),
      encode_list(&self.labels),
      self.custom_field.clone(),
      self.status.clone(),
      self.resolution.clone(),
      self.assignee.clone(),
      self.reporter.clone(),
      encode_list(&self.watchers),
      self.due_date.clone(),
      self.created.clone(),
      self.description.clone(),
    ]
  }

  /// Whether the row is marked to be applied on import. A flag of only
  /// whitespace is blank.
  pub fn is_flagged(&self) -> bool {
    !self.update.trim().is_empty()
  }
}

/// One record as read from a CSV file, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
  /// 1-based line number of the record in the file
  pub line: u64,
  pub cells: Vec<String>,
}

impl CsvRow {
  pub(crate) fn from_record(record: &StringRecord) -> Self {
    Self {
      line: record.position().map(|p| p.line()).unwrap_or_default(),
      cells: record.iter().map(str::to_string).collect(),
    }
  }

  fn cell(&self, index: usize) -> &str {
    self.cells.get(index).map(String::as_str).unwrap_or("")
  }

  /// The update flag cell
  pub fn flag(&self) -> &str {
    self.cell(col::UPDATE)
  }

  /// The key cell, as written
  pub fn key(&self) -> &str {
    self.cell(col::KEY).trim()
  }

  /// Whether this is the header row
  pub fn is_header(&self) -> bool {
    self.flag() == UPDATE_HEADER
  }

  /// Whether this row is marked to be applied on import; see [`IssueRow::is_flagged`]
  pub fn is_flagged(&self) -> bool {
    !self.flag().trim().is_empty()
  }

  /// Interpret the record as an issue row.
  ///
  /// Fails on a wrong column count, a malformed key, or a malformed list
  /// literal.
  pub fn parse(&self) -> Result<IssueRow, CsvError> {
    if self.cells.len() != COLUMN_COUNT {
      return Err(CsvError::ColumnCount {
        line: self.line,
        expected: COLUMN_COUNT,
        found: self.cells.len(),
      });
    }

    let key = self.key();
    if !is_issue_key(key) {
      return Err(CsvError::InvalidKey {
        line: self.line,
        key: key.to_string(),
      });
    }

    Ok(IssueRow {
      update: self.cell(col::UPDATE).to_string(),
      key: key.to_string(),
      project: self.cell(col::PROJECT).to_string(),
      summary: self.cell(col::SUMMARY).to_string(),
      issue_type: self.cell(col::ISSUE_TYPE).to_string(),
      priority: self.cell(col::PRIORITY).to_string(),
      components: decode_list(self.cell(col::COMPONENTS))?,
      labels: decode_list(self.cell(col::LABELS))?,
      custom_field: self.cell(col::CUSTOM_FIELD).to_string(),
      status: self.cell(col::STATUS).to_string(),
      resolution: self.cell(col::RESOLUTION).to_string(),
      assignee: self.cell(col::ASSIGNEE).to_string(),
      reporter: self.cell(col::REPORTER).to_string(),
      watchers: decode_list(self.cell(col::WATCHERS))?,
      due_date: self.cell(col::DUE_DATE).to_string(),
      created: self.cell(col::CREATED).to_string(),
      description: self.cell(col::DESCRIPTION).to_string(),
    })
  }
}
