//! Per-item results of an operation and the observer plumbing that streams
//! them to a front end.

use std::fmt;

use anyhow::Result;
use sheaf_jira::JiraError;
use tracing::{info, warn};

/// The bulk operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  SampleBrowse,
  SampleCreate,
  Export,
  Import,
  CloneAndRename,
  AddWatchers,
  RemoveWatcher,
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::SampleBrowse => "Browse sample issues",
      Self::SampleCreate => "Create sample issue",
      Self::Export => "Export issues to CSV",
      Self::Import => "Update issues from CSV",
      Self::CloneAndRename => "Clone and rename issues",
      Self::AddWatchers => "Add watchers for a person",
      Self::RemoveWatcher => "Remove watcher from all issues",
    };
    f.write_str(name)
  }
}

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Shown by a browse
  Listed,
  /// Written to the CSV file; `lossy` when characters were substituted
  Exported { lossy: bool },
  /// Updated from a flagged CSV row
  Updated { watchers_added: usize },
  /// CSV row left alone because its update flag is blank
  Skipped,
  /// A new issue was created
  Created { new_key: String, watchers_added: usize },
  /// A clone target with the same summary already exists
  AlreadyExists,
  /// The target person was found and watchers were added
  WatchersAdded { count: usize },
  /// The item did not involve the target person
  NotMatched,
  /// The target watcher was removed
  WatcherRemoved { login: String },
  /// The item failed; processing went on with the next one
  Failed { reason: String },
}

impl Outcome {
  pub fn is_failure(&self) -> bool {
    matches!(self, Self::Failed { .. })
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Listed => write!(f, "listed"),
      Self::Exported { lossy: false } => write!(f, "exported"),
      Self::Exported { lossy: true } => write!(f, "exported with substituted characters"),
      Self::Updated { watchers_added } => write!(f, "updated ({watchers_added} watchers added)"),
      Self::Skipped => write!(f, "skipped"),
      Self::Created {
        new_key,
        watchers_added,
      } => write!(f, "created {new_key} ({watchers_added} watchers copied)"),
      Self::AlreadyExists => write!(f, "already exists"),
      Self::WatchersAdded { count } => write!(f, "{count} watchers added"),
      Self::NotMatched => write!(f, "no match"),
      Self::WatcherRemoved { login } => write!(f, "removed watcher {login}"),
      Self::Failed { reason } => write!(f, "failed: {reason}"),
    }
  }
}

/// The result of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
  /// 1-based position in the result set
  pub seq: usize,
  pub key: String,
  pub summary: String,
  pub outcome: Outcome,
  /// Partial failures that did not fail the item, e.g. one watcher that
  /// could not be added
  pub notes: Vec<String>,
}

impl ItemReport {
  pub fn new(seq: usize, key: &str, summary: &str, outcome: Outcome) -> Self {
    Self {
      seq,
      key: key.to_string(),
      summary: summary.to_string(),
      outcome,
      notes: Vec::new(),
    }
  }

  pub fn with_notes(mut self, notes: Vec<String>) -> Self {
    self.notes = notes;
    self
  }
}

impl fmt::Display for ItemReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}][{} : {}] {}", self.seq, self.key, self.summary, self.outcome)
  }
}

/// Every item of one operation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
  pub operation: Operation,
  pub items: Vec<ItemReport>,
}

impl OperationReport {
  pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
    self.items.iter().filter(|i| i.outcome.is_failure())
  }

  pub fn failure_count(&self) -> usize {
    self.failures().count()
  }

  /// Number of items whose outcome satisfies a predicate
  pub fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
    self.items.iter().filter(|i| predicate(&i.outcome)).count()
  }

  /// One-line completion message
  pub fn summary_line(&self) -> String {
    let failed = self.failure_count();
    if failed == 0 {
      format!("{}: completed {} items", self.operation, self.items.len())
    } else {
      format!(
        "{}: completed {} items, {} failed",
        self.operation,
        self.items.len(),
        failed
      )
    }
  }
}

/// Collects item reports and forwards each one to the observer
pub(crate) struct Reporter<'a> {
  operation: Operation,
  items: Vec<ItemReport>,
  observer: &'a mut dyn FnMut(&ItemReport),
}

impl<'a> Reporter<'a> {
  pub fn new(operation: Operation, observer: &'a mut dyn FnMut(&ItemReport)) -> Self {
    info!("{} started", operation);
    Self {
      operation,
      items: Vec::new(),
      observer,
    }
  }

  pub fn push(&mut self, item: ItemReport) {
    if item.outcome.is_failure() {
      warn!("{}", item);
    } else {
      info!("{}", item);
    }
    for note in &item.notes {
      warn!("{}: {}", item.key, note);
    }
    (self.observer)(&item);
    self.items.push(item);
  }

  pub fn finish(self) -> OperationReport {
    let report = OperationReport {
      operation: self.operation,
      items: self.items,
    };
    info!("{}", report.summary_line());
    report
  }
}

/// Turn a tracker error into an item failure reason, or abort on fatal errors
pub(crate) fn recoverable(err: JiraError) -> Result<String> {
  if err.is_fatal() {
    Err(err.into())
  } else {
    Ok(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reporter_forwards_and_collects() {
    let mut seen = Vec::new();
    let mut observer = |item: &ItemReport| seen.push(item.key.clone());
    let mut reporter = Reporter::new(Operation::Export, &mut observer);

    reporter.push(ItemReport::new(1, "PROJ-1", "A", Outcome::Exported { lossy: false }));
    reporter.push(ItemReport::new(
      2,
      "PROJ-2",
      "B",
      Outcome::Failed {
        reason: "boom".to_string(),
      },
    ));
    let report = reporter.finish();

    assert_eq!(seen, ["PROJ-1", "PROJ-2"]);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.summary_line(), "Export issues to CSV: completed 2 items, 1 failed");
  }

  #[test]
  fn test_item_display() {
    let item = ItemReport::new(
      3,
      "PROJ-7",
      "[ccIC24] SyRS",
      Outcome::Created {
        new_key: "PROJ-9".to_string(),
        watchers_added: 2,
      },
    );
    assert_eq!(item.to_string(), "[3][PROJ-7 : [ccIC24] SyRS] created PROJ-9 (2 watchers copied)");
  }

  #[test]
  fn test_recoverable_classification() {
    assert!(recoverable(JiraError::Auth).is_err());
    assert_eq!(
      recoverable(JiraError::NotFound("Issue PROJ-1".to_string())).unwrap(),
      "Issue PROJ-1 not found"
    );
    assert_eq!(
      recoverable(JiraError::Forbidden {
        target: "Issue PROJ-8".to_string(),
        status: 403,
      })
      .unwrap(),
      "Permission denied for Issue PROJ-8 (HTTP 403)"
    );
  }
}
