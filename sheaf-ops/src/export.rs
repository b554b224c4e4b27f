//! Export every issue of a query to the CSV exchange file.

use anyhow::{Context, Result};
use sheaf_core::csv_store::{AppendOutcome, CsvIssueStore};
use sheaf_jira::Tracker;
use tracing::debug;

use crate::convert::row_from_issue;
use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Write the header, then one row per matching issue in search order.
///
/// Rows are appended as they are produced, so an aborted export keeps every
/// row written so far. An issue whose watchers cannot be listed is exported
/// with an empty watcher list and a note.
pub async fn bulk_export<T: Tracker>(
  tracker: &T,
  query: &str,
  store: &CsvIssueStore,
  custom_field_id: &str,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let issues = tracker.search(query, 0, 0).await?;
  debug!("Exporting {} issues to {}", issues.len(), store.path().display());

  store
    .write_header()
    .with_context(|| format!("Failed to write {}", store.path().display()))?;

  let mut reporter = Reporter::new(Operation::Export, observer);
  for (index, issue) in issues.iter().enumerate() {
    let mut notes = Vec::new();
    let watchers = match tracker.list_watchers(&issue.key).await {
      Ok(watchers) => watchers,
      Err(err) => {
        notes.push(format!("watchers not exported: {}", recoverable(err)?));
        Vec::new()
      }
    };

    let row = row_from_issue(issue, &watchers, custom_field_id);
    let appended = store
      .append_row(&row)
      .with_context(|| format!("Failed to write {} to {}", issue.key, store.path().display()))?;

    let lossy = appended == AppendOutcome::Lossy;
    if lossy {
      notes.push(format!(
        "characters not representable in {} were replaced with '?'",
        store.encoding().name()
      ));
    }
    reporter.push(
      ItemReport::new(index + 1, &issue.key, &issue.fields.summary, Outcome::Exported { lossy }).with_notes(notes),
    );
  }

  Ok(reporter.finish())
}
