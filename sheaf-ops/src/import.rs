//! Apply flagged rows of the CSV exchange file to the tracker.

use anyhow::{Context, Result};
use sheaf_core::csv_store::CsvIssueStore;
use sheaf_core::names::normalize_login;
use sheaf_jira::Tracker;
use tracing::{debug, warn};

use crate::convert::fields_from_row;
use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Update one issue per flagged row, in file order.
///
/// Rows with a blank update flag are skipped. After a row's fields are
/// updated, every watcher listed in the row is resolved and added; watcher
/// failures are noted without failing the row. A failed row does not undo
/// earlier rows.
pub async fn bulk_import<T: Tracker>(
  tracker: &T,
  store: &CsvIssueStore,
  custom_field_id: &str,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let rows = store
    .read_rows()
    .with_context(|| format!("Failed to read {}", store.path().display()))?;
  if rows.had_decode_errors() {
    warn!(
      "{} contains bytes that are not valid {}; they were replaced",
      store.path().display(),
      store.encoding().name()
    );
  }

  let mut reporter = Reporter::new(Operation::Import, observer);
  let mut seq = 0;
  for record in rows {
    let row = match record {
      Ok(row) if row.is_header() => continue,
      Ok(row) => row,
      Err(err) => {
        seq += 1;
        reporter.push(ItemReport::new(seq, "", "", Outcome::Failed { reason: err.to_string() }));
        continue;
      }
    };
    seq += 1;

    if !row.is_flagged() {
      debug!("Skipping unflagged row {}", row.key());
      reporter.push(ItemReport::new(seq, row.key(), "", Outcome::Skipped));
      continue;
    }

    let issue_row = match row.parse() {
      Ok(parsed) => parsed,
      Err(err) => {
        reporter.push(ItemReport::new(seq, row.key(), "", Outcome::Failed { reason: err.to_string() }));
        continue;
      }
    };

    let fields = fields_from_row(&issue_row, custom_field_id);
    if let Err(err) = tracker.update_issue(&issue_row.key, &fields).await {
      let reason = recoverable(err)?;
      reporter.push(ItemReport::new(seq, &issue_row.key, &issue_row.summary, Outcome::Failed { reason }));
      continue;
    }

    let mut notes = Vec::new();
    let mut watchers_added = 0;
    for watcher in &issue_row.watchers {
      let fragment = normalize_login(watcher);
      if fragment.is_empty() {
        continue;
      }
      let added = match tracker.resolve_user(&fragment).await {
        Ok(user) => tracker.add_watcher(&issue_row.key, &user.login()).await,
        Err(err) => Err(err),
      };
      match added {
        Ok(()) => watchers_added += 1,
        Err(err) => notes.push(format!("watcher {fragment}: {}", recoverable(err)?)),
      }
    }

    reporter.push(
      ItemReport::new(seq, &issue_row.key, &issue_row.summary, Outcome::Updated { watchers_added }).with_notes(notes),
    );
  }

  Ok(reporter.finish())
}
