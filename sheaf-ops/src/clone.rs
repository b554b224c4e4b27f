//! Clone issues whose summary contains one title under a new title.

use std::time::Duration;

use anyhow::Result;
use sheaf_core::jql::and_summary;
use sheaf_core::titles::{is_same_summary, rename_summary};
use sheaf_jira::{FieldBag, JiraIssue, Tracker};
use tracing::debug;

use crate::pacer::Pacer;
use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Parameters of a clone-and-rename run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneRequest {
  /// Base query; summary filters for the titles are appended to it
  pub query: String,
  pub old_title: String,
  pub new_title: String,
  /// Due date of every clone (`YYYY-MM-DD`)
  pub due_date: String,
  /// Pause after each created issue
  pub delay: Duration,
  pub custom_field_id: String,
}

impl CloneRequest {
  /// Summary the clone of `summary` gets
  pub fn renamed(&self, summary: &str) -> String {
    rename_summary(summary, &self.old_title, &self.new_title)
  }

  /// Field bag for the clone of `source`
  pub fn clone_fields(&self, source: &JiraIssue) -> FieldBag {
    let fields = &source.fields;
    let mut bag = FieldBag::new()
      .project(&fields.project_key())
      .summary(&self.renamed(&fields.summary))
      .issue_type(&fields.issue_type_name())
      .priority(&fields.priority_name())
      .components(&fields.component_names())
      .labels(&fields.labels)
      .due_date(&self.due_date)
      .versions(&fields.version_names())
      .fix_versions(&fields.fix_version_names());

    if let Some(value) = fields.custom_value(&self.custom_field_id) {
      bag = bag.custom_option(&self.custom_field_id, &value);
    }
    if let Some(assignee) = &fields.assignee {
      bag = bag.assignee(&assignee.login());
    }
    if let Some(description) = &fields.description {
      bag = bag.description(description);
    }
    if let Some(parent) = &fields.parent {
      bag = bag.parent(&parent.key);
    }
    bag
  }
}

/// Create a renamed copy of every issue matching `old_title`.
///
/// Before each creation the tracker is queried for issues matching
/// `new_title`; a candidate whose summary equals one of them under the
/// duplicate policy is reported as already existing. Clones keep the source's
/// parent and get the source's watchers. The pacer waits after every created
/// issue.
pub async fn clone_and_rename<T: Tracker>(
  tracker: &T,
  request: &CloneRequest,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let sources = tracker
    .search(&and_summary(&request.query, &request.old_title), 0, 0)
    .await?;
  let existing_query = and_summary(&request.query, &request.new_title);
  let mut pacer = Pacer::new(request.delay);
  let mut reporter = Reporter::new(Operation::CloneAndRename, observer);

  for (index, source) in sources.iter().enumerate() {
    let seq = index + 1;
    let fields = request.clone_fields(source);
    let candidate = request.renamed(&source.fields.summary);
    debug!("[{}] {} -> {}", seq, source.key, candidate);

    let existing = match tracker.search(&existing_query, 0, 0).await {
      Ok(existing) => existing,
      Err(err) => {
        let reason = recoverable(err)?;
        reporter.push(ItemReport::new(seq, &source.key, &source.fields.summary, Outcome::Failed { reason }));
        continue;
      }
    };
    if existing
      .iter()
      .any(|issue| is_same_summary(&candidate, &issue.fields.summary, &request.new_title))
    {
      reporter.push(ItemReport::new(seq, &source.key, &source.fields.summary, Outcome::AlreadyExists));
      continue;
    }

    let created = match tracker.create_issue(&fields).await {
      Ok(created) => created,
      Err(err) => {
        let reason = recoverable(err)?;
        reporter.push(ItemReport::new(seq, &source.key, &source.fields.summary, Outcome::Failed { reason }));
        continue;
      }
    };

    let mut notes = Vec::new();
    let mut watchers_added = 0;
    match tracker.list_watchers(&source.key).await {
      Ok(watchers) => {
        for watcher in watchers {
          let login = watcher.login();
          match tracker.add_watcher(&created.key, &login).await {
            Ok(()) => watchers_added += 1,
            Err(err) => notes.push(format!("watcher {login}: {}", recoverable(err)?)),
          }
        }
      }
      Err(err) => notes.push(format!("watchers not copied: {}", recoverable(err)?)),
    }

    reporter.push(
      ItemReport::new(
        seq,
        &source.key,
        &source.fields.summary,
        Outcome::Created {
          new_key: created.key.clone(),
          watchers_added,
        },
      )
      .with_notes(notes),
    );
    pacer.wait().await;
  }

  Ok(reporter.finish())
}
