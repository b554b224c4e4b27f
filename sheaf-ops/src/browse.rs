//! A quick look at the first few issues of a query.

use anyhow::Result;
use sheaf_jira::Tracker;

use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Number of issues a browse shows
pub const SAMPLE_SIZE: u32 = 10;

/// Display fields of one browsed issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDetails {
  pub parent: Option<String>,
  pub key: String,
  pub project: String,
  pub summary: String,
  pub issue_type: String,
  pub priority: String,
  pub components: Vec<String>,
  pub labels: Vec<String>,
  pub custom_field: Option<String>,
  pub status: String,
  pub resolution: Option<String>,
  pub assignee: Option<String>,
  pub reporter: Option<String>,
  pub watchers: Vec<String>,
  pub due_date: Option<String>,
  pub created: Option<String>,
  pub description: Option<String>,
}

/// Result of a browse
#[derive(Debug, Clone)]
pub struct BrowseOutput {
  pub issues: Vec<IssueDetails>,
  pub report: OperationReport,
}

/// Fetch the first [`SAMPLE_SIZE`] issues of a query with their watchers
pub async fn sample_browse<T: Tracker>(
  tracker: &T,
  query: &str,
  custom_field_id: &str,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<BrowseOutput> {
  let found = tracker.search(query, 0, SAMPLE_SIZE).await?;
  let mut reporter = Reporter::new(Operation::SampleBrowse, observer);
  let mut issues = Vec::with_capacity(found.len());

  for (index, issue) in found.iter().enumerate() {
    let mut notes = Vec::new();
    let watchers = match tracker.list_watchers(&issue.key).await {
      Ok(watchers) => watchers.iter().map(ToString::to_string).collect(),
      Err(err) => {
        notes.push(format!("watchers unavailable: {}", recoverable(err)?));
        Vec::new()
      }
    };

    let fields = &issue.fields;
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    issues.push(IssueDetails {
      parent: fields.parent.as_ref().map(|p| p.key.clone()),
      key: issue.key.clone(),
      project: fields.project_key(),
      summary: fields.summary.clone(),
      issue_type: fields.issue_type_name(),
      priority: fields.priority_name(),
      components: fields.component_names(),
      labels: fields.labels.clone(),
      custom_field: fields.custom_value(custom_field_id),
      status: fields.status_name(),
      resolution: non_empty(fields.resolution_name()),
      assignee: fields.assignee.as_ref().map(ToString::to_string),
      reporter: fields.reporter.as_ref().map(ToString::to_string),
      watchers,
      due_date: fields.duedate.clone(),
      created: fields.created.clone(),
      description: fields.description.clone(),
    });

    reporter.push(ItemReport::new(index + 1, &issue.key, &fields.summary, Outcome::Listed).with_notes(notes));
  }

  Ok(BrowseOutput {
    issues,
    report: reporter.finish(),
  })
}

#[cfg(test)]
mod tests {
  use sheaf_jira::FieldBag;
  use sheaf_test_utils::{FailureKind, FakeTracker, TrackerCall, TrackerOp};

  use super::*;

  fn tracker(count: usize) -> FakeTracker {
    let mut fake = FakeTracker::new().with_user("gildong.hong", "Hong Gildong (gildong.hong)");
    for n in 1..=count {
      fake = fake.with_issue(
        &format!("PROJ-{n}"),
        FieldBag::new()
          .project("PROJ")
          .summary(&format!("[ccIC24] Item {n}"))
          .custom_option("customfield_43801", "ccIC24")
          .parent("PROJ-100")
          .assignee("gildong.hong"),
      );
    }
    fake.with_watchers("PROJ-1", &["gildong.hong"])
  }

  #[tokio::test]
  async fn test_browse_takes_first_ten_from_start() {
    let fake = tracker(12);
    let mut seen = 0;
    let output = sample_browse(&fake, "project in (PROJ)", "customfield_43801", &mut |_| seen += 1)
      .await
      .unwrap();

    assert_eq!(output.issues.len(), 10);
    assert_eq!(seen, 10);
    assert_eq!(output.issues[0].key, "PROJ-1");
    assert_eq!(output.issues[0].parent.as_deref(), Some("PROJ-100"));
    assert_eq!(output.issues[0].custom_field.as_deref(), Some("ccIC24"));
    assert_eq!(output.issues[0].watchers, ["Hong Gildong (gildong.hong)"]);
    assert_eq!(
      output.issues[0].assignee.as_deref(),
      Some("Hong Gildong (gildong.hong)")
    );
    assert_eq!(
      fake.calls()[0],
      TrackerCall::Search {
        query: "project in (PROJ)".to_string(),
        start_at: 0,
        max_results: 10,
      }
    );
    assert!(fake.mutations().is_empty());
  }

  #[tokio::test]
  async fn test_watcher_failure_is_a_note() {
    let fake = tracker(2);
    fake.fail_on(TrackerOp::ListWatchers, "PROJ-2", FailureKind::Server);

    let output = sample_browse(&fake, "project in (PROJ)", "customfield_43801", &mut |_| {})
      .await
      .unwrap();
    assert_eq!(output.issues.len(), 2);
    assert!(output.report.items[1].notes[0].contains("watchers unavailable"));
  }

  #[tokio::test]
  async fn test_auth_failure_aborts() {
    let fake = tracker(2);
    fake.fail_on(TrackerOp::Search, "", FailureKind::Auth);

    assert!(
      sample_browse(&fake, "project in (PROJ)", "customfield_43801", &mut |_| {})
        .await
        .is_err()
    );
  }
}
