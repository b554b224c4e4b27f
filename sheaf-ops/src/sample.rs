//! Creating one issue from a template, as a smoke test of write access.

use anyhow::Result;
use sheaf_core::names::normalize_login;
use sheaf_jira::{FieldBag, Tracker};

use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Field values for a sample issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleTemplate {
  pub project: String,
  pub summary: String,
  pub issue_type: String,
  pub priority: String,
  pub components: Vec<String>,
  pub labels: Vec<String>,
  pub custom_value: String,
  pub assignee: String,
  pub due_date: String,
  pub description: String,
  /// Affects versions
  pub versions: Vec<String>,
  pub fix_versions: Vec<String>,
  /// Required when the issue type is a sub-task
  pub parent: Option<String>,
}

impl SampleTemplate {
  /// A plain task in a project with every optional field left empty
  pub fn for_project(project: &str) -> Self {
    Self {
      project: project.to_string(),
      summary: "sheaf sample issue".to_string(),
      issue_type: "Task".to_string(),
      priority: "P2".to_string(),
      components: Vec::new(),
      labels: Vec::new(),
      custom_value: String::new(),
      assignee: String::new(),
      due_date: String::new(),
      description: String::new(),
      versions: Vec::new(),
      fix_versions: Vec::new(),
      parent: None,
    }
  }

  pub fn to_fields(&self, custom_field_id: &str) -> FieldBag {
    let mut bag = FieldBag::new()
      .project(&self.project)
      .summary(&self.summary)
      .issue_type(&self.issue_type)
      .priority(&self.priority)
      .components(&self.components)
      .labels(&self.labels)
      .versions(&self.versions)
      .fix_versions(&self.fix_versions);

    if !self.custom_value.is_empty() {
      bag = bag.custom_option(custom_field_id, &self.custom_value);
    }
    if !self.assignee.is_empty() {
      bag = bag.assignee(&normalize_login(&self.assignee));
    }
    if !self.due_date.is_empty() {
      bag = bag.due_date(&self.due_date);
    }
    if !self.description.is_empty() {
      bag = bag.description(&self.description);
    }
    if let Some(parent) = &self.parent {
      bag = bag.parent(parent);
    }
    bag
  }
}

/// Create one issue from a template, then add one watcher to it
pub async fn sample_create<T: Tracker>(
  tracker: &T,
  template: &SampleTemplate,
  watcher: Option<&str>,
  custom_field_id: &str,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let mut reporter = Reporter::new(Operation::SampleCreate, observer);

  let created = match tracker.create_issue(&template.to_fields(custom_field_id)).await {
    Ok(issue) => issue,
    Err(err) => {
      let reason = recoverable(err)?;
      reporter.push(ItemReport::new(1, "", &template.summary, Outcome::Failed { reason }));
      return Ok(reporter.finish());
    }
  };

  let mut notes = Vec::new();
  let mut watchers_added = 0;
  if let Some(watcher) = watcher.map(normalize_login).filter(|w| !w.is_empty()) {
    let added = match tracker.resolve_user(&watcher).await {
      Ok(user) => tracker.add_watcher(&created.key, &user.login()).await,
      Err(err) => Err(err),
    };
    match added {
      Ok(()) => watchers_added += 1,
      Err(err) => notes.push(format!("watcher {watcher}: {}", recoverable(err)?)),
    }
  }

  reporter.push(
    ItemReport::new(
      1,
      &created.key,
      &created.fields.summary,
      Outcome::Created {
        new_key: created.key.clone(),
        watchers_added,
      },
    )
    .with_notes(notes),
  );
  Ok(reporter.finish())
}

#[cfg(test)]
mod tests {
  use sheaf_test_utils::{FailureKind, FakeTracker, TrackerOp};

  use super::*;

  fn template() -> SampleTemplate {
    SampleTemplate {
      components: vec!["ES94111-01".to_string()],
      labels: vec!["ccIC24_CLU_WBS".to_string()],
      custom_value: "ccIC24".to_string(),
      assignee: "gildong.hong".to_string(),
      due_date: "2023-08-30".to_string(),
      description: "설명 텍스트입니다".to_string(),
      versions: vec!["N/A".to_string()],
      fix_versions: vec!["N/A".to_string()],
      ..SampleTemplate::for_project("PROJ")
    }
  }

  fn tracker() -> FakeTracker {
    FakeTracker::new()
      .with_user("gildong.hong", "Hong Gildong (gildong.hong)")
      .with_user("cheolsu.kim", "Kim Cheolsu (cheolsu.kim)")
  }

  #[tokio::test]
  async fn test_sample_create_with_watcher() {
    let fake = tracker();
    let report = sample_create(&fake, &template(), Some("cheolsu.kim"), "customfield_43801", &mut |_| {})
      .await
      .unwrap();

    assert_eq!(
      report.items[0].outcome,
      Outcome::Created {
        new_key: "PROJ-1".to_string(),
        watchers_added: 1
      }
    );
    let issue = fake.issue("PROJ-1").unwrap();
    assert_eq!(issue.fields.custom_value("customfield_43801").as_deref(), Some("ccIC24"));
    assert_eq!(issue.fields.fix_version_names(), ["N/A"]);
    assert_eq!(issue.fields.assignee.unwrap().name, "gildong.hong");
    assert_eq!(fake.watcher_logins("PROJ-1"), ["cheolsu.kim"]);
  }

  #[test]
  fn test_minimal_template_omits_empty_fields() {
    let bag = SampleTemplate::for_project("PROJ").to_fields("customfield_43801");
    assert!(!bag.contains("assignee"));
    assert!(!bag.contains("duedate"));
    assert!(!bag.contains("parent"));
    assert!(!bag.contains("customfield_43801"));
  }

  #[tokio::test]
  async fn test_rejected_create_is_reported() {
    let fake = tracker();
    fake.fail_on(TrackerOp::CreateIssue, "", FailureKind::Validation);

    let report = sample_create(&fake, &template(), None, "customfield_43801", &mut |_| {})
      .await
      .unwrap();
    assert_eq!(report.failure_count(), 1);
    assert!(fake.issues().is_empty());
  }

  #[tokio::test]
  async fn test_unknown_watcher_is_a_note() {
    let fake = tracker();
    let report = sample_create(&fake, &template(), Some("nobody"), "customfield_43801", &mut |_| {})
      .await
      .unwrap();

    let item = &report.items[0];
    assert!(matches!(item.outcome, Outcome::Created { watchers_added: 0, .. }));
    assert!(item.notes[0].starts_with("watcher nobody"));
  }
}
