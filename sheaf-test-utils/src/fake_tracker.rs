//! In-memory tracker for operation tests
//!
//! [`FakeTracker`] keeps issues, watcher lists, and a user directory in
//! memory, records every call in order, and can be told to fail specific
//! calls. Its query support covers what the query builder emits:
//! `project in (...)`, `project = X`, and `summary ~ term` clauses joined with
//! `AND`, where a summary term matches case-insensitively as a substring.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value, json};
use sheaf_jira::{FieldBag, JiraError, JiraIssue, JiraUser, Tracker, pick_user};

/// Timestamp given to issues created through the fake
pub const CREATED_AT: &str = "2023-08-02T09:00:00.000+0900";

/// Build a directory user
pub fn user(login: &str, display_name: &str) -> JiraUser {
  JiraUser {
    name: login.to_string(),
    display_name: display_name.to_string(),
    email_address: None,
  }
}

/// Tracker operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerOp {
  Search,
  GetIssue,
  CreateIssue,
  UpdateIssue,
  ListWatchers,
  AddWatcher,
  RemoveWatcher,
  ResolveUser,
}

/// Error produced by an injected failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  Auth,
  Forbidden,
  Validation,
  NotFound,
  Server,
}

impl FailureKind {
  fn to_error(self, target: &str) -> JiraError {
    match self {
      Self::Auth => JiraError::Auth,
      Self::Forbidden => JiraError::Forbidden {
        target: target.to_string(),
        status: 403,
      },
      Self::Validation => JiraError::Validation {
        target: target.to_string(),
        errors: vec!["injected validation failure".to_string()],
      },
      Self::NotFound => JiraError::NotFound(target.to_string()),
      Self::Server => JiraError::Unexpected {
        status: 500,
        body: "injected server failure".to_string(),
      },
    }
  }
}

/// One recorded tracker call
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCall {
  Search { query: String, start_at: u32, max_results: u32 },
  GetIssue(String),
  CreateIssue(FieldBag),
  UpdateIssue { key: String, fields: FieldBag },
  ListWatchers(String),
  AddWatcher { key: String, login: String },
  RemoveWatcher { key: String, login: String },
  ResolveUser(String),
}

impl TrackerCall {
  /// Whether the call changes tracker state
  pub fn is_mutation(&self) -> bool {
    matches!(
      self,
      Self::CreateIssue(_) | Self::UpdateIssue { .. } | Self::AddWatcher { .. } | Self::RemoveWatcher { .. }
    )
  }
}

#[derive(Debug, Clone)]
struct StoredIssue {
  id: u64,
  key: String,
  fields: Map<String, Value>,
}

#[derive(Debug, Default)]
struct FakeState {
  issues: Vec<StoredIssue>,
  watchers: HashMap<String, Vec<JiraUser>>,
  users: Vec<JiraUser>,
  calls: Vec<TrackerCall>,
  /// (operation, target) pairs that fail; an empty target fails every call
  failures: Vec<(TrackerOp, String, FailureKind)>,
  next_id: u64,
}

impl FakeState {
  fn failure(&self, op: TrackerOp, target: &str) -> Option<JiraError> {
    self
      .failures
      .iter()
      .find(|(o, t, _)| *o == op && (t.is_empty() || t == target))
      .map(|(_, _, kind)| kind.to_error(target))
  }

  fn find(&self, key: &str) -> Option<&StoredIssue> {
    self.issues.iter().find(|i| i.key == key)
  }

  fn user_by_login(&self, login: &str) -> Option<&JiraUser> {
    self.users.iter().find(|u| u.name == login)
  }

  /// Replace `{"name": login}` people with full directory entries
  fn expand_people(&self, fields: &mut Map<String, Value>) {
    for field in ["assignee", "reporter"] {
      let login = fields
        .get(field)
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
      if let Some(user) = login.as_deref().and_then(|l| self.user_by_login(l)) {
        fields.insert(
          field.to_string(),
          json!({ "name": user.name, "displayName": user.display_name }),
        );
      }
    }
  }

  fn to_issue(stored: &StoredIssue) -> JiraIssue {
    serde_json::from_value(json!({
        "id": stored.id.to_string(),
        "key": stored.key,
        "fields": stored.fields,
    }))
    .expect("stored issue fields must deserialize")
  }

  fn next_key(&self, project: &str) -> String {
    let prefix = format!("{project}-");
    let highest = self
      .issues
      .iter()
      .filter_map(|i| i.key.strip_prefix(&prefix))
      .filter_map(|n| n.parse::<u64>().ok())
      .max()
      .unwrap_or(0);
    format!("{project}-{}", highest + 1)
  }
}

/// An in-memory [`Tracker`]
#[derive(Debug, Default)]
pub struct FakeTracker {
  state: Mutex<FakeState>,
}

impl FakeTracker {
  pub fn new() -> Self {
    Self::default()
  }

  fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
    self.state.lock().expect("fake tracker state poisoned")
  }

  /// Add a user to the directory
  pub fn with_user(self, login: &str, display_name: &str) -> Self {
    self.state().users.push(user(login, display_name));
    self
  }

  /// Seed an issue with the given fields
  pub fn with_issue(self, key: &str, fields: FieldBag) -> Self {
    {
      let mut state = self.state();
      let mut map = fields.as_map().clone();
      state.expand_people(&mut map);
      map.entry("created").or_insert_with(|| json!(CREATED_AT));
      map.entry("status").or_insert_with(|| json!({ "name": "Open" }));
      state.next_id += 1;
      let id = 10_000 + state.next_id;
      state.issues.push(StoredIssue {
        id,
        key: key.to_string(),
        fields: map,
      });
    }
    self
  }

  /// Seed the watcher list of an issue by login
  pub fn with_watchers(self, key: &str, logins: &[&str]) -> Self {
    {
      let mut state = self.state();
      let watchers = logins
        .iter()
        .map(|l| state.user_by_login(l).cloned().unwrap_or_else(|| user(l, l)))
        .collect();
      state.watchers.insert(key.to_string(), watchers);
    }
    self
  }

  /// Make calls of `op` on `target` fail; an empty target fails every call
  pub fn fail_on(&self, op: TrackerOp, target: &str, kind: FailureKind) {
    self.state().failures.push((op, target.to_string(), kind));
  }

  /// Every call so far, in order
  pub fn calls(&self) -> Vec<TrackerCall> {
    self.state().calls.clone()
  }

  /// Calls that changed tracker state, in order
  pub fn mutations(&self) -> Vec<TrackerCall> {
    self.calls().into_iter().filter(TrackerCall::is_mutation).collect()
  }

  pub fn clear_calls(&self) {
    self.state().calls.clear();
  }

  /// Current state of an issue
  pub fn issue(&self, key: &str) -> Option<JiraIssue> {
    self.state().find(key).map(FakeState::to_issue)
  }

  /// Every issue in creation order
  pub fn issues(&self) -> Vec<JiraIssue> {
    self.state().issues.iter().map(FakeState::to_issue).collect()
  }

  /// Watcher logins of an issue
  pub fn watcher_logins(&self, key: &str) -> Vec<String> {
    self
      .state()
      .watchers
      .get(key)
      .map(|ws| ws.iter().map(|w| w.name.clone()).collect())
      .unwrap_or_default()
  }
}

fn matches_query(stored: &StoredIssue, query: &str) -> bool {
  let project = stored
    .fields
    .get("project")
    .and_then(|p| p.get("key"))
    .and_then(Value::as_str)
    .unwrap_or_default();
  let summary = stored
    .fields
    .get("summary")
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_lowercase();

  query.split(" AND ").all(|clause| {
    let clause = clause.trim();
    if let Some(list) = clause
      .strip_prefix("project in (")
      .and_then(|rest| rest.strip_suffix(')'))
    {
      list.split(',').any(|p| p.trim().trim_matches('"') == project)
    } else if let Some(key) = clause.strip_prefix("project = ") {
      key.trim().trim_matches('"') == project
    } else if let Some(term) = clause.strip_prefix("summary ~ ") {
      summary.contains(&term.trim().trim_matches('"').to_lowercase())
    } else {
      true
    }
  })
}

impl Tracker for FakeTracker {
  async fn search(&self, query: &str, start_at: u32, max_results: u32) -> Result<Vec<JiraIssue>, JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::Search {
      query: query.to_string(),
      start_at,
      max_results,
    });
    if let Some(err) = state.failure(TrackerOp::Search, query) {
      return Err(err);
    }

    let matching = state
      .issues
      .iter()
      .filter(|i| matches_query(i, query))
      .skip(start_at as usize);
    let issues = if max_results == 0 {
      matching.map(FakeState::to_issue).collect()
    } else {
      matching.take(max_results as usize).map(FakeState::to_issue).collect()
    };
    Ok(issues)
  }

  async fn get_issue(&self, key: &str) -> Result<JiraIssue, JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::GetIssue(key.to_string()));
    if let Some(err) = state.failure(TrackerOp::GetIssue, key) {
      return Err(err);
    }
    state
      .find(key)
      .map(FakeState::to_issue)
      .ok_or_else(|| JiraError::NotFound(format!("Issue {key}")))
  }

  async fn create_issue(&self, fields: &FieldBag) -> Result<JiraIssue, JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::CreateIssue(fields.clone()));
    let summary = fields.text("summary").unwrap_or_default().to_string();
    if let Some(err) = state.failure(TrackerOp::CreateIssue, &summary) {
      return Err(err);
    }

    let Some(project) = fields.reference("project").map(str::to_string) else {
      return Err(JiraError::Validation {
        target: "New issue".to_string(),
        errors: vec!["project: project is required".to_string()],
      });
    };

    let mut map = fields.as_map().clone();
    state.expand_people(&mut map);
    map.insert("created".to_string(), json!(CREATED_AT));
    map.insert("status".to_string(), json!({ "name": "Open" }));

    state.next_id += 1;
    let stored = StoredIssue {
      id: 10_000 + state.next_id,
      key: state.next_key(&project),
      fields: map,
    };
    let issue = FakeState::to_issue(&stored);
    state.issues.push(stored);
    Ok(issue)
  }

  async fn update_issue(&self, key: &str, fields: &FieldBag) -> Result<(), JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::UpdateIssue {
      key: key.to_string(),
      fields: fields.clone(),
    });
    if let Some(err) = state.failure(TrackerOp::UpdateIssue, key) {
      return Err(err);
    }

    let mut changes = fields.as_map().clone();
    state.expand_people(&mut changes);
    let stored = state
      .issues
      .iter_mut()
      .find(|i| i.key == key)
      .ok_or_else(|| JiraError::NotFound(format!("Issue {key}")))?;
    stored.fields.extend(changes);
    Ok(())
  }

  async fn list_watchers(&self, key: &str) -> Result<Vec<JiraUser>, JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::ListWatchers(key.to_string()));
    if let Some(err) = state.failure(TrackerOp::ListWatchers, key) {
      return Err(err);
    }
    if state.find(key).is_none() {
      return Err(JiraError::NotFound(format!("Issue {key}")));
    }
    Ok(state.watchers.get(key).cloned().unwrap_or_default())
  }

  async fn add_watcher(&self, key: &str, login: &str) -> Result<(), JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::AddWatcher {
      key: key.to_string(),
      login: login.to_string(),
    });
    if let Some(err) = state.failure(TrackerOp::AddWatcher, key) {
      return Err(err);
    }
    if state.find(key).is_none() {
      return Err(JiraError::NotFound(format!("Issue {key}")));
    }
    let Some(watcher) = state.user_by_login(login).cloned() else {
      return Err(JiraError::NotFound(format!("User {login}")));
    };

    let watchers = state.watchers.entry(key.to_string()).or_default();
    if !watchers.iter().any(|w| w.name == watcher.name) {
      watchers.push(watcher);
    }
    Ok(())
  }

  async fn remove_watcher(&self, key: &str, login: &str) -> Result<(), JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::RemoveWatcher {
      key: key.to_string(),
      login: login.to_string(),
    });
    if let Some(err) = state.failure(TrackerOp::RemoveWatcher, key) {
      return Err(err);
    }
    if state.find(key).is_none() {
      return Err(JiraError::NotFound(format!("Issue {key}")));
    }
    if let Some(watchers) = state.watchers.get_mut(key) {
      watchers.retain(|w| w.name != login);
    }
    Ok(())
  }

  async fn resolve_user(&self, fragment: &str) -> Result<JiraUser, JiraError> {
    let mut state = self.state();
    state.calls.push(TrackerCall::ResolveUser(fragment.to_string()));
    if let Some(err) = state.failure(TrackerOp::ResolveUser, fragment) {
      return Err(err);
    }

    let needle = fragment.trim().to_lowercase();
    let hits = state
      .users
      .iter()
      .filter(|u| u.name.to_lowercase().contains(&needle) || u.display_name.to_lowercase().contains(&needle))
      .cloned()
      .collect();
    pick_user(fragment, hits)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tracker() -> FakeTracker {
    FakeTracker::new()
      .with_user("gildong.hong", "Hong Gildong (gildong.hong)")
      .with_user("cheolsu.kim", "Kim Cheolsu (cheolsu.kim)")
      .with_issue(
        "PROJ-1",
        FieldBag::new()
          .project("PROJ")
          .summary("[ccIC24][WBS3] Analysis")
          .assignee("gildong.hong"),
      )
      .with_issue("PROJ-2", FieldBag::new().project("PROJ").summary("[ccIC24] Other"))
      .with_issue("OTHER-1", FieldBag::new().project("OTHER").summary("[ccIC24] Analysis"))
      .with_watchers("PROJ-1", &["cheolsu.kim"])
  }

  #[tokio::test]
  async fn test_search_clauses() {
    let fake = tracker();

    let keys = |issues: Vec<JiraIssue>| issues.into_iter().map(|i| i.key).collect::<Vec<_>>();
    assert_eq!(
      keys(fake.search("project in (PROJ)", 0, 0).await.unwrap()),
      ["PROJ-1", "PROJ-2"]
    );
    assert_eq!(
      keys(
        fake
          .search("project in (PROJ) AND summary ~ analysis", 0, 0)
          .await
          .unwrap()
      ),
      ["PROJ-1"]
    );
    assert_eq!(keys(fake.search("project in (PROJ)", 1, 10).await.unwrap()), ["PROJ-2"]);
  }

  #[tokio::test]
  async fn test_people_are_expanded() {
    let fake = tracker();
    let issue = fake.get_issue("PROJ-1").await.unwrap();
    let assignee = issue.fields.assignee.unwrap();
    assert_eq!(assignee.display_name, "Hong Gildong (gildong.hong)");
  }

  #[tokio::test]
  async fn test_create_assigns_next_key() {
    let fake = tracker();
    let created = fake
      .create_issue(&FieldBag::new().project("PROJ").summary("New"))
      .await
      .unwrap();
    assert_eq!(created.key, "PROJ-3");
    assert_eq!(created.fields.created.as_deref(), Some(CREATED_AT));
  }

  #[tokio::test]
  async fn test_watchers_are_idempotent() {
    let fake = tracker();
    fake.add_watcher("PROJ-1", "gildong.hong").await.unwrap();
    fake.add_watcher("PROJ-1", "gildong.hong").await.unwrap();
    assert_eq!(fake.watcher_logins("PROJ-1"), ["cheolsu.kim", "gildong.hong"]);

    fake.remove_watcher("PROJ-1", "cheolsu.kim").await.unwrap();
    fake.remove_watcher("PROJ-1", "cheolsu.kim").await.unwrap();
    assert_eq!(fake.watcher_logins("PROJ-1"), ["gildong.hong"]);

    assert!(matches!(
      fake.add_watcher("PROJ-1", "nobody").await,
      Err(JiraError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_injected_failures() {
    let fake = tracker();
    fake.fail_on(TrackerOp::UpdateIssue, "PROJ-2", FailureKind::Validation);

    assert!(fake.update_issue("PROJ-1", &FieldBag::new().summary("x")).await.is_ok());
    assert!(matches!(
      fake.update_issue("PROJ-2", &FieldBag::new()).await,
      Err(JiraError::Validation { .. })
    ));
    assert_eq!(fake.issue("PROJ-1").unwrap().fields.summary, "x");
    assert_eq!(fake.mutations().len(), 2);
  }

  #[tokio::test]
  async fn test_resolve_user() {
    let fake = tracker();
    assert_eq!(fake.resolve_user("gildong").await.unwrap().name, "gildong.hong");
    assert!(matches!(fake.resolve_user("nobody").await, Err(JiraError::NotFound(_))));
  }
}
