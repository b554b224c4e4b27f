//! The tracker interface the bulk operations are written against.

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::models::{FieldBag, JiraIssue, JiraUser};

/// Issue tracker operations used by the bulk workflows.
///
/// Watcher additions and removals are idempotent: adding a current watcher or
/// removing a non-watcher succeeds.
#[allow(async_fn_in_trait)]
pub trait Tracker {
  /// Search by query; `max_results = 0` returns every match
  async fn search(&self, query: &str, start_at: u32, max_results: u32) -> Result<Vec<JiraIssue>, JiraError>;

  async fn get_issue(&self, key: &str) -> Result<JiraIssue, JiraError>;

  /// Create an issue and return it with its server-assigned key
  async fn create_issue(&self, fields: &FieldBag) -> Result<JiraIssue, JiraError>;

  /// Update only the given fields; never touches watchers
  async fn update_issue(&self, key: &str, fields: &FieldBag) -> Result<(), JiraError>;

  async fn list_watchers(&self, key: &str) -> Result<Vec<JiraUser>, JiraError>;

  async fn add_watcher(&self, key: &str, login: &str) -> Result<(), JiraError>;

  async fn remove_watcher(&self, key: &str, login: &str) -> Result<(), JiraError>;

  /// Resolve a name fragment to exactly one user
  async fn resolve_user(&self, fragment: &str) -> Result<JiraUser, JiraError>;
}

impl Tracker for JiraClient {
  async fn search(&self, query: &str, start_at: u32, max_results: u32) -> Result<Vec<JiraIssue>, JiraError> {
    JiraClient::search(self, query, start_at, max_results).await
  }

  async fn get_issue(&self, key: &str) -> Result<JiraIssue, JiraError> {
    JiraClient::get_issue(self, key).await
  }

  async fn create_issue(&self, fields: &FieldBag) -> Result<JiraIssue, JiraError> {
    JiraClient::create_issue(self, fields).await
  }

  async fn update_issue(&self, key: &str, fields: &FieldBag) -> Result<(), JiraError> {
    JiraClient::update_issue(self, key, fields).await
  }

  async fn list_watchers(&self, key: &str) -> Result<Vec<JiraUser>, JiraError> {
    JiraClient::list_watchers(self, key).await
  }

  async fn add_watcher(&self, key: &str, login: &str) -> Result<(), JiraError> {
    JiraClient::add_watcher(self, key, login).await
  }

  async fn remove_watcher(&self, key: &str, login: &str) -> Result<(), JiraError> {
    JiraClient::remove_watcher(self, key, login).await
  }

  async fn resolve_user(&self, fragment: &str) -> Result<JiraUser, JiraError> {
    JiraClient::resolve_user(self, fragment).await
  }
}
