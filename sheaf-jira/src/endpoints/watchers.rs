//! # Jira Watcher Endpoints
//!
//! Listing, adding, and removing the watchers of an issue. Adding a watcher
//! that already watches, or removing one that does not, succeeds.

use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::models::{JiraUser, WatchersResponse};

impl JiraClient {
  /// List the users watching an issue
  pub async fn list_watchers(&self, issue_key: &str) -> Result<Vec<JiraUser>, JiraError> {
    let response = self
      .send(self.request(Method::GET, &["issue", issue_key, "watchers"])?)
      .await?;

    match response.status() {
      StatusCode::OK => Ok(Self::decode::<WatchersResponse>(response).await?.watchers),
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("Issue {issue_key}"))),
      _ => Err(Self::unexpected(response, &format!("Watchers of {issue_key}")).await),
    }
  }

  /// Add a watcher by login
  pub async fn add_watcher(&self, issue_key: &str, login: &str) -> Result<(), JiraError> {
    // The body is a bare JSON string
    let request = self
      .request(Method::POST, &["issue", issue_key, "watchers"])?
      .json(&login);
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK | StatusCode::NO_CONTENT => {
        debug!("Added watcher {} to {}", login, issue_key);
        Ok(())
      }
      StatusCode::BAD_REQUEST => Err(JiraError::Validation {
        target: format!("Watcher {login} on {issue_key}"),
        errors: Self::error_messages(response).await,
      }),
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("Issue {issue_key} or user {login}"))),
      _ => Err(Self::unexpected(response, &format!("Watchers of {issue_key}")).await),
    }
  }

  /// Remove a watcher by login
  pub async fn remove_watcher(&self, issue_key: &str, login: &str) -> Result<(), JiraError> {
    let request = self
      .request(Method::DELETE, &["issue", issue_key, "watchers"])?
      .query(&[("username", login)]);
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK | StatusCode::NO_CONTENT => {
        debug!("Removed watcher {} from {}", login, issue_key);
        Ok(())
      }
      StatusCode::BAD_REQUEST => Err(JiraError::Validation {
        target: format!("Watcher {login} on {issue_key}"),
        errors: Self::error_messages(response).await,
      }),
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("Issue {issue_key} or user {login}"))),
      _ => Err(Self::unexpected(response, &format!("Watchers of {issue_key}")).await),
    }
  }
}
