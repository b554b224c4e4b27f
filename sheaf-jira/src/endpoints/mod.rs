//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by resource: issue search, issue reads
//! and writes, watcher lists, and user lookup.

pub mod issues;
pub mod search;
pub mod users;
pub mod watchers;

#[cfg(test)]
pub(crate) fn test_client(base_url: &str) -> crate::client::JiraClient {
  crate::client::JiraClient::new(
    base_url,
    crate::models::JiraAuth {
      username: "test_user".to_string(),
      password: "test_token".to_string(),
    },
  )
}

