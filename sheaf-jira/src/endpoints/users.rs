//! # Jira User Endpoints
//!
//! The logged-in user and login lookup by name fragment.

use reqwest::{Method, StatusCode};

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::models::JiraUser;

impl JiraClient {
  /// Get the user the client is authenticated as
  pub async fn myself(&self) -> Result<JiraUser, JiraError> {
    let response = self.send(self.request(Method::GET, &["myself"])?).await?;

    match response.status() {
      StatusCode::OK => Self::decode(response).await,
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JiraError::Auth),
      _ => Err(Self::unexpected(response, "Current user").await),
    }
  }

  /// Find users whose login, name, or email contains a fragment
  pub async fn search_users(&self, fragment: &str) -> Result<Vec<JiraUser>, JiraError> {
    let request = self
      .request(Method::GET, &["user", "search"])?
      .query(&[("username", fragment)]);
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK => Self::decode(response).await,
      StatusCode::NOT_FOUND => Ok(Vec::new()),
      _ => Err(Self::unexpected(response, &format!("User search '{fragment}'")).await),
    }
  }

  /// Resolve a name fragment to exactly one user.
  ///
  /// An exact login or display name match wins; otherwise the fragment must
  /// match a single user.
  pub async fn resolve_user(&self, fragment: &str) -> Result<JiraUser, JiraError> {
    let users = self.search_users(fragment).await?;
    pick_user(fragment, users)
  }
}

/// Choose the user a fragment refers to among search hits
pub fn pick_user(fragment: &str, mut users: Vec<JiraUser>) -> Result<JiraUser, JiraError> {
  let wanted = fragment.trim();
  if let Some(index) = users
    .iter()
    .position(|u| u.name.eq_ignore_ascii_case(wanted) || u.display_name == wanted)
  {
    return Ok(users.swap_remove(index));
  }

  match users.len() {
    0 => Err(JiraError::NotFound(format!("User '{wanted}'"))),
    1 => Ok(users.remove(0)),
    _ => Err(JiraError::AmbiguousUser {
      fragment: wanted.to_string(),
      candidates: users.iter().map(JiraUser::login).collect(),
    }),
  }
}
