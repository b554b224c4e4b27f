//! # Tracker Session
//!
//! A logged-in connection to the tracker. Credentials are checked once at
//! login by fetching the current user.

use anyhow::{Context, Result};
use tracing::info;

use crate::client::{JiraClient, create_jira_client};
use crate::error::JiraError;
use crate::models::JiraUser;

/// An authenticated tracker connection
pub struct Session {
  client: JiraClient,
  user: JiraUser,
}

impl Session {
  /// Log in with a base URL and credentials.
  ///
  /// Fails with [`JiraError::Auth`] in the error chain when the tracker
  /// rejects the credentials.
  pub async fn login(base_url: &str, username: &str, password: &str) -> Result<Self> {
    let client = create_jira_client(base_url, username, password)?;
    Self::open(client).await
  }

  /// Verify an existing client and wrap it in a session
  pub async fn open(client: JiraClient) -> Result<Self> {
    let user = client
      .myself()
      .await
      .with_context(|| format!("Failed to log in to {}", client.base_url()))?;
    info!("Logged in to {} as {}", client.base_url(), user);
    Ok(Self { client, user })
  }

  pub fn client(&self) -> &JiraClient {
    &self.client
  }

  /// The logged-in user
  pub fn user(&self) -> &JiraUser {
    &self.user
  }

  /// End the session, dropping the connection pool and credentials
  pub fn logout(self) {
    info!("Logged out {}", self.user.login());
  }
}

/// Whether an error chain bottoms out in rejected credentials
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
  err
    .chain()
    .any(|cause| matches!(cause.downcast_ref::<JiraError>(), Some(JiraError::Auth)))
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{basic_auth, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[tokio::test]
  async fn test_login_and_logout() -> Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .and(basic_auth("gildong.hong", "secret"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "name": "gildong.hong",
          "displayName": "Hong Gildong (gildong.hong)"
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let session = Session::login(&mock_server.uri(), "gildong.hong", "secret").await?;
    assert_eq!(session.user().login(), "gildong.hong");
    assert_eq!(session.client().base_url(), mock_server.uri());
    session.logout();

    Ok(())
  }

  #[tokio::test]
  async fn test_login_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&mock_server)
      .await;

    let err = Session::login(&mock_server.uri(), "gildong.hong", "wrong")
      .await
      .err()
      .unwrap();
    assert!(is_auth_failure(&err));
    assert!(err.to_string().contains("Failed to log in"));
  }

  #[test]
  fn test_permission_denial_is_not_auth_failure() {
    let denied = anyhow::Error::new(JiraError::Forbidden {
      target: "Issue PROJ-8".to_string(),
      status: 403,
    })
    .context("Failed to update PROJ-8");
    assert!(!is_auth_failure(&denied));

    let rejected = anyhow::Error::new(JiraError::Auth).context("Failed to log in");
    assert!(is_auth_failure(&rejected));
  }
}
