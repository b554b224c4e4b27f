//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, creating, and updating Jira issues.

use reqwest::{Method, StatusCode};
use serde_json::json;
use tracing::info;

use crate::client::JiraClient;
use crate::error::JiraError;
use crate::models::{CreatedIssue, FieldBag, JiraIssue};

impl JiraClient {
  /// Get a Jira issue by key
  pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssue, JiraError> {
    let response = self.send(self.request(Method::GET, &["issue", issue_key])?).await?;

    match response.status() {
      StatusCode::OK => Self::decode(response).await,
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("Issue {issue_key}"))),
      _ => Err(Self::unexpected(response, &format!("Issue {issue_key}")).await),
    }
  }

  /// Create an issue and return it as stored by the tracker
  pub async fn create_issue(&self, fields: &FieldBag) -> Result<JiraIssue, JiraError> {
    let request = self
      .request(Method::POST, &["issue"])?
      .json(&json!({ "fields": fields }));
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK | StatusCode::CREATED => {
        let created: CreatedIssue = Self::decode(response).await?;
        info!("Created issue {}", created.key);
        self.get_issue(&created.key).await
      }
      StatusCode::BAD_REQUEST => Err(JiraError::Validation {
        target: "New issue".to_string(),
        errors: Self::error_messages(response).await,
      }),
      _ => Err(Self::unexpected(response, "New issue").await),
    }
  }

  /// Update the given fields of an issue, notifying its watchers
  pub async fn update_issue(&self, issue_key: &str, fields: &FieldBag) -> Result<(), JiraError> {
    let request = self
      .request(Method::PUT, &["issue", issue_key])?
      .query(&[("notifyUsers", "true")])
      .json(&json!({ "fields": fields }));
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK | StatusCode::NO_CONTENT => {
        info!("Updated issue {}", issue_key);
        Ok(())
      }
      StatusCode::BAD_REQUEST => Err(JiraError::Validation {
        target: issue_key.to_string(),
        errors: Self::error_messages(response).await,
      }),
      StatusCode::NOT_FOUND => Err(JiraError::NotFound(format!("Issue {issue_key}"))),
      _ => Err(Self::unexpected(response, &format!("Issue {issue_key}")).await),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_client;
  use crate::error::JiraError;
  use crate::models::FieldBag;

  #[tokio::test]
  async fn test_get_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .and(basic_auth("test_user", "test_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "id": "10000",
          "key": "TEST-123",
          "fields": {
              "summary": "Test issue",
              "description": "This is a test issue",
              "status": { "id": "10001", "name": "In Progress" }
          }
      })))
      .mount(&mock_server)
      .await;

    let issue = client.get_issue("TEST-123").await?;
    assert_eq!(issue.key, "TEST-123");
    assert_eq!(issue.fields.summary, "Test issue");
    assert_eq!(issue.fields.status_name(), "In Progress");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_not_found() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NONEXISTENT-123"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("NONEXISTENT-123").await.unwrap_err();
    assert!(matches!(err, JiraError::NotFound(_)));
    assert!(err.to_string().contains("not found"));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_forbidden() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/TEST-123"))
      .respond_with(ResponseTemplate::new(403))
      .mount(&mock_server)
      .await;

    let err = client.get_issue("TEST-123").await.unwrap_err();
    match &err {
      JiraError::Forbidden { target, status } => {
        assert_eq!(target, "Issue TEST-123");
        assert_eq!(*status, 403);
      }
      other => panic!("expected permission error, got {other:?}"),
    }
    assert!(!err.is_fatal());

    Ok(())
  }

  #[tokio::test]
  async fn test_create_issue_fetches_created_issue() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());
    let fields = FieldBag::new()
      .project("PROJ")
      .summary("[ccIC24] SyRS")
      .issue_type("Sub-task")
      .parent("PROJ-100");

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue"))
      .and(body_json(json!({
          "fields": {
              "project": { "key": "PROJ" },
              "summary": "[ccIC24] SyRS",
              "issuetype": { "name": "Sub-task" },
              "parent": { "key": "PROJ-100" }
          }
      })))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
          "id": "10101",
          "key": "PROJ-101",
          "self": "http://tracker/rest/api/2/issue/10101"
      })))
      .expect(1)
      .mount(&mock_server)
      .await;
    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/PROJ-101"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "id": "10101",
          "key": "PROJ-101",
          "fields": {
              "summary": "[ccIC24] SyRS",
              "created": "2023-08-02T09:00:00.000+0900",
              "parent": { "key": "PROJ-100" }
          }
      })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let issue = client.create_issue(&fields).await?;
    assert_eq!(issue.key, "PROJ-101");
    assert_eq!(issue.fields.created.as_deref(), Some("2023-08-02T09:00:00.000+0900"));

    Ok(())
  }

  #[tokio::test]
  async fn test_create_issue_validation() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
          "errorMessages": [],
          "errors": { "parent": "Parent is required for sub-tasks" }
      })))
      .mount(&mock_server)
      .await;

    match client.create_issue(&FieldBag::new().issue_type("Sub-task")).await {
      Err(JiraError::Validation { target, errors }) => {
        assert_eq!(target, "New issue");
        assert_eq!(errors, vec!["parent: Parent is required for sub-tasks"]);
      }
      other => panic!("expected validation error, got {other:?}"),
    }

    Ok(())
  }

  #[tokio::test]
  async fn test_update_issue_notifies_users() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-1"))
      .and(query_param("notifyUsers", "true"))
      .and(body_json(json!({ "fields": { "summary": "Renamed", "assignee": null } })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client
      .update_issue("PROJ-1", &FieldBag::new().summary("Renamed").assignee(""))
      .await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_update_issue_rejected() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-1"))
      .respond_with(ResponseTemplate::new(400).set_body_json(json!({
          "errors": { "priority": "Priority name 'P9' is not valid" }
      })))
      .mount(&mock_server)
      .await;
    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-404"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&mock_server)
      .await;

    let err = client
      .update_issue("PROJ-1", &FieldBag::new().priority("P9"))
      .await
      .unwrap_err();
    assert!(err.to_string().contains("PROJ-1 rejected: priority"));
    assert!(!err.is_fatal());

    let err = client.update_issue("PROJ-404", &FieldBag::new()).await.unwrap_err();
    assert!(matches!(err, JiraError::NotFound(_)));

    Ok(())
  }

  #[tokio::test]
  async fn test_update_issue_without_edit_permission() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let client = test_client(&mock_server.uri());

    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-8"))
      .respond_with(ResponseTemplate::new(403))
      .expect(1)
      .mount(&mock_server)
      .await;
    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-9"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    let err = client
      .update_issue("PROJ-8", &FieldBag::new().summary("Renamed"))
      .await
      .unwrap_err();
    assert!(matches!(err, JiraError::Forbidden { status: 403, .. }));
    assert!(!err.is_fatal());
    assert!(err.to_string().contains("Issue PROJ-8"));

    // The same client keeps working for issues the user may edit
    client.update_issue("PROJ-9", &FieldBag::new().summary("Renamed")).await?;

    Ok(())
  }
}
