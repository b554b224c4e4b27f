//! # Jira HTTP Client
//!
//! HTTP client for the Jira REST API: request building with basic
//! authentication and mapping of error responses onto [`JiraError`].

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, trace};
use url::{ParseError, Url};

use crate::consts::{API_PREFIX, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::JiraError;
use crate::models::{ErrorCollection, JiraAuth};

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: JiraAuth,
}

impl JiraClient {
  /// Create a new Jira client for a normalized base URL
  pub fn new(base_url: &str, auth: JiraAuth) -> Self {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()
      .unwrap_or_else(|_| Client::new());
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      auth,
    }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn username(&self) -> &str {
    &self.auth.username
  }

  /// Absolute URL of a REST resource given as path segments such as
  /// `["issue", "PROJ-1"]`. Each segment is percent-encoded.
  pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, JiraError> {
    let mut url = Url::parse(&format!("{}{}", self.base_url, API_PREFIX))?;
    url
      .path_segments_mut()
      .map_err(|_| JiraError::Url(ParseError::RelativeUrlWithCannotBeABaseBase))?
      .extend(segments);
    Ok(url)
  }

  /// Start an authenticated request
  pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, JiraError> {
    let url = self.api_url(segments)?;
    trace!("{} {}", method, url);
    Ok(
      self
        .client
        .request(method, url)
        .basic_auth(&self.auth.username, Some(&self.auth.password)),
    )
  }

  /// Send a request, mapping transport failures to [`JiraError::Network`]
  pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, JiraError> {
    let response = request.send().await.map_err(JiraError::Network)?;
    debug!("Tracker responded with HTTP {}", response.status());
    Ok(response)
  }

  /// Decode a successful JSON body
  pub(crate) async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, JiraError> {
    let text = response.text().await.map_err(JiraError::Network)?;
    serde_json::from_str(&text).map_err(|e| JiraError::Decode(e.to_string()))
  }

  /// Server supplied messages of an error body, or the raw body when it is
  /// not an error collection
  pub(crate) async fn error_messages(response: Response) -> Vec<String> {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorCollection>(&body) {
      Ok(errors) if !errors.messages().is_empty() => errors.messages(),
      _ if body.trim().is_empty() => Vec::new(),
      _ => vec![body],
    }
  }

  /// Error for a status that no endpoint handles specially.
  ///
  /// A 401 or 403 here means the logged-in user may not touch `target`; bad
  /// credentials are only reported by the login call.
  pub(crate) async fn unexpected(response: Response, target: &str) -> JiraError {
    let status = response.status();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
      return JiraError::Forbidden {
        target: target.to_string(),
        status: status.as_u16(),
      };
    }
    JiraError::Unexpected {
      status: status.as_u16(),
      body: response.text().await.unwrap_or_default(),
    }
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, password: &str) -> Result<JiraClient> {
  let base_url = sheaf_core::url::normalize_base_url(base_url).context("Invalid tracker address")?;
  let auth = JiraAuth {
    username: username.to_string(),
    password: password.to_string(),
  };

  Ok(JiraClient::new(&base_url, auth))
}
