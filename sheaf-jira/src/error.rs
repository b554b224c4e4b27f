//! Errors returned by the tracker client.

use thiserror::Error;

/// Failures of a tracker call.
///
/// `Auth`, `Network` and `Url` are fatal to a running bulk operation; everything
/// else concerns a single item and is reported while processing continues.
/// `Auth` comes only from the login call. A 401 or 403 on any other call is
/// `Forbidden`, since the credentials were already accepted.
#[derive(Debug, Error)]
pub enum JiraError {
  #[error("Authentication failed. Please check your ID and password.")]
  Auth,

  #[error("Query rejected: {0}")]
  Query(String),

  #[error("{target} rejected: {}", .errors.join("; "))]
  Validation { target: String, errors: Vec<String> },

  #[error("{0} not found")]
  NotFound(String),

  #[error("Permission denied for {target} (HTTP {status})")]
  Forbidden { target: String, status: u16 },

  #[error("User '{fragment}' is ambiguous: {}", .candidates.join(", "))]
  AmbiguousUser { fragment: String, candidates: Vec<String> },

  #[error("Network error: {0}")]
  Network(#[source] reqwest::Error),

  #[error("Invalid tracker address: {0}")]
  Url(#[from] url::ParseError),

  #[error("Unexpected error: HTTP {status} - {body}")]
  Unexpected { status: u16, body: String },

  #[error("Failed to parse tracker response: {0}")]
  Decode(String),
}

impl JiraError {
  /// Whether the error should abort a bulk operation
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::Auth | Self::Network(_) | Self::Url(_))
  }
}
