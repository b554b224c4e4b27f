//! Tracker base URL normalization.
//!
//! Tracker instances are often served under a context path
//! (`http://tracker.example.com/issue/`), so the path is kept while the scheme
//! is filled in and a trailing slash is removed.

use anyhow::{Context, Result};
use url::Url;

/// Normalize a tracker base URL.
///
/// If the input has no scheme, `https://` is assumed. The path is preserved
/// without its trailing slash; query and fragment are dropped since REST paths
/// are appended to the result.
pub fn normalize_base_url(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    anyhow::bail!("Host cannot be empty");
  }

  let lowered = trimmed.to_ascii_lowercase();
  let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
    trimmed.to_string()
  } else {
    format!("https://{trimmed}")
  };

  let url = Url::parse(&with_scheme).with_context(|| format!("Invalid URL format: {trimmed}"))?;
  let host = url
    .host_str()
    .with_context(|| format!("URL must have a valid host: {trimmed}"))?;

  let mut result = format!("{}://{}", url.scheme(), host);
  if let Some(port) = url.port() {
    result.push_str(&format!(":{port}"));
  }
  result.push_str(url.path().trim_end_matches('/'));

  Ok(result)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keeps_context_path() {
    let result = normalize_base_url("http://tracker.example.com/issue/").unwrap();
    assert_eq!(result, "http://tracker.example.com/issue");
  }

  #[test]
  fn test_adds_https_scheme() {
    let result = normalize_base_url("company.atlassian.net").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_keeps_port() {
    let result = normalize_base_url("http://localhost:8080").unwrap();
    assert_eq!(result, "http://localhost:8080");

    let result = normalize_base_url("localhost:9443/jira").unwrap();
    assert_eq!(result, "https://localhost:9443/jira");
  }

  #[test]
  fn test_scheme_is_case_insensitive() {
    let result = normalize_base_url("HTTP://example.com/").unwrap();
    assert_eq!(result, "http://example.com");
  }

  #[test]
  fn test_drops_query_and_fragment() {
    let result = normalize_base_url("https://example.com/jira?x=1#top").unwrap();
    assert_eq!(result, "https://example.com/jira");
  }

  #[test]
  fn test_empty_host() {
    let result = normalize_base_url("   ");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Host cannot be empty"));
  }
}
