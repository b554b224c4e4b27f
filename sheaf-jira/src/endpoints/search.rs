//! # Jira Search Endpoint
//!
//! JQL search with transparent paging for uncapped queries.

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use crate::client::JiraClient;
use crate::consts::SEARCH_PAGE_SIZE;
use crate::error::JiraError;
use crate::models::{JiraIssue, SearchResults};

impl JiraClient {
  /// Fetch one page of search results
  pub async fn search_page(&self, jql: &str, start_at: u32, max_results: u32) -> Result<SearchResults, JiraError> {
    let request = self.request(Method::GET, &["search"])?.query(&[
      ("jql", jql.to_string()),
      ("startAt", start_at.to_string()),
      ("maxResults", max_results.to_string()),
    ]);
    let response = self.send(request).await?;

    match response.status() {
      StatusCode::OK => Self::decode(response).await,
      StatusCode::BAD_REQUEST => Err(JiraError::Query(Self::error_messages(response).await.join("; "))),
      _ => Err(Self::unexpected(response, "Search").await),
    }
  }

  /// Search issues by JQL.
  ///
  /// `max_results = 0` fetches every match, page by page, until the reported
  /// total is reached or a page comes back empty.
  pub async fn search(&self, jql: &str, start_at: u32, max_results: u32) -> Result<Vec<JiraIssue>, JiraError> {
    if max_results > 0 {
      return Ok(self.search_page(jql, start_at, max_results).await?.issues);
    }

    let mut issues = Vec::new();
    let mut next = start_at;
    loop {
      let page = self.search_page(jql, next, SEARCH_PAGE_SIZE).await?;
      let fetched = page.issues.len() as u32;
      debug!("Fetched {} issues at offset {} of {}", fetched, next, page.total);

      issues.extend(page.issues);
      next = page.start_at.max(next) + fetched;
      if fetched == 0 || next >= page.total {
        break;
      }
    }

    info!("Search returned {} issues", issues.len());
    Ok(issues)
  }
}
