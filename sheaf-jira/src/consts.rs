//! Constants for the sheaf-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!("sheaf/", env!("CARGO_PKG_VERSION"));

/// REST API prefix appended to the tracker base URL
pub const API_PREFIX: &str = "/rest/api/2";

/// Page size used when a search asks for every match
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 60;
