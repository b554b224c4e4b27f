//! Tracker user name normalization.
//!
//! The tracker renders users as display names such as
//! `Hong Gildong (gildong.hong)` or `Last, First (login)`. When only that text
//! is available (CSV cells, display strings) the login is recovered from the
//! trailing token. This is a heuristic: a display name without a login token
//! yields its last word.

/// Reduce a displayed user name to the login fragment used for lookups.
///
/// Takes the part after the final whitespace, then strips one pair of
/// surrounding parentheses.
pub fn normalize_login(display: &str) -> String {
  let token = display.split_whitespace().last().unwrap_or("");
  let token = match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
    Some(inner) => inner,
    None => token,
  };
  token.to_string()
}

/// Whether a displayed user name refers to the given login
pub fn matches_login(display: &str, login: &str) -> bool {
  let login = login.trim();
  !login.is_empty() && normalize_login(display) == login
}
