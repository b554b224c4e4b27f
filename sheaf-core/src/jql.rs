//! # Query Builder
//!
//! Assembles tracker queries the way the login form does: a project filter
//! followed by up to three optional summary keywords, all ANDed together.

/// Maximum number of keyword filters taken into account
pub const MAX_KEYWORDS: usize = 3;

/// Builds `project in (P) AND summary ~ K1 AND ...` queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
  project: String,
  keywords: Vec<String>,
}

impl QueryBuilder {
  /// Start a query for one project
  pub fn new(project: impl Into<String>) -> Self {
    Self {
      project: project.into(),
      keywords: Vec::new(),
    }
  }

  /// Add a keyword filter; blank keywords and anything past the third are
  /// ignored
  pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
    let keyword = keyword.as_ref().trim();
    if !keyword.is_empty() && self.keywords.len() < MAX_KEYWORDS {
      self.keywords.push(keyword.to_string());
    }
    self
  }

  /// Add several keyword filters
  pub fn keywords<I, S>(self, keywords: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    keywords.into_iter().fold(self, |builder, k| builder.keyword(k))
  }

  /// Keywords that made it into the query
  pub fn active_keywords(&self) -> &[String] {
    &self.keywords
  }

  pub fn project(&self) -> &str {
    &self.project
  }

  /// Render the query string
  pub fn build(&self) -> String {
    let mut query = format!("project in ({})", self.project.trim());
    for keyword in &self.keywords {
      query = and_summary(&query, keyword);
    }
    query
  }
}

/// Append one `AND summary ~ <term>` clause to a query
pub fn and_summary(query: &str, term: &str) -> String {
  format!("{query} AND summary ~ {term}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_project_only() {
    assert_eq!(QueryBuilder::new("HKMCCLUHUD").build(), "project in (HKMCCLUHUD)");
  }

  #[test]
  fn test_keywords_are_anded() {
    let query = QueryBuilder::new("HKMCCLUHUD").keywords(["ccIC24", "WBS3"]).build();
    assert_eq!(query, "project in (HKMCCLUHUD) AND summary ~ ccIC24 AND summary ~ WBS3");
  }

  #[test]
  fn test_blank_and_extra_keywords_are_ignored() {
    let builder = QueryBuilder::new("P").keywords(["a", "  ", "b", "c", "d"]);
    assert_eq!(builder.active_keywords(), ["a", "b", "c"]);
    assert_eq!(
      builder.build(),
      "project in (P) AND summary ~ a AND summary ~ b AND summary ~ c"
    );
  }

  #[test]
  fn test_and_summary() {
    assert_eq!(
      and_summary("project in (P)", "Analysis"),
      "project in (P) AND summary ~ Analysis"
    );
  }
}
