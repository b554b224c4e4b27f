//! # Report Rendering
//!
//! Terminal output for operation results: one line per item as it arrives,
//! a spinner while the tracker is busy, and the closing summary.

use std::io::{IsTerminal, stderr};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use sheaf_core::output::{format_issue_key, format_status, print_header, print_success, print_warning};
use sheaf_ops::{IssueDetails, ItemReport, OperationReport, Outcome};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Progress is drawn only when stderr is an interactive terminal
fn should_show_progress() -> bool {
  stderr().is_terminal()
}

/// Prints item lines while an operation runs
pub struct LiveReport {
  spinner: ProgressBar,
}

impl LiveReport {
  pub fn start(message: &str) -> Self {
    let spinner = ProgressBar::new_spinner();
    if should_show_progress() {
      if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
      }
      spinner.set_message(message.to_string());
      spinner.enable_steady_tick(Duration::from_millis(100));
    } else {
      spinner.set_draw_target(ProgressDrawTarget::hidden());
    }
    Self { spinner }
  }

  pub fn observe(&self, item: &ItemReport) {
    let line = item_line(item);
    self.spinner.suspend(|| println!("{line}"));
  }

  pub fn finish(self) {
    self.spinner.finish_and_clear();
  }
}

/// One colored line per item, notes indented beneath it
pub fn item_line(item: &ItemReport) -> String {
  let outcome = match &item.outcome {
    Outcome::Failed { .. } => item.outcome.red().bold().to_string(),
    Outcome::Skipped | Outcome::NotMatched | Outcome::AlreadyExists => item.outcome.dimmed().to_string(),
    Outcome::Exported { lossy: true } => item.outcome.yellow().to_string(),
    _ => item.outcome.green().to_string(),
  };
  let key = if item.key.is_empty() { "-" } else { item.key.as_str() };

  let mut line = format!(
    "[{}][{} : {}] {}",
    item.seq,
    format_issue_key(key),
    item.summary,
    outcome
  );
  for note in &item.notes {
    line.push_str(&format!("\n    {} {}", "note:".yellow(), note));
  }
  line
}

#[derive(Tabled)]
struct FailureRow {
  #[tabled(rename = "#")]
  seq: usize,
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Summary")]
  summary: String,
  #[tabled(rename = "Reason")]
  reason: String,
}

/// Print the completion line, then a table of failed items if there are any
pub fn print_report_summary(report: &OperationReport) {
  let failures: Vec<FailureRow> = report
    .failures()
    .map(|item| FailureRow {
      seq: item.seq,
      key: item.key.clone(),
      summary: item.summary.clone(),
      reason: match &item.outcome {
        Outcome::Failed { reason } => reason.clone(),
        other => other.to_string(),
      },
    })
    .collect();

  println!();
  if failures.is_empty() {
    print_success(&report.summary_line());
  } else {
    print_warning(&report.summary_line());
    println!("{}", Table::new(failures).with(Style::sharp()));
  }
}

#[derive(Tabled)]
struct BrowseRow {
  #[tabled(rename = "Key")]
  key: String,
  #[tabled(rename = "Summary")]
  summary: String,
  #[tabled(rename = "Type")]
  issue_type: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Assignee")]
  assignee: String,
  #[tabled(rename = "Due")]
  due_date: String,
  #[tabled(rename = "Watchers")]
  watchers: usize,
}

/// Compact table of browsed issues
pub fn browse_table(issues: &[IssueDetails]) -> String {
  let rows: Vec<BrowseRow> = issues
    .iter()
    .map(|issue| BrowseRow {
      key: issue.key.clone(),
      summary: issue.summary.clone(),
      issue_type: issue.issue_type.clone(),
      status: issue.status.clone(),
      assignee: issue.assignee.clone().unwrap_or_default(),
      due_date: issue.due_date.clone().unwrap_or_default(),
      watchers: issue.watchers.len(),
    })
    .collect();
  Table::new(rows).with(Style::sharp()).to_string()
}

/// Every field of one browsed issue
pub fn print_issue_details(issue: &IssueDetails) {
  let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
  let list = |values: &[String]| {
    if values.is_empty() {
      "-".to_string()
    } else {
      values.join(", ")
    }
  };

  print_header(&format!("{} {}", format_issue_key(&issue.key), issue.summary));
  println!("  Parent:      {}", optional(&issue.parent));
  println!("  Project:     {}", issue.project);
  println!("  Type:        {}", issue.issue_type);
  println!("  Priority:    {}", issue.priority);
  println!("  Components:  {}", list(&issue.components));
  println!("  Labels:      {}", list(&issue.labels));
  println!("  Project tag: {}", optional(&issue.custom_field));
  println!("  Status:      {}", format_status(&issue.status));
  println!("  Resolution:  {}", optional(&issue.resolution));
  println!("  Assignee:    {}", optional(&issue.assignee));
  println!("  Reporter:    {}", optional(&issue.reporter));
  println!("  Watchers:    {}", list(&issue.watchers));
  println!("  Due:         {}", optional(&issue.due_date));
  println!("  Created:     {}", optional(&issue.created));
  if let Some(description) = &issue.description {
    println!("  Description:");
    for line in description.lines() {
      println!("    {line}");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn details(key: &str, summary: &str) -> IssueDetails {
    IssueDetails {
      parent: None,
      key: key.to_string(),
      project: "PROJ".to_string(),
      summary: summary.to_string(),
      issue_type: "Task".to_string(),
      priority: "P2".to_string(),
      components: Vec::new(),
      labels: Vec::new(),
      custom_field: None,
      status: "Open".to_string(),
      resolution: None,
      assignee: Some("Hong Gildong (gildong.hong)".to_string()),
      reporter: None,
      watchers: vec!["Lee Younghee (younghee.lee)".to_string()],
      due_date: Some("2023-08-31".to_string()),
      created: None,
      description: None,
    }
  }

  #[test]
  fn test_item_line_includes_notes() {
    let item = ItemReport::new(2, "PROJ-4", "[ccIC24] SyRS", Outcome::WatchersAdded { count: 1 })
      .with_notes(vec!["watcher kim: User 'kim' not found".to_string()]);
    let line = item_line(&item);

    assert!(line.contains("PROJ-4"));
    assert!(line.contains("[ccIC24] SyRS"));
    assert!(line.contains("1 watchers added"));
    assert!(line.contains("watcher kim: User 'kim' not found"));
    assert_eq!(line.lines().count(), 2);
  }

  #[test]
  fn test_item_line_without_key() {
    let item = ItemReport::new(
      1,
      "",
      "sheaf sample issue",
      Outcome::Failed {
        reason: "bad priority".to_string(),
      },
    );
    assert!(item_line(&item).contains("-"));
    assert!(item_line(&item).contains("bad priority"));
  }

  #[test]
  fn test_browse_table() {
    let table = browse_table(&[details("PROJ-1", "[ccIC24] Analysis"), details("PROJ-2", "[ccIC24] SyRS")]);

    assert!(table.contains("Key"));
    assert!(table.contains("Watchers"));
    assert!(table.contains("PROJ-2"));
    assert!(table.contains("Hong Gildong (gildong.hong)"));
    // header, separator lines, and one line per issue
    assert!(table.lines().count() >= 4);
  }
}
