//! Watcher management across every issue of a query.

use std::time::Duration;

use anyhow::Result;
use sheaf_jira::{JiraIssue, JiraUser, Tracker};

use crate::pacer::Pacer;
use crate::report::{ItemReport, Operation, OperationReport, Outcome, Reporter, recoverable};

/// Parameters of an add-watchers run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddWatchersRequest {
  pub query: String,
  /// Login of the person whose issues get the new watchers
  pub person: String,
  /// Logins to add as watchers
  pub watchers: Vec<String>,
  /// Pause after every issue, matched or not
  pub delay: Duration,
}

fn involves(issue: &JiraIssue, watchers: &[JiraUser], login: &str) -> bool {
  issue
    .fields
    .assignee
    .as_ref()
    .is_some_and(|assignee| assignee.matches_login(login))
    || watchers.iter().any(|w| w.matches_login(login))
}

/// Add watchers to every issue the person is assigned to or watches
pub async fn add_watchers_for_person<T: Tracker>(
  tracker: &T,
  request: &AddWatchersRequest,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let issues = tracker.search(&request.query, 0, 0).await?;
  let names: Vec<&str> = request
    .watchers
    .iter()
    .map(|w| w.trim())
    .filter(|w| !w.is_empty())
    .collect();
  let mut pacer = Pacer::new(request.delay);
  let mut reporter = Reporter::new(Operation::AddWatchers, observer);

  for (index, issue) in issues.iter().enumerate() {
    let seq = index + 1;
    let summary = &issue.fields.summary;

    let item = match tracker.list_watchers(&issue.key).await {
      Err(err) => ItemReport::new(seq, &issue.key, summary, Outcome::Failed { reason: recoverable(err)? }),
      Ok(watchers) if !involves(issue, &watchers, &request.person) => {
        ItemReport::new(seq, &issue.key, summary, Outcome::NotMatched)
      }
      Ok(_) => {
        let mut notes = Vec::new();
        let mut count = 0;
        for name in &names {
          match tracker.add_watcher(&issue.key, name).await {
            Ok(()) => count += 1,
            Err(err) => notes.push(format!("watcher {name}: {}", recoverable(err)?)),
          }
        }
        ItemReport::new(seq, &issue.key, summary, Outcome::WatchersAdded { count }).with_notes(notes)
      }
    };

    reporter.push(item);
    pacer.wait().await;
  }

  Ok(reporter.finish())
}

/// Remove one person from the watcher list of every issue of a query
pub async fn remove_watcher_everywhere<T: Tracker>(
  tracker: &T,
  query: &str,
  person: &str,
  observer: &mut dyn FnMut(&ItemReport),
) -> Result<OperationReport> {
  let issues = tracker.search(query, 0, 0).await?;
  let mut reporter = Reporter::new(Operation::RemoveWatcher, observer);

  for (index, issue) in issues.iter().enumerate() {
    let seq = index + 1;
    let summary = &issue.fields.summary;

    let outcome = match tracker.list_watchers(&issue.key).await {
      Err(err) => Outcome::Failed {
        reason: recoverable(err)?,
      },
      Ok(watchers) => match watchers.iter().find(|w| w.matches_login(person)) {
        None => Outcome::NotMatched,
        Some(watcher) => {
          let login = watcher.login();
          match tracker.remove_watcher(&issue.key, &login).await {
            Ok(()) => Outcome::WatcherRemoved { login },
            Err(err) => Outcome::Failed {
              reason: recoverable(err)?,
            },
          }
        }
      },
    };

    reporter.push(ItemReport::new(seq, &issue.key, summary, outcome));
  }

  Ok(reporter.finish())
}
