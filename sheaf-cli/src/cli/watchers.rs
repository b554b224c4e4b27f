//! # Watcher Commands
//!
//! Adds watchers to the issues a person is involved in, or removes a person
//! from every watcher list of the query.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use sheaf_core::output::print_info;
use sheaf_ops::{AddWatchersRequest, ItemReport, add_watchers_for_person, remove_watcher_everywhere};

use super::TargetArgs;
use crate::context::{Connection, Settings, announce_query};
use crate::render::{LiveReport, print_report_summary};

/// Command for adding watchers
#[derive(Args)]
pub struct AddWatchersArgs {
  /// Login of the person whose issues get the new watchers
  #[arg(long, required = true)]
  pub person: String,

  /// Login of a watcher to add (repeatable)
  #[arg(long = "watcher", short = 'w', required = true)]
  pub watchers: Vec<String>,

  /// Seconds to wait after each issue (default from config: 30)
  #[arg(long)]
  pub delay: Option<u64>,
}

impl AddWatchersArgs {
  pub fn request(&self, settings: &Settings, query: String) -> Result<AddWatchersRequest> {
    let watchers: Vec<String> = self
      .watchers
      .iter()
      .map(|w| w.trim().to_string())
      .filter(|w| !w.is_empty())
      .collect();
    if watchers.is_empty() {
      bail!("No watchers given");
    }

    Ok(AddWatchersRequest {
      query,
      person: self.person.trim().to_string(),
      watchers,
      delay: self
        .delay
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.add_watchers_delay()),
    })
  }
}

/// Command for removing a watcher
#[derive(Args)]
pub struct RemoveWatcherArgs {
  /// Login of the watcher to remove
  #[arg(long, required = true)]
  pub person: String,
}

pub(crate) fn handle_add_watchers_command(target: &TargetArgs, args: AddWatchersArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let request = args.request(&settings, settings.query()?)?;

  let connection = Connection::open(&settings)?;
  run_add_watchers(&connection, &request)?;
  connection.close();
  Ok(())
}

pub(crate) fn handle_remove_watcher_command(target: &TargetArgs, args: RemoveWatcherArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let query = settings.query()?;

  let connection = Connection::open(&settings)?;
  run_remove_watcher(&connection, &query, args.person.trim())?;
  connection.close();
  Ok(())
}

pub(crate) fn run_add_watchers(connection: &Connection, request: &AddWatchersRequest) -> Result<()> {
  announce_query(&request.query);
  print_info(&format!(
    "Adding {} to issues involving {}",
    request.watchers.join(", "),
    request.person
  ));

  let live = LiveReport::start("Adding watchers");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(add_watchers_for_person(connection.tracker(), request, &mut observer));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}

pub(crate) fn run_remove_watcher(connection: &Connection, query: &str, person: &str) -> Result<()> {
  announce_query(query);
  print_info(&format!("Removing watcher {person}"));

  let live = LiveReport::start("Removing watcher");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(remove_watcher_everywhere(
    connection.tracker(),
    query,
    person,
    &mut observer,
  ));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}
