//! # Browse Command
//!
//! Shows the first issues of the query without changing anything.

use anyhow::Result;
use clap::Args;
use sheaf_core::output::print_info;
use sheaf_ops::{ItemReport, sample_browse};

use super::TargetArgs;
use crate::context::{Connection, Settings, announce_query};
use crate::render::{LiveReport, browse_table, print_issue_details};

/// Command for browsing sample issues
#[derive(Args)]
pub struct BrowseArgs {
  /// Print every field of each issue instead of a table
  #[arg(long, short = 'd')]
  pub details: bool,
}

pub(crate) fn handle_browse_command(target: &TargetArgs, args: BrowseArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let query = settings.query()?;
  let connection = Connection::open(&settings)?;
  run_browse(&connection, &settings, &query, args.details)?;
  connection.close();
  Ok(())
}

pub(crate) fn run_browse(connection: &Connection, settings: &Settings, query: &str, details: bool) -> Result<()> {
  announce_query(query);

  let live = LiveReport::start("Fetching sample issues");
  // Item lines would repeat the table, so only the spinner is shown
  let mut observer = |_: &ItemReport| {};
  let result = connection.run(sample_browse(
    connection.tracker(),
    query,
    settings.custom_field_id(),
    &mut observer,
  ));
  live.finish();
  let output = result?;

  if output.issues.is_empty() {
    print_info("No issues match the query");
    return Ok(());
  }

  if details {
    for issue in &output.issues {
      print_issue_details(issue);
    }
  } else {
    println!("{}", browse_table(&output.issues));
  }
  for item in output.report.items.iter().filter(|i| !i.notes.is_empty()) {
    for note in &item.notes {
      print_info(&format!("{}: {}", item.key, note));
    }
  }
  Ok(())
}
