//! # Export Command
//!
//! Writes every issue of the query to the CSV exchange file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use sheaf_core::output::{format_path, print_info};
use sheaf_ops::{ItemReport, bulk_export};

use super::TargetArgs;
use crate::context::{Connection, Settings, announce_query};
use crate::render::{LiveReport, print_report_summary};

/// Command for exporting issues to CSV
#[derive(Args)]
pub struct ExportArgs {
  #[arg(
    long,
    short = 'f',
    long_help = "CSV file to write (overwritten).\n\
                 Defaults to '[PROJECT][keyword] issues.csv' in the configured CSV directory."
  )]
  pub file: Option<PathBuf>,
}

pub(crate) fn handle_export_command(target: &TargetArgs, args: ExportArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let query = settings.query()?;
  let path = settings.csv_path(args.file.as_deref())?;

  let connection = Connection::open(&settings)?;
  run_export(&connection, &settings, &query, &path)?;
  connection.close();
  Ok(())
}

pub(crate) fn run_export(connection: &Connection, settings: &Settings, query: &str, path: &Path) -> Result<()> {
  let store = settings.csv_store(Some(path))?;
  announce_query(query);
  print_info(&format!(
    "Writing {} ({})",
    format_path(&store.path().display().to_string()),
    store.encoding().name()
  ));

  let live = LiveReport::start("Exporting issues");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(bulk_export(
    connection.tracker(),
    query,
    &store,
    settings.custom_field_id(),
    &mut observer,
  ));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}
