//! # Import Command
//!
//! Applies the flagged rows of the CSV exchange file to the tracker.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;
use dialoguer::Confirm;
use sheaf_core::output::{format_path, print_info, print_warning};
use sheaf_core::prompts::sheaf_theme;
use sheaf_ops::{ItemReport, bulk_import};

use super::TargetArgs;
use crate::context::{Connection, Settings};
use crate::render::{LiveReport, print_report_summary};

/// Command for updating issues from CSV
#[derive(Args)]
pub struct ImportArgs {
  /// CSV file to read; defaults to the file `sheaf export` writes
  #[arg(long, short = 'f')]
  pub file: Option<PathBuf>,

  /// Apply without asking for confirmation
  #[arg(long, short = 'y')]
  pub yes: bool,
}

pub(crate) fn handle_import_command(target: &TargetArgs, args: ImportArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let path = settings.csv_path(args.file.as_deref())?;
  if !path.exists() {
    bail!("{} does not exist; run `sheaf export` first", path.display());
  }

  if !args.yes && !confirm_import(&path)? {
    print_warning("Import cancelled");
    return Ok(());
  }

  let connection = Connection::open(&settings)?;
  run_import(&connection, &settings, &path)?;
  connection.close();
  Ok(())
}

/// Ask before changing issues; the default answer is no
pub(crate) fn confirm_import(path: &Path) -> Result<bool> {
  let confirmed = Confirm::with_theme(&sheaf_theme())
    .with_prompt(format!("Update every flagged issue in {}?", path.display()))
    .default(false)
    .interact()?;
  Ok(confirmed)
}

pub(crate) fn run_import(connection: &Connection, settings: &Settings, path: &Path) -> Result<()> {
  let store = settings.csv_store(Some(path))?;
  print_info(&format!(
    "Reading {} ({})",
    format_path(&store.path().display().to_string()),
    store.encoding().name()
  ));

  let live = LiveReport::start("Updating issues");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(bulk_import(
    connection.tracker(),
    &store,
    settings.custom_field_id(),
    &mut observer,
  ));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}
