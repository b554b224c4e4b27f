//! # Clone Command
//!
//! Creates a renamed copy of every issue whose summary contains a title.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use sheaf_core::output::print_info;
use sheaf_ops::{CloneRequest, ItemReport, clone_and_rename};

use super::{TargetArgs, parse_due_date};
use crate::context::{Connection, Settings, announce_query};
use crate::render::{LiveReport, print_report_summary};

/// Command for cloning and renaming issues
#[derive(Args)]
pub struct CloneArgs {
  /// Title fragment to look for in source summaries
  #[arg(long, required = true)]
  pub old_title: String,

  /// Title fragment the copies get instead
  #[arg(long, required = true)]
  pub new_title: String,

  /// Due date of every copy (YYYY-MM-DD)
  #[arg(long, required = true, value_parser = parse_due_date)]
  pub due_date: String,

  /// Seconds to wait after each created issue (default from config: 120)
  #[arg(long)]
  pub delay: Option<u64>,
}

impl CloneArgs {
  pub fn request(&self, settings: &Settings, query: String) -> CloneRequest {
    CloneRequest {
      query,
      old_title: self.old_title.trim().to_string(),
      new_title: self.new_title.trim().to_string(),
      due_date: self.due_date.clone(),
      delay: self.delay.map(Duration::from_secs).unwrap_or_else(|| settings.clone_delay()),
      custom_field_id: settings.custom_field_id().to_string(),
    }
  }
}

pub(crate) fn handle_clone_command(target: &TargetArgs, args: CloneArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let request = args.request(&settings, settings.query()?);

  let connection = Connection::open(&settings)?;
  run_clone(&connection, &request)?;
  connection.close();
  Ok(())
}

pub(crate) fn run_clone(connection: &Connection, request: &CloneRequest) -> Result<()> {
  announce_query(&request.query);
  print_info(&format!(
    "Cloning '{}' as '{}', due {}, {}s between creations",
    request.old_title,
    request.new_title,
    request.due_date,
    request.delay.as_secs()
  ));

  let live = LiveReport::start("Cloning issues");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(clone_and_rename(connection.tracker(), request, &mut observer));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use sheaf_core::SheafConfig;

  use super::*;

  fn settings() -> Settings {
    Settings::new(SheafConfig::default(), TargetArgs::default())
  }

  fn args(delay: Option<u64>) -> CloneArgs {
    CloneArgs {
      old_title: " Analysis ".to_string(),
      new_title: "SyRS".to_string(),
      due_date: "2023-08-31".to_string(),
      delay,
    }
  }

  #[test]
  fn test_request_uses_configured_delay() {
    let request = args(None).request(&settings(), "project in (PROJ)".to_string());

    assert_eq!(request.old_title, "Analysis");
    assert_eq!(request.delay, Duration::from_secs(120));
    assert_eq!(request.custom_field_id, "customfield_43801");
  }

  #[test]
  fn test_delay_flag_overrides_config() {
    let request = args(Some(0)).request(&settings(), "project in (PROJ)".to_string());
    assert_eq!(request.delay, Duration::ZERO);
  }
}
