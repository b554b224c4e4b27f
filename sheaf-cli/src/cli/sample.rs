//! # Create Sample Command
//!
//! Creates one issue from a template to check that the account and field
//! values are accepted before running a bulk operation.

use anyhow::{Result, bail};
use clap::Args;
use sheaf_ops::{ItemReport, SampleTemplate, sample_create};

use super::{TargetArgs, parse_due_date};
use crate::context::{Connection, Settings};
use crate::render::{LiveReport, print_report_summary};

/// Command for creating a sample issue
#[derive(Args, Debug, Clone, Default)]
pub struct SampleArgs {
  /// Issue summary
  #[arg(long)]
  pub summary: Option<String>,

  /// Issue type name (default: Task)
  #[arg(long = "type")]
  pub issue_type: Option<String>,

  /// Priority name (default: P2)
  #[arg(long)]
  pub priority: Option<String>,

  /// Component name (repeatable)
  #[arg(long = "component")]
  pub components: Vec<String>,

  /// Label (repeatable)
  #[arg(long = "label")]
  pub labels: Vec<String>,

  /// Value of the custom project field
  #[arg(long)]
  pub custom_value: Option<String>,

  /// Assignee login or display name
  #[arg(long)]
  pub assignee: Option<String>,

  /// Due date (YYYY-MM-DD)
  #[arg(long, value_parser = parse_due_date)]
  pub due_date: Option<String>,

  #[arg(long)]
  pub description: Option<String>,

  /// Affected version (repeatable)
  #[arg(long = "affects-version")]
  pub versions: Vec<String>,

  /// Fix version (repeatable)
  #[arg(long = "fix-version")]
  pub fix_versions: Vec<String>,

  /// Parent issue key, required for sub-tasks
  #[arg(long)]
  pub parent: Option<String>,

  /// Person to add as a watcher after creation
  #[arg(long)]
  pub watcher: Option<String>,
}

impl SampleArgs {
  /// Fill a project template with the given values
  pub fn template(&self, project: &str) -> SampleTemplate {
    let mut template = SampleTemplate::for_project(project);
    let set = |slot: &mut String, value: &Option<String>| {
      if let Some(value) = value {
        *slot = value.trim().to_string();
      }
    };

    set(&mut template.summary, &self.summary);
    set(&mut template.issue_type, &self.issue_type);
    set(&mut template.priority, &self.priority);
    set(&mut template.custom_value, &self.custom_value);
    set(&mut template.assignee, &self.assignee);
    set(&mut template.due_date, &self.due_date);
    set(&mut template.description, &self.description);
    template.components = self.components.clone();
    template.labels = self.labels.clone();
    template.versions = self.versions.clone();
    template.fix_versions = self.fix_versions.clone();
    template.parent = self.parent.clone();
    template
  }
}

pub(crate) fn handle_sample_command(target: &TargetArgs, args: SampleArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let Some(project) = settings.project() else {
    bail!("No project given: pass --project or set `project` with `sheaf config set`");
  };
  let template = args.template(project);

  let connection = Connection::open(&settings)?;
  run_sample(&connection, &settings, &template, args.watcher.as_deref())?;
  connection.close();
  Ok(())
}

pub(crate) fn run_sample(
  connection: &Connection,
  settings: &Settings,
  template: &SampleTemplate,
  watcher: Option<&str>,
) -> Result<()> {
  let live = LiveReport::start("Creating sample issue");
  let mut observer = |item: &ItemReport| live.observe(item);
  let result = connection.run(sample_create(
    connection.tracker(),
    template,
    watcher,
    settings.custom_field_id(),
    &mut observer,
  ));
  live.finish();
  print_report_summary(&result?);
  Ok(())
}
