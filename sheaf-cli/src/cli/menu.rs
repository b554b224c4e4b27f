//! # Interactive Menu
//!
//! Logs in once, asks for the project and keyword filters, then runs
//! operations picked from a menu until the operator quits.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use sheaf_core::jql::MAX_KEYWORDS;
use sheaf_core::output::{format_query, print_error, print_header, print_info, print_warning};
use sheaf_core::prompts::{prompt_optional, prompt_seconds, prompt_text, sheaf_theme};
use sheaf_core::{QueryBuilder, normalize_login};
use sheaf_jira::is_auth_failure;
use sheaf_ops::{AddWatchersRequest, CloneRequest, SampleTemplate};

use super::{TargetArgs, parse_due_date};
use super::{browse, clone, export, import, sample, watchers};
use crate::context::{Connection, Settings};

/// One entry of the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
  Browse,
  CreateSample,
  Export,
  Import,
  Clone,
  AddWatchers,
  RemoveWatcher,
  Quit,
}

impl MenuAction {
  const ALL: [MenuAction; 8] = [
    Self::Browse,
    Self::CreateSample,
    Self::Export,
    Self::Import,
    Self::Clone,
    Self::AddWatchers,
    Self::RemoveWatcher,
    Self::Quit,
  ];

  fn group(self) -> &'static str {
    match self {
      Self::Browse | Self::CreateSample => "Sample",
      Self::Export | Self::Import => "Bulk management",
      Self::Clone | Self::AddWatchers | Self::RemoveWatcher => "Custom",
      Self::Quit => "",
    }
  }

  fn description(self) -> &'static str {
    match self {
      Self::Browse => "Browse the first 10 issues",
      Self::CreateSample => "Create a sample issue",
      Self::Export => "Export issues to CSV",
      Self::Import => "Update issues from CSV",
      Self::Clone => "Clone issues and rename them",
      Self::AddWatchers => "Add watchers to a person's issues",
      Self::RemoveWatcher => "Remove a watcher from all issues",
      Self::Quit => "Quit",
    }
  }
}

impl fmt::Display for MenuAction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:<16} {}", self.group(), self.description())
  }
}

pub(crate) fn handle_menu_command(target: &TargetArgs) -> Result<()> {
  let settings = Settings::load(target)?;
  let connection = Connection::open(&settings)?;
  let settings = prompt_scope(settings)?;

  loop {
    let action = pick_action()?;
    if action == MenuAction::Quit {
      break;
    }

    print_header(action.description());
    if let Err(err) = run_action(&connection, &settings, action) {
      if is_auth_failure(&err) {
        connection.close();
        return Err(err);
      }
      print_error(&format!("{err:#}"));
    }
  }

  connection.close();
  Ok(())
}

/// Ask for the project and up to three keywords, defaulting to the settings
fn prompt_scope(settings: Settings) -> Result<Settings> {
  let project = prompt_text("Project key", settings.project())?;

  let defaults = settings.keywords().to_vec();
  let mut keywords = Vec::new();
  for index in 0..MAX_KEYWORDS {
    let default = defaults.get(index).map(String::as_str);
    if let Some(keyword) = prompt_optional(&format!("Keyword {} (optional)", index + 1), default)? {
      keywords.push(keyword);
    }
  }

  let query = QueryBuilder::new(&project).keywords(&keywords).build();
  print_info(&format!("Query: {}", format_query(&query)));
  Ok(settings.with_scope(&project, keywords))
}

fn pick_action() -> Result<MenuAction> {
  let index = Select::with_theme(&sheaf_theme())
    .with_prompt("Select an action")
    .items(MenuAction::ALL)
    .default(0)
    .interact()
    .context("Failed to read the menu selection")?;
  Ok(MenuAction::ALL.get(index).copied().unwrap_or(MenuAction::Quit))
}

fn run_action(connection: &Connection, settings: &Settings, action: MenuAction) -> Result<()> {
  let query = settings.query()?;
  match action {
    MenuAction::Browse => {
      let details = Confirm::with_theme(&sheaf_theme())
        .with_prompt("Show every field?")
        .default(false)
        .interact()?;
      browse::run_browse(connection, settings, &query, details)
    }
    MenuAction::CreateSample => {
      let template = prompt_sample_template(settings)?;
      let watcher = prompt_optional("Watcher to add (optional)", None)?;
      sample::run_sample(connection, settings, &template, watcher.as_deref())
    }
    MenuAction::Export => {
      let path = settings.csv_path(None)?;
      export::run_export(connection, settings, &query, &path)
    }
    MenuAction::Import => {
      let path = settings.csv_path(None)?;
      if !path.exists() {
        print_warning(&format!("{} does not exist; export first", path.display()));
        return Ok(());
      }
      if import::confirm_import(&path)? {
        import::run_import(connection, settings, &path)
      } else {
        print_warning("Import cancelled");
        Ok(())
      }
    }
    MenuAction::Clone => {
      let request = CloneRequest {
        query,
        old_title: prompt_text("Old title (e.g. Analysis)", None)?,
        new_title: prompt_text("New title (e.g. SyRS)", None)?,
        due_date: prompt_due_date()?,
        delay: Duration::from_secs(prompt_seconds(
          "Delay after each creation (seconds)",
          settings.clone_delay().as_secs(),
        )?),
        custom_field_id: settings.custom_field_id().to_string(),
      };
      clone::run_clone(connection, &request)
    }
    MenuAction::AddWatchers => {
      let person = normalize_login(&prompt_text("Assignee or watcher to look for (login)", None)?);
      let count: usize = Input::with_theme(&sheaf_theme())
        .with_prompt("Number of watchers to add")
        .default(1)
        .interact_text()?;
      let mut names = Vec::with_capacity(count);
      for index in 0..count {
        names.push(prompt_text(&format!("Watcher {} (login)", index + 1), None)?);
      }
      let request = AddWatchersRequest {
        query,
        person,
        watchers: names,
        delay: Duration::from_secs(prompt_seconds(
          "Delay after each issue (seconds)",
          settings.add_watchers_delay().as_secs(),
        )?),
      };
      watchers::run_add_watchers(connection, &request)
    }
    MenuAction::RemoveWatcher => {
      let person = normalize_login(&prompt_text("Watcher to remove (login)", None)?);
      watchers::run_remove_watcher(connection, &query, &person)
    }
    MenuAction::Quit => Ok(()),
  }
}

fn prompt_due_date() -> Result<String> {
  let value: String = Input::with_theme(&sheaf_theme())
    .with_prompt("Due date (e.g. 2023-08-31)")
    .validate_with(|input: &String| parse_due_date(input).map(|_| ()))
    .interact_text()
    .context("Failed to read the due date")?;
  parse_due_date(&value).map_err(anyhow::Error::msg)
}

fn prompt_list(prompt: &str) -> Result<Vec<String>> {
  Ok(
    prompt_optional(prompt, None)?
      .map(|value| {
        value
          .split(',')
          .map(str::trim)
          .filter(|item| !item.is_empty())
          .map(str::to_string)
          .collect()
      })
      .unwrap_or_default(),
  )
}

fn prompt_sample_template(settings: &Settings) -> Result<SampleTemplate> {
  let mut template = SampleTemplate::for_project(settings.project().unwrap_or_default());
  template.summary = prompt_text("Summary", Some(template.summary.as_str()))?;
  template.issue_type = prompt_text("Issue type", Some(template.issue_type.as_str()))?;
  template.priority = prompt_text("Priority", Some(template.priority.as_str()))?;
  template.components = prompt_list("Components, comma separated (optional)")?;
  template.labels = prompt_list("Labels, comma separated (optional)")?;
  template.custom_value = prompt_optional(
    &format!("{} (optional)", settings.config().custom_field.label),
    None,
  )?
  .unwrap_or_default();
  template.assignee = prompt_optional("Assignee login (optional)", None)?.unwrap_or_default();
  if Confirm::with_theme(&sheaf_theme())
    .with_prompt("Set a due date?")
    .default(false)
    .interact()?
  {
    template.due_date = prompt_due_date()?;
  }
  template.parent = prompt_optional("Parent issue key, required for sub-tasks (optional)", None)?;
  Ok(template)
}
