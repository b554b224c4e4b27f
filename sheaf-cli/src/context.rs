//! # Command Context
//!
//! Merges the configuration file with command-line flags and opens the
//! logged-in tracker connection every remote command runs on.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use sheaf_core::config::SheafConfig;
use sheaf_core::output::{format_query, print_info, print_success};
use sheaf_core::prompts::{prompt_password, prompt_text};
use sheaf_core::{CsvIssueStore, QueryBuilder, get_config_dirs};
use sheaf_jira::{JiraClient, Session, is_auth_failure};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::TargetArgs;

/// Effective settings: flags first, then the configuration file
#[derive(Debug, Clone)]
pub struct Settings {
  config: SheafConfig,
  target: TargetArgs,
}

impl Settings {
  pub fn new(config: SheafConfig, target: TargetArgs) -> Self {
    Self { config, target }
  }

  /// Load the configuration file and apply the flags on top of it
  pub fn load(target: &TargetArgs) -> Result<Self> {
    let config_dirs = get_config_dirs()?;
    let config = config_dirs.load_config()?;
    debug!("Loaded configuration from {}", config_dirs.config_path().display());
    Ok(Self::new(config, target.clone()))
  }

  /// Replace the project and keywords, dropping any raw query
  pub fn with_scope(mut self, project: &str, keywords: Vec<String>) -> Self {
    self.target.project = Some(project.trim().to_string());
    self.target.keywords = keywords;
    self.target.query = None;
    self
  }

  pub fn config(&self) -> &SheafConfig {
    &self.config
  }

  pub fn host(&self) -> Option<&str> {
    self.target.host.as_deref().or(self.config.host.as_deref())
  }

  pub fn username(&self) -> Option<&str> {
    self.target.username.as_deref()
  }

  pub fn project(&self) -> Option<&str> {
    self
      .target
      .project
      .as_deref()
      .or(self.config.project.as_deref())
      .map(str::trim)
      .filter(|p| !p.is_empty())
  }

  /// Keyword filters; flags replace the configured list entirely
  pub fn keywords(&self) -> &[String] {
    if self.target.keywords.is_empty() {
      &self.config.keywords
    } else {
      &self.target.keywords
    }
  }

  /// The raw query when one was given, otherwise the project and keyword query
  pub fn query(&self) -> Result<String> {
    if let Some(query) = self.target.query.as_deref().filter(|q| !q.trim().is_empty()) {
      return Ok(query.trim().to_string());
    }

    let Some(project) = self.project() else {
      bail!("No project given: pass --project or --query, or set `project` with `sheaf config set`");
    };
    Ok(QueryBuilder::new(project).keywords(self.keywords()).build())
  }

  pub fn custom_field_id(&self) -> &str {
    &self.config.custom_field.id
  }

  pub fn clone_delay(&self) -> Duration {
    Duration::from_secs(self.config.delays.clone_seconds)
  }

  pub fn add_watchers_delay(&self) -> Duration {
    Duration::from_secs(self.config.delays.add_watchers_seconds)
  }

  /// Path of the CSV exchange file, named after the project and first keyword
  /// unless a file is given
  pub fn csv_path(&self, file: Option<&Path>) -> Result<PathBuf> {
    if let Some(file) = file {
      return Ok(file.to_path_buf());
    }
    match self.project() {
      Some(project) => Ok(self.config.csv_path(project, self.keywords())),
      None => bail!("No CSV file given: pass --file or --project"),
    }
  }

  /// Open the CSV exchange file with the configured encoding and header label
  pub fn csv_store(&self, file: Option<&Path>) -> Result<CsvIssueStore> {
    let path = self.csv_path(file)?;
    CsvIssueStore::new(&path, &self.config.csv.encoding, &self.config.custom_field.label)
      .with_context(|| format!("Failed to open {}", path.display()))
  }
}

/// A logged-in session and the runtime its requests run on.
///
/// Operations are driven one at a time with [`Connection::run`].
pub struct Connection {
  runtime: Runtime,
  session: Session,
}

impl Connection {
  /// Log in, prompting for whatever the settings do not provide.
  ///
  /// The password is always prompted for. An authentication failure ends the
  /// command with a request to re-check the credentials.
  pub fn open(settings: &Settings) -> Result<Self> {
    let runtime = Runtime::new().context("Failed to create async runtime")?;

    let host = match settings.host() {
      Some(host) => host.to_string(),
      None => prompt_text("Tracker URL", None)?,
    };
    let username = match settings.username() {
      Some(username) => username.to_string(),
      None => prompt_text("ID", None)?,
    };
    let password = prompt_password("Password")?;

    let session = match runtime.block_on(Session::login(&host, &username, &password)) {
      Ok(session) => session,
      Err(err) if is_auth_failure(&err) => {
        bail!("Login to {host} as {username} was rejected. Please check your ID or password")
      }
      Err(err) => return Err(err),
    };

    print_success(&format!("Logged in to {} as {}", session.client().base_url(), session.user()));
    Ok(Self { runtime, session })
  }

  pub fn tracker(&self) -> &JiraClient {
    self.session.client()
  }

  /// Drive one future to completion on the connection's runtime
  pub fn run<F: Future>(&self, future: F) -> F::Output {
    self.runtime.block_on(future)
  }

  pub fn close(self) {
    self.session.logout();
  }
}

/// Announce the query an operation is about to run
pub fn announce_query(query: &str) {
  print_info(&format!("Query: {}", format_query(query)));
}
