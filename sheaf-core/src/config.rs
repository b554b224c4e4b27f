//! # Configuration Management
//!
//! Handles the sheaf configuration file and its location under the platform
//! configuration directory. Only non-secret settings live here: the tracker
//! host, default project and keywords, the custom project field, CSV settings,
//! and courtesy delays. Credentials are always entered interactively.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default wire id of the custom project field
pub const DEFAULT_CUSTOM_FIELD_ID: &str = "customfield_43801";

/// Default CSV header label for the custom project field
pub const DEFAULT_CUSTOM_FIELD_LABEL: &str = "HMC프로젝트";

/// Default CSV encoding label (WHATWG), kept for spreadsheets that expect it
pub const DEFAULT_CSV_ENCODING: &str = "euc-kr";

/// Represents the configuration directories for sheaf
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "sheaf").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }

  /// Load the configuration file or return defaults when it does not exist
  pub fn load_config(&self) -> Result<SheafConfig> {
    SheafConfig::load_from(&self.config_path())
  }

  /// Save the configuration file, creating the directory if needed
  pub fn save_config(&self, config: &SheafConfig) -> Result<()> {
    config.save_to(&self.config_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Settings for the custom project field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CustomFieldConfig {
  /// Wire id, e.g. `customfield_43801`
  pub id: String,
  /// Column header used in CSV files
  pub label: String,
}

impl Default for CustomFieldConfig {
  fn default() -> Self {
    Self {
      id: DEFAULT_CUSTOM_FIELD_ID.to_string(),
      label: DEFAULT_CUSTOM_FIELD_LABEL.to_string(),
    }
  }
}

/// Settings for the CSV issue store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsvConfig {
  /// WHATWG encoding label used to read and write CSV files
  pub encoding: String,
  /// Directory holding CSV files; the current directory when unset
  pub directory: Option<PathBuf>,
}

impl Default for CsvConfig {
  fn default() -> Self {
    Self {
      encoding: DEFAULT_CSV_ENCODING.to_string(),
      directory: None,
    }
  }
}

/// Courtesy delays between remote mutations, in seconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DelayConfig {
  pub clone_seconds: u64,
  pub add_watchers_seconds: u64,
}

impl Default for DelayConfig {
  fn default() -> Self {
    Self {
      clone_seconds: 120,
      add_watchers_seconds: 30,
    }
  }
}

/// The sheaf configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SheafConfig {
  /// Tracker base URL (e.g. https://jira.example.com/issue)
  pub host: Option<String>,
  /// Default project key used by the query builder
  pub project: Option<String>,
  /// Default summary keywords (at most three are used)
  pub keywords: Vec<String>,
  pub custom_field: CustomFieldConfig,
  pub csv: CsvConfig,
  pub delays: DelayConfig,
}

impl SheafConfig {
  /// Load configuration from a path, returning defaults if it is missing
  pub fn load_from(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Save configuration to a path
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
  }

  /// File name of the CSV exchange file for a project and keyword set.
  ///
  /// `[PROJECT][keyword] issues.csv`, or `[PROJECT] issues.csv` when there
  /// are no keywords.
  pub fn csv_file_name(project: &str, keywords: &[String]) -> String {
    match keywords.iter().find(|k| !k.trim().is_empty()) {
      Some(keyword) => format!("[{project}][{}] issues.csv", keyword.trim()),
      None => format!("[{project}] issues.csv"),
    }
  }

  /// Full path of the CSV exchange file inside the configured directory
  pub fn csv_path(&self, project: &str, keywords: &[String]) -> PathBuf {
    let name = Self::csv_file_name(project, keywords);
    match &self.csv.directory {
      Some(dir) => dir.join(name),
      None => PathBuf::from(name),
    }
  }
}
