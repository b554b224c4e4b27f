//! Isolated XDG config home for testing
//!
//! Binaries under test receive the guard's directories through
//! [`XdgHomeGuard::envs`] instead of the process environment being mutated,
//! so tests can run in parallel.

use std::fs;
use std::path::PathBuf;

use sheaf_core::config::SheafConfig;
use tempfile::TempDir;

/// A per-test temporary XDG config home
pub struct XdgHomeGuard {
  /// Root of the temporary directories
  pub temp_dir: TempDir,
}

impl Default for XdgHomeGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl XdgHomeGuard {
  /// XDG environment variable names
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";
  pub const HOME: &'static str = "HOME";

  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    fs::create_dir_all(temp_dir.path().join("config")).expect("Failed to create config directory");
    fs::create_dir_all(temp_dir.path().join("home")).expect("Failed to create home directory");
    Self { temp_dir }
  }

  /// The directory to use as `XDG_CONFIG_HOME`
  pub fn config_home(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }

  /// Where sheaf looks for its config file under this home
  pub fn config_path(&self) -> PathBuf {
    self.config_home().join("sheaf").join("config.toml")
  }

  /// A scratch directory for CSV files and other outputs
  pub fn work_dir(&self) -> PathBuf {
    self.temp_dir.path().join("home")
  }

  /// Write a config file for the binary under test to pick up
  pub fn write_config(&self, config: &SheafConfig) -> anyhow::Result<()> {
    config.save_to(&self.config_path())
  }

  /// Environment overrides for a spawned process
  pub fn envs(&self) -> Vec<(&'static str, PathBuf)> {
    vec![(Self::XDG_CONFIG_HOME, self.config_home()), (Self::HOME, self.work_dir())]
  }
}
