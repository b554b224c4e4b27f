//! # Config Command
//!
//! Shows and edits the sheaf configuration file. Only non-secret settings
//! are stored; passwords are always prompted for.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use sheaf_core::csv_store::TextEncoding;
use sheaf_core::output::{format_path, print_header, print_info, print_success};
use sheaf_core::{SheafConfig, get_config_dirs};

use super::TargetArgs;

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Print the configuration file location and its values
  Show,

  /// Store settings in the configuration file
  #[command(long_about = "Store settings in the configuration file.\n\n\
            The global --host, --project and --keyword flags are saved as the defaults\n\
            used when they are not given on the command line.")]
  Set(SetArgs),
}

/// Settings that can be stored
#[derive(Args, Debug, Default)]
pub struct SetArgs {
  /// Wire id of the custom project field (e.g. customfield_43801)
  #[arg(long)]
  pub custom_field_id: Option<String>,

  /// CSV column header of the custom project field
  #[arg(long)]
  pub custom_field_label: Option<String>,

  /// Text encoding of CSV files (e.g. euc-kr, utf-8)
  #[arg(long)]
  pub encoding: Option<String>,

  /// Directory CSV files are written to and read from
  #[arg(long)]
  pub csv_dir: Option<PathBuf>,

  /// Seconds to wait after each cloned issue
  #[arg(long)]
  pub clone_delay: Option<u64>,

  /// Seconds to wait after each issue when adding watchers
  #[arg(long)]
  pub add_watchers_delay: Option<u64>,

  /// Forget the stored keywords; wins over --keyword
  #[arg(long)]
  pub clear_keywords: bool,
}

pub(crate) fn handle_config_command(target: &TargetArgs, args: ConfigArgs) -> Result<()> {
  let config_dirs = get_config_dirs()?;
  match args.subcommand {
    ConfigSubcommands::Show => {
      let config = config_dirs.load_config()?;
      print_header("Configuration");
      println!(
        "  File: {}",
        format_path(&config_dirs.config_path().display().to_string())
      );
      print_config(&config);
      Ok(())
    }
    ConfigSubcommands::Set(set) => {
      let mut config = config_dirs.load_config()?;
      apply(&mut config, target, set)?;
      config_dirs.save_config(&config)?;
      print_success(&format!(
        "Saved {}",
        format_path(&config_dirs.config_path().display().to_string())
      ));
      print_config(&config);
      Ok(())
    }
  }
}

/// Merge flag values into a configuration
pub(crate) fn apply(config: &mut SheafConfig, target: &TargetArgs, set: SetArgs) -> Result<()> {
  if let Some(host) = &target.host {
    config.host = Some(host.trim().to_string());
  }
  if let Some(project) = &target.project {
    config.project = Some(project.trim().to_string());
  }
  if set.clear_keywords {
    config.keywords.clear();
  } else if !target.keywords.is_empty() {
    config.keywords = target.keywords.clone();
  }

  if let Some(id) = set.custom_field_id {
    config.custom_field.id = id;
  }
  if let Some(label) = set.custom_field_label {
    config.custom_field.label = label;
  }
  if let Some(encoding) = set.encoding {
    TextEncoding::for_label(&encoding).with_context(|| format!("Cannot use '{encoding}' for CSV files"))?;
    config.csv.encoding = encoding;
  }
  if let Some(dir) = set.csv_dir {
    config.csv.directory = Some(dir);
  }
  if let Some(seconds) = set.clone_delay {
    config.delays.clone_seconds = seconds;
  }
  if let Some(seconds) = set.add_watchers_delay {
    config.delays.add_watchers_seconds = seconds;
  }
  Ok(())
}

fn print_config(config: &SheafConfig) {
  let unset = || "(not set)".to_string();
  println!("  Host: {}", config.host.clone().unwrap_or_else(unset));
  println!("  Project: {}", config.project.clone().unwrap_or_else(unset));
  if config.keywords.is_empty() {
    println!("  Keywords: {}", unset());
  } else {
    println!("  Keywords: {}", config.keywords.join(", "));
  }
  println!(
    "  Custom field: {} ({})",
    config.custom_field.id, config.custom_field.label
  );
  println!("  CSV encoding: {}", config.csv.encoding);
  match &config.csv.directory {
    Some(dir) => println!("  CSV directory: {}", format_path(&dir.display().to_string())),
    None => println!("  CSV directory: (current directory)"),
  }
  println!(
    "  Delays: clone {}s, add watchers {}s",
    config.delays.clone_seconds, config.delays.add_watchers_seconds
  );
  if config.host.is_none() {
    print_info("Set the tracker URL with `sheaf config set --host <URL>`");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_apply_global_flags_and_settings() {
    let mut config = SheafConfig::default();
    let target = TargetArgs {
      host: Some(" https://jira.example.com/issue ".to_string()),
      project: Some("PROJ".to_string()),
      keywords: vec!["ccIC24".to_string()],
      ..Default::default()
    };
    let set = SetArgs {
      encoding: Some("utf-8".to_string()),
      clone_delay: Some(0),
      ..Default::default()
    };
    apply(&mut config, &target, set).unwrap();

    assert_eq!(config.host.as_deref(), Some("https://jira.example.com/issue"));
    assert_eq!(config.project.as_deref(), Some("PROJ"));
    assert_eq!(config.keywords, ["ccIC24"]);
    assert_eq!(config.csv.encoding, "utf-8");
    assert_eq!(config.delays.clone_seconds, 0);
    assert_eq!(config.delays.add_watchers_seconds, 30);
  }

  #[test]
  fn test_apply_rejects_unknown_encoding() {
    let mut config = SheafConfig::default();
    let set = SetArgs {
      encoding: Some("klingon".to_string()),
      ..Default::default()
    };
    assert!(apply(&mut config, &TargetArgs::default(), set).is_err());
    assert_eq!(config.csv.encoding, "euc-kr");
  }

  #[test]
  fn test_clear_keywords() {
    let mut config = SheafConfig {
      keywords: vec!["old".to_string()],
      ..Default::default()
    };
    let set = SetArgs {
      clear_keywords: true,
      ..Default::default()
    };
    apply(&mut config, &TargetArgs::default(), set).unwrap();
    assert!(config.keywords.is_empty());
  }
}
