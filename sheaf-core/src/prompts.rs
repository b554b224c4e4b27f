//! # Prompts Module
//!
//! Dialoguer theme and small prompt helpers shared by the interactive
//! front-end and the commands that ask for a password.

use anyhow::{Context, Result};
use console::Style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

/// Returns the dialoguer theme used by every sheaf prompt.
///
/// Cyan bold prompt text, a green `❯` on the active item.
pub fn sheaf_theme() -> ColorfulTheme {
  ColorfulTheme {
    prompt_style: Style::new().cyan().bold(),
    active_item_prefix: Style::new().green().apply_to("❯ ".to_string()),
    active_item_style: Style::new().green(),
    ..ColorfulTheme::default()
  }
}

/// Ask for a required line of text, optionally pre-filled
pub fn prompt_text(prompt: &str, default: Option<&str>) -> Result<String> {
  let theme = sheaf_theme();
  let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);
  if let Some(default) = default {
    input = input.default(default.to_string());
  }
  input.interact_text().with_context(|| format!("Failed to read '{prompt}'"))
}

/// Ask for a line of text that may be left empty
pub fn prompt_optional(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
  let theme = sheaf_theme();
  let mut input = Input::<String>::with_theme(&theme)
    .with_prompt(prompt)
    .allow_empty(true);
  if let Some(default) = default {
    input = input.default(default.to_string());
  }
  let value = input
    .interact_text()
    .with_context(|| format!("Failed to read '{prompt}'"))?;
  let value = value.trim().to_string();
  Ok((!value.is_empty()).then_some(value))
}

/// Ask for a number of seconds, e.g. a courtesy delay
pub fn prompt_seconds(prompt: &str, default: u64) -> Result<u64> {
  let theme = sheaf_theme();
  Input::<u64>::with_theme(&theme)
    .with_prompt(prompt)
    .default(default)
    .interact_text()
    .with_context(|| format!("Failed to read '{prompt}'"))
}

/// Ask for a password without echoing it
pub fn prompt_password(prompt: &str) -> Result<String> {
  let theme = sheaf_theme();
  Password::with_theme(&theme)
    .with_prompt(prompt)
    .interact()
    .context("Failed to read password")
}
