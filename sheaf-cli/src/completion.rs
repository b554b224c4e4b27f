//! # Shell Completion
//!
//! Generates shell completion scripts so sheaf subcommands and flags can be
//! tab-completed.

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use sheaf_core::output::print_error;

use crate::cli::Cli;

/// Parse a shell name accepted by the completion command
pub fn parse_shell(shell_str: &str) -> Result<Shell> {
  match shell_str.to_lowercase().as_str() {
    "bash" => Ok(Shell::Bash),
    "zsh" => Ok(Shell::Zsh),
    "fish" => Ok(Shell::Fish),
    _ => {
      print_error(&format!("Unsupported shell: {shell_str}"));
      println!("Supported shells: bash, zsh, fish");
      Err(anyhow::anyhow!("Unsupported shell: {}", shell_str))
    }
  }
}

/// Generate shell completions for the specified shell
pub fn generate_completions(shell: Shell) -> Result<()> {
  let mut cmd = Cli::command();
  let app_name = cmd.get_name().to_string();

  generate(shell, &mut cmd, app_name, &mut io::stdout());

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_shell() {
    assert_eq!(parse_shell("Bash").unwrap(), Shell::Bash);
    assert_eq!(parse_shell("zsh").unwrap(), Shell::Zsh);
    assert!(parse_shell("tcsh").is_err());
  }

  #[test]
  fn test_generate_completions_succeeds() {
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
      let result = generate_completions(shell);
      assert!(result.is_ok(), "Failed to generate completions for {shell:?}");
    }
  }
}
