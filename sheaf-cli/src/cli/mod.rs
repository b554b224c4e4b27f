//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the sheaf tool: one
//! subcommand per bulk operation, the interactive menu, configuration, and
//! shell completion.

mod browse;
mod clone;
mod completion;
mod config;
mod export;
mod import;
mod menu;
mod sample;
mod watchers;

use anyhow::Result;
use chrono::NaiveDate;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use sheaf_core::output::ColorMode;

/// Top-level CLI command for the sheaf tool
#[derive(Parser)]
#[command(name = "sheaf")]
#[command(display_name = "🌾 Sheaf")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Bulk issue automation for Jira")]
#[command(
  long_about = "Sheaf automates bulk work on a Jira project.\n\n\
        It exports issues to a CSV file for offline editing and applies flagged rows back,\n\
        clones issues under a new title, and manages watcher lists across every issue\n\
        matched by a query."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightYellow.on_default().bold().underline())
    .usage(AnsiColor::Yellow.on_default().bold())
    .literal(AnsiColor::BrightYellow.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    global = true,
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    global = true,
    ignore_case = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  #[command(flatten)]
  pub target: TargetArgs,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Where to connect and which issues to work on.
///
/// Values given here override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
  /// Tracker base URL (e.g., https://jira.example.com/issue)
  #[arg(long, global = true)]
  pub host: Option<String>,

  /// Login name; prompted for when missing
  #[arg(long, short = 'u', global = true)]
  pub username: Option<String>,

  /// Project key the query is built for
  #[arg(long, short = 'p', global = true)]
  pub project: Option<String>,

  /// Summary keyword filter (repeatable, up to three)
  #[arg(long = "keyword", short = 'k', global = true)]
  pub keywords: Vec<String>,

  #[arg(
    long,
    global = true,
    long_help = "Raw query to use instead of the project and keyword filters.\n\
                 Clone appends its title filters to this query."
  )]
  pub query: Option<String>,
}

/// Subcommands for the sheaf tool
#[derive(Subcommand)]
pub enum Commands {
  /// Show the first issues of the query
  #[command(long_about = "Show the first 10 issues matched by the query, with their watchers.\n\n\
            Nothing is changed on the tracker. Use this to check a query before\n\
            running a bulk operation on it.")]
  #[command(alias = "ls")]
  Browse(browse::BrowseArgs),

  /// Create one issue from a template
  #[command(long_about = "Create one issue from the given field values and add a watcher to it.\n\n\
            Use this to check that your account can create issues in the project\n\
            and that the custom field and version values are accepted.")]
  CreateSample(sample::SampleArgs),

  /// Export every issue of the query to CSV
  #[command(long_about = "Write every issue matched by the query to the CSV exchange file.\n\n\
            The file has a header row and one row per issue. Its update column is blank;\n\
            put any value in it for the rows that `sheaf import` should apply.")]
  Export(export::ExportArgs),

  /// Apply flagged CSV rows to the tracker
  #[command(long_about = "Update one issue per CSV row whose update column is not blank.\n\n\
            Rows are applied in file order. Summary, type, priority, components, labels,\n\
            the custom project field, assignee, due date, and description are updated,\n\
            then the listed watchers are added. Columns marked with * are read-only.")]
  Import(import::ImportArgs),

  /// Clone issues under a new title
  #[command(long_about = "Create a copy of every issue whose summary contains the old title.\n\n\
            Each copy gets the old title replaced by the new one, the given due date, the\n\
            source's parent and watchers. Copies that already exist are skipped, so the\n\
            command can be re-run after an interruption.")]
  Clone(clone::CloneArgs),

  /// Add watchers to every issue a person is involved in
  #[command(long_about = "Add watchers to every issue of the query that a person is assigned to\n\
            or already watches.")]
  AddWatchers(watchers::AddWatchersArgs),

  /// Remove a watcher from every issue of the query
  RemoveWatcher(watchers::RemoveWatcherArgs),

  /// Interactive menu
  #[command(long_about = "Log in once and pick operations from a menu until you quit.\n\n\
            Every parameter is prompted for, with the configuration file values as defaults.")]
  Menu,

  /// Configuration management
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Generate shell completions
  #[command(long_about = "Generates shell completion scripts for sheaf commands.\n\n\
            This command generates completion scripts that provide tab completion for sheaf\n\
            commands and options in your shell. Supported shells include bash, zsh, and fish.")]
  Completion(completion::CompletionArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  match cli.colors {
    ColorMode::Always | ColorMode::Yes => owo_colors::set_override(true),
    ColorMode::Never | ColorMode::No => owo_colors::set_override(false),
    ColorMode::Auto => {}
  }

  let target = cli.target;
  match cli.command {
    Commands::Browse(args) => browse::handle_browse_command(&target, args),
    Commands::CreateSample(args) => sample::handle_sample_command(&target, args),
    Commands::Export(args) => export::handle_export_command(&target, args),
    Commands::Import(args) => import::handle_import_command(&target, args),
    Commands::Clone(args) => clone::handle_clone_command(&target, args),
    Commands::AddWatchers(args) => watchers::handle_add_watchers_command(&target, args),
    Commands::RemoveWatcher(args) => watchers::handle_remove_watcher_command(&target, args),
    Commands::Menu => menu::handle_menu_command(&target),
    Commands::Config(args) => config::handle_config_command(&target, args),
    Commands::Completion(args) => completion::handle_completion_command(args),
  }
}

/// Accept a due date only in the `YYYY-MM-DD` form the tracker stores
pub(crate) fn parse_due_date(value: &str) -> Result<String, String> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
    .map(|date| date.format("%Y-%m-%d").to_string())
    .map_err(|err| format!("expected a date like 2023-08-31: {err}"))
}
