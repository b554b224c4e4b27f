//! # Sheaf Core Library
//!
//! Shared building blocks for the sheaf workspace: configuration loading, the
//! CSV issue store with its list-literal cell format, tracker name and title
//! rules, query construction, and terminal output helpers.

pub mod config;
pub mod csv_store;
pub mod jql;
pub mod names;
pub mod output;
pub mod prompts;
pub mod titles;
pub mod url;

pub use config::{ConfigDirs, SheafConfig, get_config_dirs};
pub use csv_store::{CsvError, CsvIssueStore, CsvRow, IssueRow};
pub use jql::QueryBuilder;
pub use names::normalize_login;
pub use output::{ColorMode, print_error, print_header, print_info, print_success, print_warning};
pub use titles::is_same_summary;
