//! # Sheaf Operations
//!
//! The bulk workflows shared by every front end. Each operation makes a single
//! pass over a result set fetched once at its start, hands every item to an
//! observer as soon as it is processed, and returns the collected
//! [`OperationReport`].
//!
//! Operations are written against [`sheaf_jira::Tracker`]. Authentication and
//! network failures abort an operation; any other failure is reported for its
//! item and processing continues.

mod browse;
mod clone;
mod convert;
mod export;
mod import;
mod pacer;
mod report;
mod sample;
mod watchers;

pub use browse::{BrowseOutput, IssueDetails, SAMPLE_SIZE, sample_browse};
pub use clone::{CloneRequest, clone_and_rename};
pub use convert::{fields_from_row, row_from_issue};
pub use export::bulk_export;
pub use import::bulk_import;
pub use pacer::Pacer;
pub use report::{ItemReport, Operation, OperationReport, Outcome};
pub use sample::{SampleTemplate, sample_create};
pub use watchers::{AddWatchersRequest, add_watchers_for_person, remove_watcher_everywhere};
