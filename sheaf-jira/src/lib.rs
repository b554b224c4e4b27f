//! # Jira API Client
//!
//! Provides Jira REST API integration for the bulk operations: searching,
//! reading, creating, and updating issues, managing watcher lists, and
//! resolving users. The [`Tracker`] trait is the seam the operation set is
//! written against; [`JiraClient`] is its HTTP implementation.

mod client;
mod consts;
mod endpoints;
mod error;
pub mod models;
mod session;
mod tracker;

pub use client::{JiraClient, create_jira_client};
pub use endpoints::users::pick_user;
pub use error::JiraError;
pub use models::{
  CreatedIssue, FieldBag, IssueRef, JiraAuth, JiraIssue, JiraIssueFields, JiraUser, NamedRef, ProjectRef,
  SearchResults,
};
pub use session::{Session, is_auth_failure};
pub use tracker::Tracker;
