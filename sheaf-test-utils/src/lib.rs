//! Test utilities shared across the sheaf workspace
//!
//! This crate provides common testing infrastructure including:
//! - an in-memory tracker ([`FakeTracker`]) that records every call
//! - an isolated XDG config home ([`XdgHomeGuard`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod fake_tracker;

pub use env::XdgHomeGuard;
pub use fake_tracker::{FailureKind, FakeTracker, TrackerCall, TrackerOp, user};
