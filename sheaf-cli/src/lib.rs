//! # Sheaf CLI
//!
//! Command-line and interactive front ends over the sheaf operation set.

pub mod cli;
mod completion;
mod context;
mod render;
