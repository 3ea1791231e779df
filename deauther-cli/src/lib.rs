//! CLI interface for deauther-rs
//!
//! This crate provides the command-line interface for deauther-rs,
//! including argument parsing and help text.

pub mod args;

pub use args::{Cli, Commands};
