//! CLI tool for inspecting a governance deployment.
//!
//! Provides commands for:
//! - Resolving the root, ACL and gasless-voting handles
//! - Probing an arbitrary address for the gasless-voting interface
//! - Computing interface selectors

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
