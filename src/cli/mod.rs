//! CLI module for trakr - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for tracker management,
//! history editing, backup, and TUI launch.

pub mod commands;

pub use commands::{Cli, Commands};
