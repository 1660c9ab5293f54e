//! CLI module for cutsel
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Choose, preview and check cut lists for recorded videos
#[derive(Parser, Debug)]
#[command(name = "cutsel")]
#[command(about = "Choose, preview and check cut lists for recorded videos")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (default: <config dir>/cutsel/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose cut lists for videos, export them and check the results
    Select(args::SelectArgs),
    /// Preview a cut list file against its video
    Preview(args::PreviewArgs),
    /// Evaluate an index range expression
    Range(args::RangeArgs),
}
