// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_project_path;

/// Command-line arguments for `pyority`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pyority",
    version,
    about = "Print the start and end points of a project's tasks in dependency and pyority order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Default: `Pyority.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value_os_t = default_project_path())]
    pub project: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PYORITY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the tasks, but don't schedule them.
    #[arg(long)]
    pub dry_run: bool,

    /// Print total pyority and dependent count next to each point.
    #[arg(long)]
    pub details: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
