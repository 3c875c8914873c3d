// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `syncwatcher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "syncwatcher",
    version,
    about = "Run a script whenever files under a watched directory change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON, or TOML if it ends in `.toml`).
    #[arg(short, long, value_name = "PATH", default_value = "./config.json")]
    pub config: PathBuf,

    /// Write logs to this file (truncated at startup) instead of stdout.
    #[arg(short = 'l', long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging. Takes precedence over `--log-level`.
    #[arg(long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYNCWATCHER_LOG` is used, falling back to `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Run every target's script once before watching, regardless of its
    /// `sync_first` setting.
    #[arg(short = 's', long)]
    pub sync_first: bool,

    /// Log directories skipped by ignore patterns at info level.
    #[arg(long)]
    pub show_ignored: bool,

    /// Parse + validate the config, print the targets, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Effective log level from `--debug` / `--log-level`, if either was given.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            Some(LogLevel::Debug)
        } else {
            self.log_level
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
