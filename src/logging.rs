// src/logging.rs

//! Log sink setup (`tracing` + `tracing-subscriber`).
//!
//! The filter comes from `--debug` / `--log-level` when given, otherwise
//! from `SYNCWATCHER_LOG` (any `EnvFilter` directive, e.g. `debug` or
//! `syncwatcher::engine=trace`), otherwise `info`.
//!
//! Script output is written here and nowhere else, so the sink is either
//! stdout or the `--log-file`, truncated at startup and without colours.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no level is given on the CLI.
pub const LOG_ENV: &str = "SYNCWATCHER_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>, log_file: Option<&Path>) -> Result<()> {
    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    fmt()
        .with_env_filter(build_filter(cli_level))
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    match cli_level {
        Some(lvl) => EnvFilter::new(lvl.as_directive()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("opening log file {:?}", path))
}
