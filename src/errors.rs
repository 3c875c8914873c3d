// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncWatcherError {
    /// Malformed or invalid configuration. Fatal before any watching begins.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The OS watch facility or the initial walk failed for one target.
    #[error("Watch setup error for {dir:?}: {reason}")]
    WatchSetupError { dir: PathBuf, reason: String },

    /// Adding or removing a directory failed while the target was running.
    #[error("Watch maintenance error for {path:?}: {reason}")]
    WatchMaintenanceError { path: PathBuf, reason: String },

    /// The script could not be started at all.
    #[error("Script execution error: {0}")]
    ScriptExecutionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    NotifyError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SyncWatcherError>;
