// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::validate::validate_config;
use crate::errors::{Result, SyncWatcherError};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
/// This only performs deserialization; it does **not** touch the paths the
/// config refers to. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path).map_err(|e| {
        SyncWatcherError::ConfigError(format!("read config file {path:?} failed: {e:#}"))
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config: RawConfigFile = if is_toml {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    Ok(config)
}

/// Load a configuration file from path and validate it against the real
/// filesystem.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with(&RealFileSystem, path)
}

/// Like [`load_and_validate`], against an arbitrary [`FileSystem`].
pub fn load_and_validate_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw = load_from_path(fs, path)?;
    validate_config(raw, fs, &config_base_dir(path))
}

/// Directory relative config paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "deploy/config.json"),
///   we use that directory.
/// - If it's just a bare filename like "config.json" (parent = ""),
///   we fall back to the current working directory.
pub fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

