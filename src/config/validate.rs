// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, RawWatchSetting, WatchTarget};
use crate::errors::{Result, SyncWatcherError};
use crate::fs::FileSystem;
use crate::types::{Interpreter, DEFAULT_TERMINAL, DEFAULT_TERMINAL_ARG};
use crate::watch::IgnoreMatcher;

/// Validate a raw config and turn it into a [`ConfigFile`].
///
/// Relative paths are resolved against `base_dir` (the directory holding the
/// config file). Fails fast on the first problem, naming the offending field.
pub fn validate_config(
    raw: RawConfigFile,
    fs: &dyn FileSystem,
    base_dir: &Path,
) -> Result<ConfigFile> {
    ensure_has_targets(&raw)?;
    let interpreter = resolve_interpreter(&raw)?;
    let quiescence = resolve_quiescence(&raw)?;

    let mut targets = Vec::with_capacity(raw.watch_settings.len());
    for (idx, setting) in raw.watch_settings.iter().enumerate() {
        targets.push(validate_target(idx, setting, fs, base_dir)?);
    }

    Ok(ConfigFile::new_unchecked(interpreter, quiescence, targets))
}

fn config_error(msg: impl Into<String>) -> SyncWatcherError {
    SyncWatcherError::ConfigError(msg.into())
}

fn ensure_has_targets(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch_settings.is_empty() {
        return Err(config_error(
            "config must contain at least one entry in `watch_settings`",
        ));
    }
    Ok(())
}

fn resolve_interpreter(cfg: &RawConfigFile) -> Result<Interpreter> {
    let program = non_empty(cfg.terminal.as_deref()).unwrap_or(DEFAULT_TERMINAL);
    let flag = non_empty(cfg.terminal_arg.as_deref()).unwrap_or(DEFAULT_TERMINAL_ARG);

    Ok(Interpreter {
        program: program.to_string(),
        flag: flag.to_string(),
    })
}

fn resolve_quiescence(cfg: &RawConfigFile) -> Result<Duration> {
    if cfg.debounce_ms == 0 {
        return Err(config_error("`debounce_ms` must be >= 1 (got 0)"));
    }
    Ok(Duration::from_millis(cfg.debounce_ms))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn validate_target(
    idx: usize,
    setting: &RawWatchSetting,
    fs: &dyn FileSystem,
    base_dir: &Path,
) -> Result<WatchTarget> {
    let root_dir = validate_dir(idx, &setting.dir, fs, base_dir)?;
    let script = validate_script(idx, &setting.script, fs, base_dir)?;

    let ignore = IgnoreMatcher::new(&setting.ignore).map_err(|e| match e {
        SyncWatcherError::ConfigError(msg) => {
            config_error(format!("watch_settings[{idx}].ignore: {msg}"))
        }
        other => other,
    })?;

    Ok(WatchTarget::new(root_dir, script, ignore)
        .with_sync_first(setting.sync_first)
        .with_suppress_output_logging(setting.ignore_script_output))
}

fn resolve(base_dir: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn validate_dir(idx: usize, dir: &str, fs: &dyn FileSystem, base_dir: &Path) -> Result<PathBuf> {
    if dir.trim().is_empty() {
        return Err(config_error(format!("watch_settings[{idx}].dir is empty")));
    }

    let path = resolve(base_dir, dir);
    let canonical = fs.canonicalize(&path).map_err(|e| {
        config_error(format!("watch_settings[{idx}].dir `{dir}` invalid: {e}"))
    })?;

    if !fs.is_dir(&canonical) {
        return Err(config_error(format!(
            "watch_settings[{idx}].dir `{dir}` is not a directory"
        )));
    }

    Ok(canonical)
}

/// A script is either a path to an existing file or an inline command.
///
/// Strings that look like a bare path (contain a separator, no whitespace)
/// but do not exist are rejected rather than silently run as a command.
fn validate_script(idx: usize, script: &str, fs: &dyn FileSystem, base_dir: &Path) -> Result<String> {
    let trimmed = script.trim();
    if trimmed.is_empty() {
        return Err(config_error(format!("watch_settings[{idx}].script is empty")));
    }

    let path = resolve(base_dir, trimmed);
    if fs.exists(&path) {
        if fs.is_dir(&path) {
            return Err(config_error(format!(
                "watch_settings[{idx}].script `{script}` is a directory"
            )));
        }
        let canonical = fs.canonicalize(&path).unwrap_or(path);
        return Ok(canonical.to_string_lossy().into_owned());
    }

    if looks_like_path(trimmed) {
        return Err(config_error(format!(
            "watch_settings[{idx}].script `{script}` does not exist"
        )));
    }

    Ok(script.to_string())
}

fn looks_like_path(s: &str) -> bool {
    s.contains(std::path::MAIN_SEPARATOR) && !s.chars().any(char::is_whitespace)
}
