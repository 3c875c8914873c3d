// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{Interpreter, DEFAULT_DEBOUNCE_MS};
use crate::watch::IgnoreMatcher;

/// Top-level configuration as read from disk (JSON, or TOML by extension).
///
/// ```json
/// {
///   "terminal": "bash",
///   "terminal_arg": "-c",
///   "debounce_ms": 500,
///   "watch_settings": [
///     {
///       "dir": "/srv/site",
///       "script": "rsync -a \"$syncdir/\" backup:/srv/site/",
///       "ignore": ["^\\.git/", "\\.swp$"],
///       "sync_first": true,
///       "ignore_script_output": false
///     }
///   ]
/// }
/// ```
///
/// Only `watch_settings` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Interpreter program; defaults to `sh`.
    #[serde(default)]
    pub terminal: Option<String>,

    /// Interpreter "run string" flag; defaults to `-c`.
    #[serde(default)]
    pub terminal_arg: Option<String>,

    /// Quiescence window in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub watch_settings: Vec<RawWatchSetting>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// One entry of `watch_settings`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWatchSetting {
    /// Directory to watch, absolute or relative to the config file.
    pub dir: String,

    /// Script file path or inline command.
    pub script: String,

    /// Regular expressions matched against paths relative to `dir`.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Run the script once before watching starts.
    #[serde(default)]
    pub sync_first: bool,

    /// Do not log the output of successful runs.
    #[serde(default)]
    pub ignore_script_output: bool,
}

/// Validated configuration.
///
/// Can only be obtained through [`crate::config::validate_config`] (or
/// [`ConfigFile::new_unchecked`] in tests), so every target's directory
/// exists and every ignore pattern compiled.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    interpreter: Interpreter,
    quiescence: Duration,
    targets: Vec<WatchTarget>,
}

impl ConfigFile {
    pub fn new_unchecked(
        interpreter: Interpreter,
        quiescence: Duration,
        targets: Vec<WatchTarget>,
    ) -> Self {
        Self {
            interpreter,
            quiescence,
            targets,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    pub fn into_targets(self) -> Vec<WatchTarget> {
        self.targets
    }

    /// Force `sync_first` on every target (`--sync-first`).
    pub fn force_sync_first(&mut self) {
        for target in &mut self.targets {
            target.sync_first = true;
        }
    }
}

/// One watched directory and the script to run when it changes.
///
/// Immutable once loaded; owned by exactly one supervisor.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    root_dir: PathBuf,
    script: String,
    ignore: IgnoreMatcher,
    sync_first: bool,
    suppress_output_logging: bool,
}

impl WatchTarget {
    pub fn new(root_dir: impl Into<PathBuf>, script: impl Into<String>, ignore: IgnoreMatcher) -> Self {
        Self {
            root_dir: root_dir.into(),
            script: script.into(),
            ignore,
            sync_first: false,
            suppress_output_logging: false,
        }
    }

    pub fn with_sync_first(mut self, sync_first: bool) -> Self {
        self.sync_first = sync_first;
        self
    }

    pub fn with_suppress_output_logging(mut self, suppress: bool) -> Self {
        self.suppress_output_logging = suppress;
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn ignore(&self) -> &IgnoreMatcher {
        &self.ignore
    }

    pub fn sync_first(&self) -> bool {
        self.sync_first
    }

    pub fn suppress_output_logging(&self) -> bool {
        self.suppress_output_logging
    }
}
