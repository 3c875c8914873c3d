// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use regex::{Regex, RegexSet};

use crate::errors::{Result, SyncWatcherError};
use crate::watch::path_utils::relative_str;

/// Compiled ignore patterns for a single watch target.
///
/// Patterns are full regular expressions (not globs) matched against a path
/// relative to the target root, e.g. `"src/main.rs"` or `".git/objects"`.
/// There is no implicit anchoring: `^\.git/` and `\.git/` mean different
/// things. The root itself is presented as `"."`.
///
/// A path is ignored iff *any* pattern matches; order does not matter.
#[derive(Clone)]
pub struct IgnoreMatcher {
    set: RegexSet,
}

impl fmt::Debug for IgnoreMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreMatcher")
            .field("patterns", &self.set.patterns())
            .finish()
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }
}

impl IgnoreMatcher {
    /// Compile the given patterns.
    ///
    /// Each pattern is compiled on its own first so the error names the
    /// offending pattern rather than the combined set.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        for pat in &patterns {
            Regex::new(pat).map_err(|e| {
                SyncWatcherError::ConfigError(format!("ignore pattern `{pat}` invalid: {e}"))
            })?;
        }

        let set = RegexSet::new(&patterns).map_err(|e| {
            SyncWatcherError::ConfigError(format!("building ignore pattern set: {e}"))
        })?;

        Ok(Self { set })
    }

    /// Source text of the compiled patterns, in configuration order.
    pub fn patterns(&self) -> &[String] {
        self.set.patterns()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// True if any pattern matches the already-relativised path.
    pub fn matches_relative(&self, rel_path: &str) -> bool {
        let rel = if rel_path.is_empty() { "." } else { rel_path };
        self.set.is_match(rel)
    }

    /// True if `full_path`, taken relative to `root`, matches any pattern.
    ///
    /// Paths that cannot be related to `root` are never ignored.
    pub fn should_ignore(&self, root: &Path, full_path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        match relative_str(root, full_path) {
            Some(rel) => self.matches_relative(&rel),
            None => false,
        }
    }
}

/// Free-function form of [`IgnoreMatcher::should_ignore`].
pub fn should_ignore(root: &Path, full_path: &Path, patterns: &IgnoreMatcher) -> bool {
    patterns.should_ignore(root, full_path)
}
