use std::fmt;

/// Default interpreter program used when `terminal` is not configured.
pub const DEFAULT_TERMINAL: &str = "sh";

/// Default "run this string" flag used when `terminal_arg` is not configured.
pub const DEFAULT_TERMINAL_ARG: &str = "-c";

/// Environment variable through which scripts learn their target directory.
pub const SYNC_DIR_ENV: &str = "syncdir";

/// Default quiescence window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Process-wide interpreter used to run every target's script, invoked as
/// `<program> <flag> <script>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: String,
    pub flag: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            program: DEFAULT_TERMINAL.to_string(),
            flag: DEFAULT_TERMINAL_ARG.to_string(),
        }
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.flag)
    }
}
