//! Error types for build execution.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Errors from running the external compiler.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The compiler process could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on or reading from the compiler process failed.
    #[error("I/O error while waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited unsuccessfully.
    #[error("{status}{}", stderr_summary(.stderr))]
    Failed {
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The compiler ran past the configured timeout and was killed.
    #[error("timed out after {}s", .limit.as_secs_f64())]
    TimedOut { limit: Duration },

    /// The output directory could not be created.
    #[error("creating output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Last non-empty line of stderr, prefixed for appending to the status.
fn stderr_summary(stderr: &str) -> String {
    match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(line) => format!(": {}", line.trim()),
        None => String::new(),
    }
}

/// Result type for execution.
pub type Result<T> = std::result::Result<T, ExecError>;
