//! Domain-specific error types for the configuration engine.
//!
//! Modules whose failure kind matters to the caller (the line model, the
//! lock guard, the command registry and the script parser) return
//! [`ConfError`]. Command execution works in [`anyhow::Result`] and adds
//! context with `.with_context()`; the CLI boundary converts everything to
//! [`anyhow::Error`] via `?`.
//!
//! # Error taxonomy
//!
//! ```text
//! ConfError
//! ├── InvalidArgument  — malformed command tokens, unknown action or name
//! ├── NotFound         — script, config file or template missing
//! ├── LockFailure      — exclusive write lock held by another instance
//! ├── AmbiguousState   — both on and off files exist (reported, not fatal)
//! ├── Io               — any other filesystem failure
//! └── Parse            — a script line failed to build, with its line number
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the configuration engine.
#[derive(Error, Debug)]
pub enum ConfError {
    /// Malformed or missing command tokens, unknown action, unresolvable name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required file does not exist.
    #[error("{what} not found: {}", .path.display())]
    NotFound {
        /// What kind of file was expected (e.g. `"config"`, `"template"`).
        what: &'static str,
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The exclusive write lock could not be acquired.
    #[error("cannot lock {} for exclusive access", .path.display())]
    LockFailure {
        /// Path of the lock file.
        path: PathBuf,
        /// Underlying error reported by the OS.
        #[source]
        source: std::io::Error,
    },

    /// Both the enabled and the disabled file exist for a network.
    #[error("network [{name}] has both enabled and disabled config files")]
    AmbiguousState {
        /// Network name.
        name: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A script line could not be turned into a command.
    #[error("setup line {line} <<{text}>>: {source}")]
    Parse {
        /// 1-based line (or statement) number.
        line: usize,
        /// The offending line, comment-stripped and trimmed.
        text: String,
        /// Why the line was rejected.
        #[source]
        source: Box<ConfError>,
    },
}

impl ConfError {
    /// Shorthand for [`ConfError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Wrap an [`std::io::Error`] with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
