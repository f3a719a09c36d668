//! Setup-script interpreter.
//!
//! A script is parsed into [`Statement`](parser::Statement)s through the
//! [`Registry`](registry::Registry), then walked by the
//! [`Runner`](runner::Runner), which keeps the conditional stack and
//! executes each command against a [`Context`].
pub mod commands;
mod context;
pub mod parser;
pub mod registry;
pub mod runner;

pub use context::Context;

use anyhow::Result;

use crate::logging::RunStatus;

/// Role of a command in conditional flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Ordinary statement, gated by the conditional stack.
    Action,
    /// Pushes a frame (`if`).
    Open,
    /// Pops a frame (`endif`).
    Close,
}

/// What executing a command did.
///
/// # Examples
///
/// ```
/// use confctl::logging::RunStatus;
/// use confctl::script::CommandResult;
///
/// assert_eq!(CommandResult::WouldChange.status(), RunStatus::DryRun);
/// assert_eq!(CommandResult::Skipped("user-configured".into()).status(), RunStatus::Skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The install tree or host was modified.
    Changed,
    /// Dry run: a modification was reported but not made.
    WouldChange,
    /// Nothing to do, or a read-only command.
    Unchanged,
    /// Deliberately left alone.
    Skipped(String),
    /// Value of an evaluated condition.
    Condition(bool),
}

impl CommandResult {
    /// Summary status of this result.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        match self {
            Self::Changed => RunStatus::Changed,
            Self::WouldChange => RunStatus::DryRun,
            Self::Unchanged | Self::Condition(_) => RunStatus::Unchanged,
            Self::Skipped(_) => RunStatus::Skipped,
        }
    }
}

/// One parsed script statement.
pub trait ScriptCommand: std::fmt::Debug {
    /// The statement as written, for logs and diagnostics.
    fn represent(&self) -> String;

    /// Role in conditional flow.
    fn flow(&self) -> Flow {
        Flow::Action
    }

    /// Execute the statement.
    ///
    /// # Errors
    ///
    /// Returns an error if a file the statement needs is missing or cannot
    /// be written, the write lock is held elsewhere, or an external program
    /// fails.
    fn execute(&self, ctx: &mut Context) -> Result<CommandResult>;
}
