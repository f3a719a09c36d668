//! Core logging types: run entries, status, and the [`Log`] trait.

/// Result of one executed script statement, kept for the run summary.
#[derive(Debug, Clone)]
pub struct RunEntry {
    /// Statement as written (`represent()` of the command).
    pub name: String,
    /// Final status of the statement.
    pub status: RunStatus,
    /// Optional detail (skip reason, error description).
    pub message: Option<String>,
}

/// Status of an executed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The statement modified the install tree.
    Changed,
    /// Already in the desired state, or a read-only statement.
    Unchanged,
    /// Gated off by a condition, or deliberately left to the operator.
    Skipped,
    /// Would have modified the install tree; dry run.
    DryRun,
    /// The statement failed and aborted the run.
    Failed,
}

impl RunStatus {
    /// Lowercase name used in summary lines and the run log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }

    const fn icon(self) -> char {
        match self {
            Self::Changed => '✓',
            Self::Unchanged => '·',
            Self::Skipped => '○',
            Self::DryRun => '~',
            Self::Failed => '✗',
        }
    }
}

impl RunEntry {
    /// One summary line: icon, statement and optional detail.
    #[must_use]
    pub fn summary_line(&self) -> String {
        match &self.message {
            Some(msg) => format!("{} {} ({msg})", self.status.icon(), self.name),
            None => format!("{} {}", self.status.icon(), self.name),
        }
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the real implementation; commands
/// only see this trait, so tests can capture what they report.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log what a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Record a statement result for the summary.
    fn record(&self, name: &str, status: RunStatus, message: Option<&str>);
}
