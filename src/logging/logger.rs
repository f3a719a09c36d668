//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, RunEntry, RunStatus};
use super::utils::log_file_path;
use super::{TARGET_DRY_RUN, TARGET_STAGE, TARGET_SUMMARY};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger backed by [`tracing`].
///
/// Messages go through the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber), which also copies
/// them to `$XDG_CACHE_HOME/cellframe-node-config/<mode>.log`.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<RunEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for run mode `mode`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber's file layer.
    #[must_use]
    pub fn new(mode: &str) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file: log_file_path(mode),
        }
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<RunEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: TARGET_STAGE, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log what a dry run would have done.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: TARGET_DRY_RUN, "{msg}");
    }

    /// Record a statement result for the summary.
    pub fn record(&self, name: &str, status: RunStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(RunEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the failed statements.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|e| e.status == RunStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded statements.
    ///
    /// Each line carries its status as a field; colouring is left to the
    /// console formatter.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        let count = |status: RunStatus| entries.iter().filter(|e| e.status == status).count();
        for entry in &entries {
            tracing::info!(target: TARGET_SUMMARY, status = entry.status.label(), "{}", entry.summary_line());
        }

        tracing::info!(
            target: TARGET_SUMMARY,
            "{} statements: {} changed, {} unchanged, {} skipped, {} dry-run, {} failed",
            entries.len(),
            count(RunStatus::Changed),
            count(RunStatus::Unchanged),
            count(RunStatus::Skipped),
            count(RunStatus::DryRun),
            count(RunStatus::Failed),
        );

        if let Some(path) = &self.log_file {
            self.debug(&format!("log: {}", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record(&self, name: &str, status: RunStatus, message: Option<&str>) {
        self.record(name, status, message);
    }
}
