//! Execution context shared by script statements.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::file::SaveOptions;
use crate::config::layout::Layout;
use crate::config::lock::DEFAULT_LOCK_FILE;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::vars::VariableStore;

/// Shared state handed to every executing command.
pub struct Context {
    /// Variables consulted by placeholder substitution; `var` writes here.
    pub vars: VariableStore,
    /// Install tree the script operates on.
    pub layout: Layout,
    /// Detected platform.
    pub platform: Platform,
    /// Logger for output and run recording.
    pub log: Arc<dyn Log>,
    /// Runs service-manager programs.
    pub executor: Arc<dyn Executor>,
    /// Report changes instead of making them.
    pub dry_run: bool,
    /// Never prompt the operator.
    pub non_interactive: bool,
    /// Lock file held while a config file is written.
    pub lock_path: PathBuf,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("vars", &self.vars.len())
            .field("layout", &self.layout)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("dry_run", &self.dry_run)
            .field("non_interactive", &self.non_interactive)
            .field("lock_path", &self.lock_path)
            .finish()
    }
}

impl Context {
    /// Create a context that writes, with the lock file in the current
    /// directory.
    #[must_use]
    pub fn new(
        vars: VariableStore,
        layout: Layout,
        platform: Platform,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            vars,
            layout,
            platform,
            log,
            executor,
            dry_run: false,
            non_interactive: false,
            lock_path: PathBuf::from(DEFAULT_LOCK_FILE),
        }
    }

    /// Use `path` as the write lock.
    #[must_use]
    pub fn with_lock_path(mut self, path: impl AsRef<Path>) -> Self {
        self.lock_path = path.as_ref().to_path_buf();
        self
    }

    /// Options for [`ConfigFile::save`](crate::config::file::ConfigFile::save).
    #[must_use]
    pub fn save_options(&self) -> SaveOptions<'_> {
        SaveOptions {
            lock_path: &self.lock_path,
            dry_run: self.dry_run,
        }
    }
}
