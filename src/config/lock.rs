//! Exclusive advisory lock held around config file writes.
use std::fs::{File, OpenOptions, TryLockError};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfError;

/// Default lock file name, created in the current working directory.
pub const DEFAULT_LOCK_FILE: &str = "write.lock";

/// Scoped exclusive lock on a lock file.
///
/// Acquisition never blocks: a lock held by another instance fails fast with
/// [`ConfError::LockFailure`]. The lock is released when the guard is
/// dropped, on every exit path. The lock file itself stays in place so that
/// every instance always locks the same inode.
#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Create (if needed) and exclusively lock `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::LockFailure`] if the file cannot be opened or is
    /// already locked.
    pub fn acquire(path: &Path) -> Result<Self, ConfError> {
        let failure = |source| ConfError::LockFailure {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(failure)?;
        match file.try_lock() {
            Ok(()) => Ok(Self {
                file,
                path: path.to_path_buf(),
            }),
            Err(TryLockError::WouldBlock) => Err(failure(io::Error::new(
                io::ErrorKind::WouldBlock,
                "held by another instance",
            ))),
            Err(TryLockError::Error(e)) => Err(failure(e)),
        }
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.file.unlock().ok();
    }
}
