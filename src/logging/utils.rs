//! Log file location, rotation and line sanitising.
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "cellframe-node-config";

/// Size after which a mode's log is rotated to `<mode>.log.1`.
///
/// Package hooks run the tool on every upgrade, so logs append across runs.
pub(super) const ROTATE_BYTES: u64 = 512 * 1024;

/// Per-user directory for run logs, created if needed.
///
/// `$XDG_CACHE_HOME` wins everywhere; otherwise `%LOCALAPPDATA%` on Windows
/// and `~/.cache` elsewhere. Falls back to the working directory.
fn log_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            if cfg!(windows) {
                std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
            } else {
                std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache"))
            }
        })
        .unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join(APP_DIR);
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one run mode (`init`, `exec`, `vars`).
pub(super) fn log_file_path(mode: &str) -> Option<PathBuf> {
    Some(log_dir()?.join(format!("{mode}.log")))
}

/// Move `path` aside to `<path>.1` once it reaches `limit` bytes.
///
/// Any previous `.1` file is replaced. Missing files are left alone.
pub(super) fn rotate_if_large(path: &Path, limit: u64) {
    let Ok(meta) = fs::metadata(path) else {
        return;
    };
    if meta.len() < limit {
        return;
    }
    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    fs::rename(path, PathBuf::from(rotated)).ok();
}

/// Make a message safe for a single log line.
///
/// Drops CSI escape sequences (as emitted by `systemctl` and friends) and
/// every other control character except tab.
pub(super) fn plain(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => {
                if chars.next_if_eq(&'[').is_some() {
                    for inner in chars.by_ref() {
                        if ('@'..='~').contains(&inner) {
                            break;
                        }
                    }
                }
            }
            '\t' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Local time for the run header, with offset.
pub(super) fn header_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// Local time for one log line.
pub(super) fn line_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}
