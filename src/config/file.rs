//! Line model of one config file.
//!
//! The file is held as its raw lines so that comments, blank lines and the
//! order of unrelated entries survive every mutation byte for byte.
use std::fs;
use std::path::{Path, PathBuf};

use super::ini::{self, LineKind};
use super::lock::LockGuard;
use crate::error::ConfError;
use crate::logging::Log;
use crate::vars::VariableStore;

/// Outcome of looking up a `(group, param)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The parameter exists in the group.
    Found {
        /// Trimmed value with any inline comment removed.
        value: String,
        /// Index of the owning line.
        line: usize,
    },
    /// The group exists but lacks the parameter.
    MissingParam {
        /// Index at which a new parameter line belongs.
        insert_at: usize,
    },
    /// No such group in the file.
    MissingGroup,
}

impl Lookup {
    /// Whether the group header was seen.
    #[must_use]
    pub const fn group_found(&self) -> bool {
        !matches!(self, Self::MissingGroup)
    }

    /// The value, if the parameter was found.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::MissingParam { .. } | Self::MissingGroup => None,
        }
    }
}

/// Where and how [`ConfigFile::save`] writes.
#[derive(Debug, Clone, Copy)]
pub struct SaveOptions<'a> {
    /// Lock file held for the duration of the write.
    pub lock_path: &'a Path,
    /// Log the lines instead of writing them.
    pub dry_run: bool,
}

/// An ordered sequence of raw config lines bound to a path.
///
/// # Examples
///
/// ```
/// use confctl::config::file::ConfigFile;
///
/// let mut cfg = ConfigFile::from_text("node.cfg", "[general]\nauto_online=false\n");
/// assert_eq!(cfg.get("general", "auto_online").as_deref(), Some("false"));
/// assert!(cfg.set("general", "auto_online", "true"));
/// assert_eq!(cfg.render(), "[general]\nauto_online=true\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
    lines: Vec<String>,
    eol: &'static str,
    final_newline: bool,
}

impl ConfigFile {
    /// Read `path` into a line model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::NotFound`] if the file does not exist and
    /// [`ConfError::Io`] if it cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfError> {
        if !path.exists() {
            return Err(ConfError::NotFound {
                what: "config",
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|e| ConfError::io(path, e))?;
        Ok(Self::from_text(path, &content))
    }

    /// Build a line model from in-memory text.
    ///
    /// The line terminator of the first line (`\r\n` or `\n`) and whether
    /// the text ends with one are kept for [`render`](Self::render).
    #[must_use]
    pub fn from_text(path: impl Into<PathBuf>, content: &str) -> Self {
        let eol = match content.split_once('\n') {
            Some((first, _)) if first.ends_with('\r') => "\r\n",
            _ => "\n",
        };
        Self {
            path: path.into(),
            lines: content.lines().map(String::from).collect(),
            eol,
            final_newline: content.is_empty() || content.ends_with('\n'),
        }
    }

    /// Path the model was loaded from and saves to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Find `param` within the scope of `group`.
    ///
    /// Scope runs from the matching header to the next different header.
    /// Lines in scope that are not `key=value` are skipped.
    #[must_use]
    pub fn exists(&self, group: &str, param: &str) -> Lookup {
        let mut in_group = false;
        let mut last_content = 0;
        for (idx, raw) in self.lines.iter().enumerate() {
            match ini::classify(raw) {
                LineKind::Blank => {}
                LineKind::Header(name) if name == group => {
                    in_group = true;
                    last_content = idx;
                }
                LineKind::Header(_) => {
                    if in_group {
                        return Lookup::MissingParam {
                            insert_at: last_content + 1,
                        };
                    }
                }
                LineKind::Pair { key, value } if in_group => {
                    if key == param {
                        return Lookup::Found {
                            value: value.to_string(),
                            line: idx,
                        };
                    }
                    last_content = idx;
                }
                LineKind::Pair { .. } | LineKind::Other(_) => {
                    if in_group {
                        last_content = idx;
                    }
                }
            }
        }
        if in_group {
            Lookup::MissingParam {
                insert_at: last_content + 1,
            }
        } else {
            Lookup::MissingGroup
        }
    }

    /// Value of `param` in `group`, if present.
    #[must_use]
    pub fn get(&self, group: &str, param: &str) -> Option<String> {
        match self.exists(group, param) {
            Lookup::Found { value, .. } => Some(value),
            Lookup::MissingParam { .. } | Lookup::MissingGroup => None,
        }
    }

    /// Set `param` in `group` to `value`, returning whether any line changed.
    ///
    /// An existing line is replaced in place. A missing parameter is inserted
    /// after the last entry of its group. A missing group is appended at the
    /// end of the file together with the parameter.
    pub fn set(&mut self, group: &str, param: &str, value: &str) -> bool {
        let value = value.trim();
        let new_line = format!("{param}={value}");
        match self.exists(group, param) {
            Lookup::Found { value: current, line } => {
                if current == value {
                    return false;
                }
                if let Some(slot) = self.lines.get_mut(line) {
                    *slot = new_line;
                }
            }
            Lookup::MissingParam { insert_at } => {
                let next_is_header = self
                    .lines
                    .get(insert_at)
                    .is_some_and(|l| matches!(ini::classify(l), LineKind::Header(_)));
                let at = insert_at.min(self.lines.len());
                if next_is_header {
                    self.lines.splice(at..at, [new_line, String::new()]);
                } else {
                    self.lines.insert(at, new_line);
                }
            }
            Lookup::MissingGroup => {
                if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
                    self.lines.push(String::new());
                }
                self.lines.push(format!("[{group}]"));
                self.lines.push(new_line);
            }
        }
        true
    }

    /// Expand `${NAME}` placeholders on every non-comment line.
    ///
    /// Returns whether any line changed.
    pub fn substitute_placeholders(&mut self, vars: &VariableStore) -> bool {
        let mut changed = false;
        for line in self.lines.iter_mut().filter(|l| !ini::is_comment(l)) {
            let replaced = vars.substitute(line);
            if replaced != *line {
                *line = replaced;
                changed = true;
            }
        }
        changed
    }

    /// Render the lines as file content with the terminator they were read
    /// with, ending in one only if the source did.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.eol);
        if self.final_newline && !self.lines.is_empty() {
            out.push_str(self.eol);
        }
        out
    }

    /// Persist the lines to [`path`](Self::path) under the write lock.
    ///
    /// In dry-run mode the lines are logged and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::LockFailure`] if another instance holds the lock
    /// and [`ConfError::Io`] if the write fails.
    pub fn save(&self, opts: &SaveOptions<'_>, log: &dyn Log) -> Result<(), ConfError> {
        if opts.dry_run {
            log.dry_run(&format!("would write {}:", self.path.display()));
            for line in &self.lines {
                log.dry_run(&format!("  {line}"));
            }
            return Ok(());
        }
        let _lock = LockGuard::acquire(opts.lock_path)?;
        fs::write(&self.path, self.render()).map_err(|e| ConfError::io(&self.path, e))?;
        log.debug(&format!(
            "saved {} lines to {}",
            self.lines.len(),
            self.path.display()
        ));
        Ok(())
    }
}
