//! Live config materialised from its shipped template.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::helpers::fs::ensure_parent_dir;
use super::{Resource, ResourceChange, ResourceState};
use crate::config::file::ConfigFile;
use crate::config::lock::LockGuard;
use crate::vars::VariableStore;

/// Copy of `template` at `target`, optionally with placeholders expanded.
///
/// Without a variable store the copy is verbatim, leaving `${...}` values
/// for later `config default` statements to fill.
#[derive(Debug)]
pub struct TemplateCopy<'a> {
    template: PathBuf,
    target: PathBuf,
    vars: Option<&'a VariableStore>,
    lock_path: &'a Path,
}

impl<'a> TemplateCopy<'a> {
    /// Describe a copy of `template` at `target`, written under `lock_path`.
    #[must_use]
    pub fn new(template: PathBuf, target: PathBuf, lock_path: &'a Path) -> Self {
        Self {
            template,
            target,
            vars: None,
            lock_path,
        }
    }

    /// Expand placeholders through `vars` in the copied content.
    #[must_use]
    pub const fn substituted(mut self, vars: &'a VariableStore) -> Self {
        self.vars = Some(vars);
        self
    }

    /// The content the target should hold.
    fn rendered(&self) -> Result<String> {
        let text = fs::read_to_string(&self.template)
            .with_context(|| format!("read template {}", self.template.display()))?;
        let Some(vars) = self.vars else {
            return Ok(text);
        };
        let mut model = ConfigFile::from_text(&self.target, &text);
        model.substitute_placeholders(vars);
        Ok(model.render())
    }
}

impl Resource for TemplateCopy<'_> {
    fn description(&self) -> String {
        format!(
            "{} from template {}",
            self.target.display(),
            self.template.display()
        )
    }

    fn current_state(&self) -> Result<ResourceState> {
        if !self.template.is_file() {
            return Ok(ResourceState::Invalid {
                reason: format!("template {} not found", self.template.display()),
            });
        }
        if !self.target.exists() {
            return Ok(ResourceState::Missing);
        }
        let current = fs::read_to_string(&self.target)
            .with_context(|| format!("read {}", self.target.display()))?;
        if current == self.rendered()? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "modified".to_string(),
            })
        }
    }

    fn apply(&self) -> Result<ResourceChange> {
        let content = self.rendered()?;
        ensure_parent_dir(&self.target)?;
        let _lock = LockGuard::acquire(self.lock_path)?;
        fs::write(&self.target, content)
            .with_context(|| format!("write {}", self.target.display()))?;
        Ok(ResourceChange::Applied)
    }
}
