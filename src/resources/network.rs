//! Network enable/disable state as a file resource.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::helpers::fs::{ensure_parent_dir, replace_with};
use super::{Resource, ResourceChange, ResourceState};
use crate::config::layout::{ConfigState, Layout, NetworkState};

/// The config file of network `name` in state `desired` (on or off).
///
/// The opposite-state file, when present, is renamed into place so that
/// operator edits survive; otherwise the template is copied.
#[derive(Debug, Clone)]
pub struct NetworkFile {
    name: String,
    desired: ConfigState,
    state: NetworkState,
    target: PathBuf,
    opposite: PathBuf,
    template: PathBuf,
}

impl NetworkFile {
    /// Describe network `name` in `desired` state within `layout`.
    ///
    /// The current state is sampled once, here.
    #[must_use]
    pub fn new(layout: &Layout, name: &str, desired: ConfigState) -> Self {
        Self {
            name: name.to_string(),
            desired,
            state: layout.network_state(name),
            target: layout.config_path(name, desired),
            opposite: layout.config_path(name, desired.opposite()),
            template: layout.config_path(name, ConfigState::Template),
        }
    }

    /// State of the network files when this resource was built.
    #[must_use]
    pub const fn network_state(&self) -> NetworkState {
        self.state
    }
}

impl Resource for NetworkFile {
    fn description(&self) -> String {
        format!("network [{}] {}", self.name, self.desired)
    }

    fn current_state(&self) -> Result<ResourceState> {
        let desired_on = self.desired == ConfigState::On;
        Ok(match (self.state, desired_on) {
            (NetworkState::Absent, _) => ResourceState::Missing,
            (NetworkState::On | NetworkState::Both, true) | (NetworkState::Off, false) => {
                ResourceState::Correct
            }
            (NetworkState::Off, true) => ResourceState::Incorrect {
                current: "off".to_string(),
            },
            (NetworkState::On | NetworkState::Both, false) => ResourceState::Incorrect {
                current: "on".to_string(),
            },
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.opposite.exists() {
            replace_with(&self.opposite, &self.target)?;
        } else {
            ensure_parent_dir(&self.target)?;
            std::fs::copy(&self.template, &self.target).with_context(|| {
                format!(
                    "copy template {} to {}",
                    self.template.display(),
                    self.target.display()
                )
            })?;
        }
        Ok(ResourceChange::Applied)
    }
}
