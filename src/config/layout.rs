//! Install tree path resolution.
//!
//! ```text
//! <root>/etc/cellframe-node.cfg                  node config (live)
//! <root>/etc/network/<name>.cfg                  network, enabled
//! <root>/etc/network/<name>.cfg.dis              network, disabled
//! <root>/share/configs/cellframe-node.cfg        node config template
//! <root>/share/configs/network/<name>.cfg        network template
//! ```
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfError;

/// Name of the top-level node config.
pub const NODE_CONFIG: &str = "cellframe-node";

const CFG_EXT: &str = ".cfg";
const DISABLED_EXT: &str = ".cfg.dis";

/// Which of the candidate files for a config name is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    /// The enabled, live file.
    On,
    /// The disabled file (networks only; the node config has no off state).
    Off,
    /// The read-only template.
    Template,
}

impl ConfigState {
    /// The state opposite to `self` (`Template` maps to itself).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
            Self::Template => Self::Template,
        }
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// Enabled/disabled state of a network, derived from which files exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// Neither the enabled nor the disabled file exists.
    Absent,
    /// Only the enabled file exists.
    On,
    /// Only the disabled file exists.
    Off,
    /// Both exist; an operator conflict to surface, not resolve.
    Both,
}

/// State shown by network listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListedState {
    /// `<name>.cfg`
    On,
    /// `<name>.cfg.dis`
    Off,
    /// Any other file in the network directory.
    Unknown,
}

impl fmt::Display for ListedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => write!(f, "on"),
            Self::Off => write!(f, "off"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One entry of [`Layout::list_networks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkEntry {
    /// Network name (file name without the state extension).
    pub name: String,
    /// State encoded by the file extension.
    pub state: ListedState,
}

/// Paths of a node installation rooted at one directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Create a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Installation root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of live configs.
    #[must_use]
    pub fn etc_dir(&self) -> PathBuf {
        self.root.join("etc")
    }

    /// Directory of live network configs.
    #[must_use]
    pub fn network_dir(&self) -> PathBuf {
        self.etc_dir().join("network")
    }

    /// Directory of shipped templates.
    #[must_use]
    pub fn template_dir(&self) -> PathBuf {
        self.root.join("share").join("configs")
    }

    /// Directory of shipped network templates.
    #[must_use]
    pub fn network_template_dir(&self) -> PathBuf {
        self.template_dir().join("network")
    }

    /// Path of the `state` file for config `name`.
    ///
    /// `cellframe-node` resolves to the node config, whose on and off paths
    /// coincide; any other name is a network.
    #[must_use]
    pub fn config_path(&self, name: &str, state: ConfigState) -> PathBuf {
        if name == NODE_CONFIG {
            return match state {
                ConfigState::Template => self.template_dir().join(format!("{name}{CFG_EXT}")),
                ConfigState::On | ConfigState::Off => {
                    self.etc_dir().join(format!("{name}{CFG_EXT}"))
                }
            };
        }
        match state {
            ConfigState::On => self.network_dir().join(format!("{name}{CFG_EXT}")),
            ConfigState::Off => self.network_dir().join(format!("{name}{DISABLED_EXT}")),
            ConfigState::Template => self
                .network_template_dir()
                .join(format!("{name}{CFG_EXT}")),
        }
    }

    /// Whether `name` has a shipped template.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.config_path(name, ConfigState::Template).is_file()
    }

    /// Whether `name` may be targeted by `config` statements.
    #[must_use]
    pub fn is_known_config(&self, name: &str) -> bool {
        name == NODE_CONFIG || self.has_template(name)
    }

    /// Derive the state of network `name` from the files present.
    #[must_use]
    pub fn network_state(&self, name: &str) -> NetworkState {
        let on = self.config_path(name, ConfigState::On).exists();
        let off = self.config_path(name, ConfigState::Off).exists();
        match (on, off) {
            (true, true) => NetworkState::Both,
            (true, false) => NetworkState::On,
            (false, true) => NetworkState::Off,
            (false, false) => NetworkState::Absent,
        }
    }

    /// List the files of the live network directory, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::NotFound`] if the directory does not exist and
    /// [`ConfError::Io`] if it cannot be read.
    pub fn list_networks(&self) -> Result<Vec<NetworkEntry>, ConfError> {
        let dir = self.network_dir();
        if !dir.is_dir() {
            return Err(ConfError::NotFound {
                what: "network directory",
                path: dir,
            });
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| ConfError::io(&dir, e))? {
            let entry = entry.map_err(|e| ConfError::io(&dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            entries.push(classify_network_file(&file_name));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

fn classify_network_file(file_name: &str) -> NetworkEntry {
    let (name, state) = if let Some(name) = file_name.strip_suffix(DISABLED_EXT) {
        (name, ListedState::Off)
    } else if let Some(name) = file_name.strip_suffix(CFG_EXT) {
        (name, ListedState::On)
    } else {
        (file_name, ListedState::Unknown)
    };
    NetworkEntry {
        name: name.to_string(),
        state,
    }
}
