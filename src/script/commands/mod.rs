//! Built-in script commands.
pub mod condition;
pub mod config;
pub mod net_list;
pub mod network;
pub mod service;
pub mod template;
pub mod var;

use std::path::PathBuf;

use super::CommandResult;
use crate::config::layout::{ConfigState, Layout, NetworkState};
use crate::error::ConfError;
use crate::logging::Log;
use crate::resources::Processed;

/// `default` or `ensure`, shared by the file-touching commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only initialise what is missing or unset.
    Default,
    /// Force the desired state.
    Ensure,
}

impl Mode {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "default" => Some(Self::Default),
            "ensure" => Some(Self::Ensure),
            _ => None,
        }
    }
}

/// Token at `idx`, or an [`InvalidArgument`](ConfError::InvalidArgument)
/// quoting `usage`.
fn token<'a>(tokens: &'a [String], idx: usize, usage: &str) -> Result<&'a str, ConfError> {
    tokens
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| ConfError::invalid(format!("usage: {usage}")))
}

/// The file holding the live settings of config `name`.
///
/// Networks resolve to whichever of the on/off files exists; when both do,
/// the conflict is reported and the enabled file wins.
fn live_path(layout: &Layout, name: &str, log: &dyn Log) -> PathBuf {
    let state = match layout.network_state(name) {
        NetworkState::Off => ConfigState::Off,
        NetworkState::Both => {
            log.warn(
                &ConfError::AmbiguousState {
                    name: name.to_string(),
                }
                .to_string(),
            );
            ConfigState::On
        }
        NetworkState::On | NetworkState::Absent => ConfigState::On,
    };
    layout.config_path(name, state)
}

fn changed(dry_run: bool) -> CommandResult {
    if dry_run {
        CommandResult::WouldChange
    } else {
        CommandResult::Changed
    }
}

impl From<Processed> for CommandResult {
    fn from(processed: Processed) -> Self {
        match processed {
            Processed::Applied => Self::Changed,
            Processed::WouldApply => Self::WouldChange,
            Processed::AlreadyCorrect => Self::Unchanged,
            Processed::Skipped { reason } => Self::Skipped(reason),
        }
    }
}
