//! `network <name> default|ensure on|off` and `network <name> check`
use anyhow::Result;

use super::{Mode, token};
use crate::config::layout::{ConfigState, Layout, NetworkState};
use crate::error::ConfError;
use crate::resources::network::NetworkFile;
use crate::resources::{ProcessOpts, process};
use crate::script::{CommandResult, Context, ScriptCommand};

const USAGE: &str = "network <name> default|ensure on|off | network <name> check";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Set(Mode, ConfigState),
    Check,
}

/// Enables, disables or reports a network by moving its config file.
#[derive(Debug, Clone)]
pub struct NetworkCommand {
    tokens: Vec<String>,
    name: String,
    action: Action,
}

impl NetworkCommand {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] when the network has no
    /// template, the action is unknown, or `default`/`ensure` lacks an
    /// `on`/`off` state.
    pub fn build(tokens: &[String], layout: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let name = token(tokens, 1, USAGE)?;
        let action_token = token(tokens, 2, USAGE)?;

        if !layout.has_template(name) {
            return Err(ConfError::invalid(format!(
                "network_cmd: template for [{name}] not found in {}",
                layout.network_template_dir().display()
            )));
        }

        let action = if action_token == "check" {
            Action::Check
        } else {
            let mode = Mode::parse(action_token).ok_or_else(|| {
                ConfError::invalid(format!("network_cmd: unknown action {action_token}"))
            })?;
            let state = match tokens.get(3).map(String::as_str) {
                Some("on") => ConfigState::On,
                Some("off") => ConfigState::Off,
                _ => {
                    return Err(ConfError::invalid(format!(
                        "network_cmd: [{action_token}] requires 'on' or 'off' state"
                    )));
                }
            };
            Action::Set(mode, state)
        };

        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            name: name.to_string(),
            action,
        }))
    }

    fn ambiguous(&self) -> String {
        ConfError::AmbiguousState {
            name: self.name.clone(),
        }
        .to_string()
    }

    fn check(&self, ctx: &Context) -> CommandResult {
        let state = match ctx.layout.network_state(&self.name) {
            NetworkState::Both => {
                ctx.log.warn(&self.ambiguous());
                "on"
            }
            NetworkState::On => "on",
            NetworkState::Off => "off",
            NetworkState::Absent => "not configured",
        };
        ctx.log
            .info(&format!("Network [{}] {state}", self.name));
        CommandResult::Unchanged
    }

    fn set_default(&self, ctx: &Context, desired: ConfigState) -> Result<CommandResult> {
        let resource = NetworkFile::new(&ctx.layout, &self.name, desired);
        let name = &self.name;
        match resource.network_state() {
            NetworkState::Both => {
                ctx.log.warn(&format!("{}, skip this step", self.ambiguous()));
                Ok(CommandResult::Skipped("ambiguous state".to_string()))
            }
            NetworkState::On if desired == ConfigState::On => {
                ctx.log
                    .info(&format!("Network [{name}] already on, skip this step"));
                Ok(CommandResult::Unchanged)
            }
            NetworkState::Off if desired == ConfigState::Off => {
                ctx.log
                    .info(&format!("Network [{name}] already off, skip this step"));
                Ok(CommandResult::Unchanged)
            }
            NetworkState::On | NetworkState::Off => {
                ctx.log.info(&format!(
                    "Skip altering state of network [{name}]: it was user-configured"
                ));
                Ok(CommandResult::Skipped("user-configured".to_string()))
            }
            NetworkState::Absent => {
                ctx.log.info(&format!(
                    "Set up network [{name}] as {desired} from template {}",
                    ctx.layout
                        .config_path(name, ConfigState::Template)
                        .display()
                ));
                let opts = ProcessOpts::init("copy");
                Ok(process(&resource, &opts, ctx.dry_run, ctx.log.as_ref())?.into())
            }
        }
    }

    fn set_ensure(&self, ctx: &Context, desired: ConfigState) -> Result<CommandResult> {
        let resource = NetworkFile::new(&ctx.layout, &self.name, desired);
        let state = resource.network_state();
        let name = &self.name;
        if state == NetworkState::Both {
            ctx.log.warn(&self.ambiguous());
        }
        let already = matches!(
            (state, desired),
            (NetworkState::On | NetworkState::Both, ConfigState::On)
                | (NetworkState::Off, ConfigState::Off)
        );
        if already {
            ctx.log
                .info(&format!("Network [{name}] already {desired}"));
            return Ok(CommandResult::Unchanged);
        }

        let target = ctx.layout.config_path(name, desired);
        let opposite = ctx.layout.config_path(name, desired.opposite());
        let verb = if opposite.exists() {
            ctx.log.info(&format!(
                "Network [{name}] {desired}: move {} to {}",
                opposite.display(),
                target.display()
            ));
            "move"
        } else {
            ctx.log.info(&format!(
                "Network [{name}] {desired}: copy {} to {}",
                ctx.layout.config_path(name, ConfigState::Template).display(),
                target.display()
            ));
            "copy"
        };
        let opts = ProcessOpts::converge(verb);
        Ok(process(&resource, &opts, ctx.dry_run, ctx.log.as_ref())?.into())
    }
}

impl ScriptCommand for NetworkCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        match self.action {
            Action::Check => Ok(self.check(ctx)),
            Action::Set(Mode::Default, desired) => self.set_default(ctx, desired),
            Action::Set(Mode::Ensure, desired) => self.set_ensure(ctx, desired),
        }
    }
}
