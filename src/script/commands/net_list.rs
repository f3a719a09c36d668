//! `net_list [all|on|off]`
use anyhow::Result;

use crate::config::layout::{Layout, ListedState};
use crate::error::ConfError;
use crate::script::{CommandResult, Context, ScriptCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    All,
    Only(ListedState),
}

/// Lists the files of the live network directory with their state.
#[derive(Debug, Clone)]
pub struct NetListCommand {
    tokens: Vec<String>,
    filter: Filter,
}

impl NetListCommand {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] for a filter other than
    /// `all`, `on` or `off`.
    pub fn build(tokens: &[String], _: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let filter = match tokens.get(1).map(String::as_str) {
            None | Some("all") => Filter::All,
            Some("on") => Filter::Only(ListedState::On),
            Some("off") => Filter::Only(ListedState::Off),
            Some(other) => {
                return Err(ConfError::invalid(format!(
                    "net_list: filter must be all|on|off, not {other}"
                )));
            }
        };
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            filter,
        }))
    }
}

impl ScriptCommand for NetListCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let entries = match ctx.layout.list_networks() {
            Ok(entries) => entries,
            Err(ConfError::NotFound { path, .. }) => {
                ctx.log
                    .warn(&format!("The catalog was not found: {}", path.display()));
                return Ok(CommandResult::Unchanged);
            }
            Err(e) => return Err(e.into()),
        };
        let shown: Vec<_> = entries
            .iter()
            .filter(|e| match self.filter {
                Filter::All => true,
                Filter::Only(state) => e.state == state,
            })
            .collect();
        if shown.is_empty() {
            ctx.log.info("No networks were found.");
        }
        for entry in shown {
            ctx.log
                .info(&format!("name: {}\tstate: {}", entry.name, entry.state));
        }
        Ok(CommandResult::Unchanged)
    }
}
