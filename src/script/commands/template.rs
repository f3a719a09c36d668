//! `fromtemplate <name> default|ensure`
use anyhow::Result;

use super::{Mode, live_path, token};
use crate::config::layout::{ConfigState, Layout};
use crate::error::ConfError;
use crate::resources::template::TemplateCopy;
use crate::resources::{ProcessOpts, Resource as _, process};
use crate::script::{CommandResult, Context, ScriptCommand};

const USAGE: &str = "fromtemplate <name> default|ensure";

/// Materialises a live config from its shipped template.
///
/// `default` copies verbatim only when the live file is missing; `ensure`
/// overwrites it with the template, placeholders expanded.
#[derive(Debug, Clone)]
pub struct FromTemplateCommand {
    tokens: Vec<String>,
    name: String,
    mode: Mode,
}

impl FromTemplateCommand {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] when `name` has no template or
    /// the action is unknown.
    pub fn build(tokens: &[String], layout: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let name = token(tokens, 1, USAGE)?;
        let action = token(tokens, 2, USAGE)?;
        if !layout.has_template(name) {
            return Err(ConfError::invalid(format!(
                "fromtemplate: no template for [{name}]"
            )));
        }
        let mode = Mode::parse(action).ok_or_else(|| {
            ConfError::invalid(format!(
                "fromtemplate: allowed actions are default|ensure, not {action}"
            ))
        })?;
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            name: name.to_string(),
            mode,
        }))
    }
}

impl ScriptCommand for FromTemplateCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let template = ctx.layout.config_path(&self.name, ConfigState::Template);
        let target = live_path(&ctx.layout, &self.name, ctx.log.as_ref());
        let copy = TemplateCopy::new(template, target, &ctx.lock_path);
        let (copy, opts) = match self.mode {
            Mode::Default => (copy, ProcessOpts::init("copy")),
            Mode::Ensure => (copy.substituted(&ctx.vars), ProcessOpts::converge("overwrite")),
        };
        let result: CommandResult = process(&copy, &opts, ctx.dry_run, ctx.log.as_ref())?.into();
        if matches!(result, CommandResult::Changed | CommandResult::WouldChange) {
            ctx.log.info(&format!("[{}] {}", self.name, copy.description()));
        }
        Ok(result)
    }
}
