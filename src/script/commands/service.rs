//! `service enable|disable|start|stop|restart|status`
use std::path::Path;

use anyhow::Result;

use super::{changed, token};
use crate::config::layout::Layout;
use crate::error::ConfError;
use crate::resources::service::{ServiceAction, ServiceManager, ServiceUnit};
use crate::resources::{ProcessOpts, process};
use crate::script::{CommandResult, Context, ScriptCommand};
use crate::vars::NODE_BINARY_PATH;

const USAGE: &str = "service enable|disable|start|stop|restart|status";

/// Controls the node service through the platform service manager.
#[derive(Debug, Clone)]
pub struct ServiceCommand {
    tokens: Vec<String>,
    action: ServiceAction,
}

impl ServiceCommand {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] for a missing or unknown action.
    pub fn build(tokens: &[String], _: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let action = token(tokens, 1, USAGE)?;
        let action = ServiceAction::parse(action)
            .ok_or_else(|| ConfError::invalid(format!("service: unknown action {action}")))?;
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            action,
        }))
    }
}

impl ScriptCommand for ServiceCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let manager = ServiceManager::new(
            ctx.platform.os,
            Path::new(ctx.vars.get(NODE_BINARY_PATH)),
        );
        let exec = ctx.executor.as_ref();
        if !exec.which(manager.tool()) {
            ctx.log
                .warn(&format!("{} not found on PATH", manager.tool()));
        }

        match self.action {
            ServiceAction::Status => {
                let status = manager.status(exec)?;
                ctx.log.info(&format!(
                    "service: enabled={} running={}",
                    status.enabled, status.running
                ));
                Ok(CommandResult::Unchanged)
            }
            ServiceAction::Restart => {
                ctx.log.info("service: restart");
                if ctx.dry_run {
                    ctx.log.dry_run("would restart the node service");
                } else {
                    manager.run(ServiceAction::Restart, exec)?;
                }
                Ok(changed(ctx.dry_run))
            }
            action => {
                let unit = ServiceUnit::new(&manager, action, exec);
                let verb = action.to_string();
                let result: CommandResult =
                    process(&unit, &ProcessOpts::converge(&verb), ctx.dry_run, ctx.log.as_ref())?
                        .into();
                if result == CommandResult::Unchanged {
                    ctx.log.info(&format!("service: already {}", settled(action)));
                } else {
                    ctx.log.info(&format!("service: {action}"));
                }
                Ok(result)
            }
        }
    }
}

const fn settled(action: ServiceAction) -> &'static str {
    match action {
        ServiceAction::Enable => "enabled",
        ServiceAction::Disable => "disabled",
        ServiceAction::Start => "running",
        ServiceAction::Stop => "stopped",
        ServiceAction::Restart | ServiceAction::Status => "in state",
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;
    use crate::script::commands::test_support::{Tree, tokens};

    fn run(tree: &mut Tree, line: &str) -> CommandResult {
        ServiceCommand::build(&tokens(line), tree.layout())
            .unwrap()
            .execute(&mut tree.ctx)
            .unwrap()
    }

    #[test]
    fn rejects_unknown_action() {
        let tree = Tree::new();
        assert!(ServiceCommand::build(&tokens("service reload"), tree.layout()).is_err());
        assert!(ServiceCommand::build(&tokens("service"), tree.layout()).is_err());
    }

    #[test]
    fn status_reports_without_changes() {
        let mut tree = Tree::with_executor(MockExecutor::with_responses(vec![
            (true, String::new()),
            (true, String::new()),
        ]));
        assert_eq!(run(&mut tree, "service status"), CommandResult::Unchanged);
        assert_eq!(tree.log.info_lines(), ["service: enabled=true running=true"]);
    }

    #[test]
    fn enable_when_disabled_runs_systemctl() {
        let exec = MockExecutor::with_responses(vec![
            (false, String::new()),
            (false, String::new()),
            (true, String::new()),
        ]);
        let mut tree = Tree::with_executor(exec);
        assert_eq!(run(&mut tree, "service enable"), CommandResult::Changed);
    }

    #[test]
    fn enable_when_enabled_is_unchanged() {
        let exec = MockExecutor::with_responses(vec![(true, String::new()), (false, String::new())]);
        let mut tree = Tree::with_executor(exec);
        assert_eq!(run(&mut tree, "service enable"), CommandResult::Unchanged);
        assert_eq!(tree.log.info_lines(), ["service: already enabled"]);
    }

    #[test]
    fn dry_run_restart_does_not_call_out() {
        let mut tree = Tree::new();
        tree.ctx.dry_run = true;
        assert_eq!(run(&mut tree, "service restart"), CommandResult::WouldChange);
        assert_eq!(tree.log.dry_run_lines(), ["would restart the node service"]);
    }

    #[test]
    fn missing_tool_warns() {
        let exec = MockExecutor::with_responses(vec![]).with_which(false);
        let mut tree = Tree::with_executor(exec);
        tree.ctx.dry_run = true;
        run(&mut tree, "service restart");
        assert_eq!(tree.log.warn_lines(), ["systemctl not found on PATH"]);
    }
}
