//! `config <name> <group> <param> default|ensure|get [value...]`
use anyhow::{Context as _, Result};

use super::{Mode, changed, live_path, token};
use crate::config::file::ConfigFile;
use crate::config::layout::Layout;
use crate::error::ConfError;
use crate::script::{CommandResult, Context, ScriptCommand};
use crate::vars::is_placeholder;

const USAGE: &str = "config <name> <group> <param> default|ensure|get [value]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Set(Mode),
    Get,
}

/// Reads or sets one parameter of a live config file.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    tokens: Vec<String>,
    name: String,
    group: String,
    param: String,
    action: Action,
    value: String,
}

impl ConfigCommand {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] when tokens are missing, the
    /// action is unknown, or `name` is neither the node config nor a network
    /// with a template.
    pub fn build(tokens: &[String], layout: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let name = token(tokens, 1, USAGE)?;
        let group = token(tokens, 2, USAGE)?;
        let param = token(tokens, 3, USAGE)?;
        let action_token = token(tokens, 4, USAGE)?;

        if !layout.is_known_config(name) {
            return Err(ConfError::invalid(format!(
                "config_cmd: config for [{name}] does not exist"
            )));
        }
        let action = match action_token {
            "get" => Action::Get,
            other => Action::Set(Mode::parse(other).ok_or_else(|| {
                ConfError::invalid(format!(
                    "config_cmd: allowed actions are get|ensure|default, not {other}"
                ))
            })?),
        };

        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            name: name.to_string(),
            group: group.to_string(),
            param: param.to_string(),
            action,
            value: tokens.get(5..).unwrap_or_default().join(" "),
        }))
    }
}

impl ScriptCommand for ConfigCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let path = live_path(&ctx.layout, &self.name, ctx.log.as_ref());
        let mut cfg = ConfigFile::load(&path)
            .with_context(|| format!("config [{}]", self.name))?;
        let tag = format!("[{}] [{}]", self.name, self.group);

        let mode = match self.action {
            Action::Get => {
                let value = cfg.get(&self.group, &self.param).unwrap_or_default();
                ctx.log
                    .info(&format!("{}: [{}] {}={value}", self.name, self.group, self.param));
                return Ok(CommandResult::Unchanged);
            }
            Action::Set(mode) => mode,
        };

        if mode == Mode::Default
            && let Some(current) = cfg.get(&self.group, &self.param)
            && !is_placeholder(&current)
        {
            ctx.log.info(&format!(
                "{tag} {}=={current}, skip altering",
                self.param
            ));
            return Ok(CommandResult::Skipped(format!("already set to {current}")));
        }

        let value = ctx.vars.substitute(&self.value);
        if !cfg.set(&self.group, &self.param, &value) {
            ctx.log
                .debug(&format!("{tag} {}={value} already", self.param));
            return Ok(CommandResult::Unchanged);
        }
        ctx.log.info(&format!("{tag} set {}={value}", self.param));
        cfg.save(&ctx.save_options(), ctx.log.as_ref())
            .with_context(|| format!("save config [{}]", self.name))?;
        Ok(changed(ctx.dry_run))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::layout::{ConfigState, NODE_CONFIG};
    use crate::script::commands::test_support::{Tree, tokens};

    fn command(tree: &Tree, line: &str) -> Box<dyn ScriptCommand> {
        ConfigCommand::build(&tokens(line), tree.layout()).unwrap()
    }

    fn run(tree: &mut Tree, line: &str) -> CommandResult {
        command(tree, line).execute(&mut tree.ctx).unwrap()
    }

    fn node(tree: &Tree) -> String {
        tree.read(NODE_CONFIG, ConfigState::On)
    }

    #[test]
    fn rejects_short_statements() {
        let tree = Tree::new();
        let err = ConfigCommand::build(&tokens("config cellframe-node general"), tree.layout())
            .unwrap_err();
        assert!(err.to_string().contains("usage: config"));
    }

    #[test]
    fn rejects_unknown_action() {
        let tree = Tree::new();
        let err = ConfigCommand::build(
            &tokens("config cellframe-node general auto_online set true"),
            tree.layout(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn rejects_network_without_template() {
        let tree = Tree::new();
        assert!(
            ConfigCommand::build(
                &tokens("config kelvpn general node-role default full"),
                tree.layout()
            )
            .is_err()
        );
    }

    #[test]
    fn default_appends_missing_param_to_group() {
        let mut tree = Tree::new();
        tree.node_config("[general]\n");
        let got = run(&mut tree, "config cellframe-node general auto_online default true");
        assert_eq!(got, CommandResult::Changed);
        insta::assert_snapshot!(node(&tree), @r"
        [general]
        auto_online=true
        ");
    }

    #[test]
    fn default_is_idempotent() {
        let mut tree = Tree::new();
        tree.node_config("[general]\n");
        let line = "config cellframe-node general auto_online default true";
        run(&mut tree, line);
        let first = node(&tree);
        let second = run(&mut tree, line);
        assert!(matches!(second, CommandResult::Skipped(_)));
        assert_eq!(node(&tree), first);
    }

    #[test]
    fn default_keeps_operator_value() {
        let mut tree = Tree::new();
        tree.node_config("[general]\nauto_online=false\n");
        run(&mut tree, "config cellframe-node general auto_online default true");
        assert_eq!(node(&tree), "[general]\nauto_online=false\n");
        assert_eq!(
            tree.log.info_lines(),
            ["[cellframe-node] [general] auto_online==false, skip altering"]
        );
    }

    #[test]
    fn default_replaces_placeholder() {
        let mut tree = Tree::new();
        tree.node_config("[server]\nlisten_address=${LISTEN}\n");
        run(&mut tree, "config cellframe-node server listen_address default 127.0.0.1");
        assert_eq!(node(&tree), "[server]\nlisten_address=127.0.0.1\n");
    }

    #[test]
    fn ensure_overwrites_and_substitutes() {
        let mut tree = Tree::new();
        tree.node_config("[general]\nname=old\n");
        run(&mut tree, "config cellframe-node general name ensure ${HOSTNAME}");
        assert_eq!(node(&tree), "[general]\nname=node-1\n");
    }

    #[test]
    fn ensure_with_same_value_does_not_save() {
        let mut tree = Tree::new();
        tree.node_config("[general]\nname=node-1\n");
        let got = run(&mut tree, "config cellframe-node general name ensure node-1");
        assert_eq!(got, CommandResult::Unchanged);
    }

    #[test]
    fn ensure_creates_missing_group() {
        let mut tree = Tree::new();
        tree.node_config("[general]\nauto_online=true\n");
        run(&mut tree, "config cellframe-node global_db driver ensure mdbx");
        insta::assert_snapshot!(node(&tree), @r"
        [general]
        auto_online=true

        [global_db]
        driver=mdbx
        ");
    }

    #[test]
    fn get_reports_value_without_writing() {
        let mut tree = Tree::new();
        tree.node_config("[general]\nauto_online=true\n");
        let got = run(&mut tree, "config cellframe-node general auto_online get");
        assert_eq!(got, CommandResult::Unchanged);
        assert_eq!(tree.log.info_lines(), ["cellframe-node: [general] auto_online=true"]);
    }

    #[test]
    fn network_config_prefers_enabled_file_when_both_exist() {
        let mut tree = Tree::new();
        tree.write("kelvpn", ConfigState::Template, "[general]\n");
        tree.write("kelvpn", ConfigState::On, "[general]\n");
        tree.write("kelvpn", ConfigState::Off, "[general]\n");
        run(&mut tree, "config kelvpn general node-role ensure full");
        assert_eq!(tree.read("kelvpn", ConfigState::On), "[general]\nnode-role=full\n");
        assert_eq!(tree.read("kelvpn", ConfigState::Off), "[general]\n");
        assert_eq!(tree.log.warn_lines().len(), 1);
    }

    #[test]
    fn network_config_edits_disabled_file() {
        let mut tree = Tree::new();
        tree.write("kelvpn", ConfigState::Template, "[general]\n");
        tree.write("kelvpn", ConfigState::Off, "[general]\n");
        run(&mut tree, "config kelvpn general node-role default full");
        assert_eq!(tree.read("kelvpn", ConfigState::Off), "[general]\nnode-role=full\n");
    }

    #[test]
    fn dry_run_leaves_file_alone() {
        let mut tree = Tree::new();
        tree.node_config("[general]\n");
        tree.ctx.dry_run = true;
        let got = run(&mut tree, "config cellframe-node general auto_online default true");
        assert_eq!(got, CommandResult::WouldChange);
        assert_eq!(node(&tree), "[general]\n");
        assert!(tree.log.dry_run_lines().contains(&"  auto_online=true".to_string()));
    }

    #[test]
    fn missing_live_file_is_an_error() {
        let mut tree = Tree::new();
        let cmd = command(&tree, "config cellframe-node general auto_online default true");
        assert!(cmd.execute(&mut tree.ctx).is_err());
    }
}
