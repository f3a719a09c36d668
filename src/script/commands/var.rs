//! `var NAME=VALUE`
use anyhow::Result;

use crate::config::layout::Layout;
use crate::error::ConfError;
use crate::script::{CommandResult, Context, ScriptCommand};

/// Sets a variable for the rest of the script.
///
/// The value may be empty and is expanded when the statement runs, so
/// `var B=${A}` captures the current value of `A`.
#[derive(Debug, Clone)]
pub struct VarCommand {
    tokens: Vec<String>,
    name: String,
    value: String,
}

impl VarCommand {
    /// Build from statement tokens; tokens after `var` are joined by spaces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] when `=` is missing or the
    /// name is empty.
    pub fn build(tokens: &[String], _: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let assignment = tokens.get(1..).unwrap_or_default().join(" ");
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfError::invalid("usage: var NAME=VALUE"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfError::invalid("var: empty variable name"));
        }
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            name: name.to_string(),
            value: value.trim().to_string(),
        }))
    }
}

impl ScriptCommand for VarCommand {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let value = ctx.vars.substitute(&self.value);
        ctx.log.debug(&format!("var {}={value}", self.name));
        ctx.vars.set(self.name.clone(), value);
        Ok(CommandResult::Unchanged)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::script::commands::test_support::{Tree, tokens};

    fn run(tree: &mut Tree, line: &str) {
        VarCommand::build(&tokens(line), tree.layout())
            .unwrap()
            .execute(&mut tree.ctx)
            .unwrap();
    }

    #[test]
    fn sets_and_expands() {
        let mut tree = Tree::new();
        run(&mut tree, "var NODE=${HOSTNAME}-main");
        assert_eq!(tree.ctx.vars.get("NODE"), "node-1-main");
    }

    #[test]
    fn empty_value_is_allowed() {
        let mut tree = Tree::new();
        run(&mut tree, "var EMPTY=");
        assert!(tree.ctx.vars.contains("EMPTY"));
        assert_eq!(tree.ctx.vars.get("EMPTY"), "");
    }

    #[test]
    fn value_keeps_inner_spaces() {
        let mut tree = Tree::new();
        run(&mut tree, "var GREETING=hello   world");
        assert_eq!(tree.ctx.vars.get("GREETING"), "hello world");
    }

    #[test]
    fn rejects_malformed_assignments() {
        let tree = Tree::new();
        assert!(VarCommand::build(&tokens("var NAME"), tree.layout()).is_err());
        assert!(VarCommand::build(&tokens("var =x"), tree.layout()).is_err());
        assert!(VarCommand::build(&tokens("var"), tree.layout()).is_err());
    }
}
