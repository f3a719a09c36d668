//! Command name → constructor mapping.
use std::collections::BTreeMap;

use super::ScriptCommand;
use super::commands::{condition, config, net_list, network, service, template, var};
use crate::config::layout::Layout;
use crate::error::ConfError;

/// Builds a command from its tokens (the first token is the command name).
pub type Factory = fn(&[String], &Layout) -> Result<Box<dyn ScriptCommand>, ConfError>;

/// Known script commands.
///
/// # Examples
///
/// ```
/// use confctl::config::layout::Layout;
/// use confctl::script::registry::Registry;
///
/// let registry = Registry::with_builtins();
/// assert!(registry.names().any(|n| n == "config"));
///
/// let layout = Layout::new("/nonexistent");
/// assert!(registry.build(&["bogus".to_string()], &layout).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    factories: BTreeMap<&'static str, Factory>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("config", config::ConfigCommand::build);
        registry.register("network", network::NetworkCommand::build);
        registry.register("fromtemplate", template::FromTemplateCommand::build);
        registry.register("if", condition::ConditionOpen::build);
        registry.register("endif", condition::ConditionClose::build);
        registry.register("var", var::VarCommand::build);
        registry.register("net_list", net_list::NetListCommand::build);
        registry.register("service", service::ServiceCommand::build);
        registry
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &'static str, factory: Factory) {
        self.factories.insert(name, factory);
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Build the command named by the first of `tokens`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] for an empty token list or an
    /// unknown command, and whatever the command's factory rejects.
    pub fn build(
        &self,
        tokens: &[String],
        layout: &Layout,
    ) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let name = tokens
            .first()
            .ok_or_else(|| ConfError::invalid("empty statement"))?;
        let factory = self
            .factories
            .get(name.as_str())
            .ok_or_else(|| ConfError::invalid(format!("unknown command '{name}'")))?;
        factory(tokens, layout)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::script::Flow;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn builtins_are_registered() {
        let names: Vec<_> = Registry::with_builtins().names().collect();
        assert_eq!(
            names,
            [
                "config",
                "endif",
                "fromtemplate",
                "if",
                "net_list",
                "network",
                "service",
                "var"
            ]
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let err = Registry::with_builtins()
            .build(&tokens("bogus a b"), &Layout::new("/x"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown command 'bogus'"));
    }

    #[test]
    fn builds_condition_pair() {
        let registry = Registry::with_builtins();
        let layout = Layout::new("/x");
        let open = registry.build(&tokens("if ${HOST_OS} == Linux"), &layout).unwrap();
        let close = registry.build(&tokens("endif"), &layout).unwrap();
        assert_eq!(open.flow(), Flow::Open);
        assert_eq!(close.flow(), Flow::Close);
        assert_eq!(open.represent(), "if ${HOST_OS} == Linux");
    }

    #[test]
    fn custom_factory_can_be_registered() {
        fn endif_alias(t: &[String], l: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
            condition::ConditionClose::build(t, l)
        }
        let mut registry = Registry::new();
        registry.register("fi", endif_alias);
        assert!(registry.build(&tokens("fi"), &Layout::new("/x")).is_ok());
        assert!(registry.build(&tokens("endif"), &Layout::new("/x")).is_err());
    }
}
