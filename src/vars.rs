//! Variable store and `${NAME}` placeholder substitution.
//!
//! The store is populated once from host facts before a script is parsed,
//! then passed by reference to every command. `var NAME=VALUE` statements
//! are the only run-time writers.
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::platform::{self, Platform};

/// Operating system family (`Linux`, `MacOS`, `Windows`).
pub const HOST_OS: &str = "HOST_OS";
/// Host name of the machine.
pub const HOSTNAME: &str = "HOSTNAME";
/// Root of the node installation tree.
pub const CONFIGS_PATH: &str = "CONFIGS_PATH";
/// Directory holding the node executable.
pub const NODE_BINARY_PATH: &str = "NODE_BINARY_PATH";

#[allow(clippy::expect_used)] // compile-time literal
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// Name → value mapping consulted by placeholder substitution.
///
/// Ordered so that `--vars` dumps are stable.
///
/// # Examples
///
/// ```
/// use confctl::vars::VariableStore;
///
/// let mut vars = VariableStore::new();
/// vars.set("DB_DRIVER", "mdbx");
/// assert_eq!(vars.substitute("driver=${DB_DRIVER}"), "driver=mdbx");
/// assert_eq!(vars.substitute("${UNKNOWN}"), "${UNKNOWN}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    vars: BTreeMap<String, String>,
}

impl VariableStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the store with host facts.
    ///
    /// `install_root` overrides the platform default for `CONFIGS_PATH`.
    #[must_use]
    pub fn populate(platform: &Platform, install_root: Option<&Path>) -> Self {
        let mut vars = Self::new();
        vars.set(HOST_OS, platform.os.to_string());
        vars.set(HOSTNAME, platform::hostname());
        let root = install_root.map_or_else(|| platform.default_install_root(), Path::to_path_buf);
        vars.set(CONFIGS_PATH, root.display().to_string());
        vars.set(
            NODE_BINARY_PATH,
            platform.node_binary_dir().display().to_string(),
        );
        vars
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Current value of `name`, or the empty string when unset.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.vars.get(name).map_or("", String::as_str)
    }

    /// Whether `name` has an entry (possibly empty).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace every `${NAME}` whose name is known with its value.
    ///
    /// Unknown placeholders are left verbatim. The input is scanned once,
    /// so text introduced by a substituted value is never expanded again.
    #[must_use]
    pub fn substitute(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                caps.get(1)
                    .and_then(|name| self.vars.get(name.as_str()))
                    .map_or_else(|| whole.to_string(), Clone::clone)
            })
            .into_owned()
    }
}

/// Whether a config value counts as "not meaningfully set".
///
/// Empty values and unresolved `${...}` placeholders qualify; `default`
/// actions overwrite them.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    value.is_empty() || (value.starts_with('$') && value.ends_with('}'))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::Os;

    fn store() -> VariableStore {
        let mut vars = VariableStore::new();
        vars.set("HOST_OS", "Linux");
        vars.set("HOSTNAME", "node-1");
        vars
    }

    #[test]
    fn get_unset_returns_empty() {
        assert_eq!(store().get("NOPE"), "");
        assert!(!store().contains("NOPE"));
    }

    #[test]
    fn set_overwrites() {
        let mut vars = store();
        vars.set("HOSTNAME", "node-2");
        assert_eq!(vars.get("HOSTNAME"), "node-2");
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        assert_eq!(
            store().substitute("${HOSTNAME}.${HOST_OS}.${HOSTNAME}"),
            "node-1.Linux.node-1"
        );
    }

    #[test]
    fn substitute_leaves_unknown_placeholders() {
        assert_eq!(store().substitute("a=${MISSING} b"), "a=${MISSING} b");
    }

    #[test]
    fn substitute_ignores_bare_dollar_names() {
        assert_eq!(store().substitute("$HOST_OS"), "$HOST_OS");
    }

    #[test]
    fn substitute_handles_regex_metacharacters_in_values() {
        let mut vars = VariableStore::new();
        vars.set("P", "$1 ${0} \\d+");
        assert_eq!(vars.substitute("x=${P}"), "x=$1 ${0} \\d+");
    }

    #[test]
    fn substitute_is_single_pass() {
        let mut vars = VariableStore::new();
        vars.set("A", "${B}");
        vars.set("B", "b");
        assert_eq!(vars.substitute("${A}"), "${B}");
    }

    #[test]
    fn substitute_twice_equals_once() {
        let vars = store();
        let once = vars.substitute("host=${HOSTNAME} os=${HOST_OS} x=${X}");
        assert_eq!(vars.substitute(&once), once);
    }

    #[test]
    fn populate_sets_host_facts() {
        let vars = VariableStore::populate(&Platform::new(Os::Linux), None);
        assert_eq!(vars.get(HOST_OS), "Linux");
        assert_eq!(vars.get(CONFIGS_PATH), "/opt/cellframe-node");
        assert_eq!(vars.get(NODE_BINARY_PATH), "/opt/cellframe-node/bin");
        assert!(vars.contains(HOSTNAME));
    }

    #[test]
    fn populate_honours_install_root_override() {
        let vars = VariableStore::populate(
            &Platform::new(Os::Linux),
            Some(Path::new("/srv/node")),
        );
        assert_eq!(vars.get(CONFIGS_PATH), "/srv/node");
    }

    #[test]
    fn iter_is_sorted_by_name() {
        let store = store();
        let names: Vec<&str> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["HOSTNAME", "HOST_OS"]);
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("${HOSTNAME}"));
        assert!(!is_placeholder("true"));
        assert!(!is_placeholder("$5"));
        assert!(!is_placeholder("{x}"));
    }
}
