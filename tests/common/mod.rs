// Shared helpers for integration tests.
//
// Provides a temporary install tree laid out like a node installation, a
// fluent builder to seed it, and an in-memory `Log` so each test can run
// scripts end to end and assert on files and output.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use confctl::config::layout::{ConfigState, Layout, NODE_CONFIG};
use confctl::error::ConfError;
use confctl::exec::SystemExecutor;
use confctl::logging::{Log, RunEntry, RunStatus};
use confctl::platform::{Os, Platform};
use confctl::script::parser::{parse_inline, parse_script};
use confctl::script::registry::Registry;
use confctl::script::runner::{GateMode, Runner};
use confctl::script::Context;
use confctl::vars::VariableStore;

/// Captures every message by kind, in order.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(&'static str, String)>>,
    entries: Mutex<Vec<RunEntry>>,
}

impl RecordingLog {
    fn push(&self, kind: &'static str, msg: &str) {
        self.lines
            .lock()
            .expect("log lock")
            .push((kind, msg.to_string()));
    }

    /// Messages of `kind` (`info`, `warn`, `debug`, `dry_run`, ...).
    pub fn lines(&self, kind: &str) -> Vec<String> {
        self.lines
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Operator-facing output: info and warn lines, tagged.
    pub fn operator_output(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("log lock")
            .iter()
            .filter(|(k, _)| matches!(*k, "info" | "warn" | "error"))
            .map(|(k, m)| format!("{k}: {m}"))
            .collect()
    }

    /// Recorded statement results.
    pub fn entries(&self) -> Vec<RunEntry> {
        self.entries.lock().expect("log lock").clone()
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
    fn record(&self, name: &str, status: RunStatus, message: Option<&str>) {
        self.entries.lock().expect("log lock").push(RunEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}

/// An isolated node install tree backed by a [`tempfile::TempDir`].
pub struct InstallTree {
    /// Temporary directory holding `etc/` and `share/`.
    pub root: tempfile::TempDir,
    /// Path resolution for the tree.
    pub layout: Layout,
}

impl InstallTree {
    /// Path of the `state` file of config `name`.
    pub fn path(&self, name: &str, state: ConfigState) -> PathBuf {
        self.layout.config_path(name, state)
    }

    /// Read the `state` file of config `name`.
    pub fn read(&self, name: &str, state: ConfigState) -> String {
        std::fs::read_to_string(self.path(name, state)).expect("read config")
    }

    /// Read the live node config.
    pub fn node_config(&self) -> String {
        self.read(NODE_CONFIG, ConfigState::On)
    }

    /// Lock file used by runs in this tree.
    pub fn lock_path(&self) -> PathBuf {
        self.root.path().join("write.lock")
    }

    /// Every file under the tree with its content, sorted by path.
    ///
    /// The lock file is left out: it persists after the first write.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut out = Vec::new();
        collect(self.root.path(), self.root.path(), &mut out);
        out.retain(|(path, _)| self.root.path().join(path) != self.lock_path());
        out.sort();
        out
    }

    /// A context for this tree.
    pub fn context(&self, log: &Arc<RecordingLog>, dry_run: bool) -> Context {
        let mut vars = VariableStore::new();
        vars.set("HOST_OS", "Linux");
        vars.set("HOSTNAME", "node-1");
        vars.set("CONFIGS_PATH", self.root.path().display().to_string());
        let mut ctx = Context::new(
            vars,
            self.layout.clone(),
            Platform::new(Os::Linux),
            Arc::clone(log) as Arc<dyn Log>,
            Arc::new(SystemExecutor),
        )
        .with_lock_path(self.lock_path());
        ctx.dry_run = dry_run;
        ctx
    }

    /// Parse and run `script`, returning the log.
    pub fn run_script(&self, script: &str, dry_run: bool) -> Arc<RecordingLog> {
        let log = Arc::new(RecordingLog::default());
        self.try_run_script(script, dry_run, &log)
            .expect("script runs");
        log
    }

    /// Parse and run `script` with `log`.
    pub fn try_run_script(
        &self,
        script: &str,
        dry_run: bool,
        log: &Arc<RecordingLog>,
    ) -> anyhow::Result<()> {
        let mut ctx = self.context(log, dry_run);
        let statements = parse_script(script, &Registry::with_builtins(), &self.layout)?;
        Runner::new(GateMode::TopOnly).run(&statements, &mut ctx)
    }

    /// Parse and run inline tokens.
    pub fn run_inline(&self, line: &str) -> Result<Arc<RecordingLog>, ConfError> {
        let log = Arc::new(RecordingLog::default());
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        let statements = parse_inline(&tokens, &Registry::with_builtins(), &self.layout)?;
        let mut ctx = self.context(&log, false);
        Runner::default()
            .run(&statements, &mut ctx)
            .expect("inline script runs");
        Ok(log)
    }
}

fn collect(base: &Path, dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            collect(base, &path, out);
        } else {
            let rel = path.strip_prefix(base).expect("under base").to_path_buf();
            out.push((rel, std::fs::read_to_string(&path).unwrap_or_default()));
        }
    }
}

/// Fluent builder for [`InstallTree`].
pub struct InstallTreeBuilder {
    tree: InstallTree,
}

impl InstallTreeBuilder {
    /// Begin with empty `etc/network/` and `share/configs/network/` dirs.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let layout = Layout::new(root.path());
        std::fs::create_dir_all(layout.network_dir()).expect("create network dir");
        std::fs::create_dir_all(layout.network_template_dir()).expect("create template dir");
        Self {
            tree: InstallTree { root, layout },
        }
    }

    fn write(self, name: &str, state: ConfigState, content: &str) -> Self {
        let path = self.tree.path(name, state);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(path, content).expect("write config");
        self
    }

    /// Ship the node config template.
    pub fn with_node_template(self, content: &str) -> Self {
        self.write(NODE_CONFIG, ConfigState::Template, content)
    }

    /// Write the live node config.
    pub fn with_node_config(self, content: &str) -> Self {
        self.write(NODE_CONFIG, ConfigState::On, content)
    }

    /// Ship a network template.
    pub fn with_network_template(self, name: &str, content: &str) -> Self {
        self.write(name, ConfigState::Template, content)
    }

    /// Write the enabled or disabled file of a network.
    pub fn with_network(self, name: &str, state: ConfigState, content: &str) -> Self {
        self.write(name, state, content)
    }

    /// Finish building.
    pub fn build(self) -> InstallTree {
        self.tree
    }
}
