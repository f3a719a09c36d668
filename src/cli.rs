//! Command-line surface: flags and the mode they select.
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Top-level CLI entry point for the node configuration tool.
#[derive(Parser, Debug)]
#[command(
    name = "cellframe-node-config",
    about = "Converge cellframe-node configuration files from a setup script",
    version,
    group(ArgGroup::new("mode").args(["init", "exec", "vars"]))
)]
pub struct Cli {
    /// Execute a setup script file
    #[arg(short, long, value_name = "SETUP_FILE")]
    pub init: Option<PathBuf>,

    /// Execute an inline script; statements are separated by `and`
    #[arg(
        short,
        long,
        num_args = 1..,
        allow_hyphen_values = true,
        value_name = "TOKENS"
    )]
    pub exec: Option<Vec<String>>,

    /// Print the resolved variables and exit
    #[arg(short = 's', long)]
    pub vars: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without writing anything
    #[arg(short = 'd', long = "dryrun", visible_alias = "dry-run")]
    pub dry_run: bool,

    /// Never prompt
    #[arg(short, long)]
    pub non_interactive: bool,

    /// Override the detected node install root
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Require every enclosing `if` to hold, not just the innermost one
    #[arg(long)]
    pub strict_conditions: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Run a setup file.
    Init(PathBuf),
    /// Run inline statements.
    Exec(Vec<String>),
    /// Dump the variable store.
    Vars,
}

impl Mode {
    /// Short name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Exec(_) => "exec",
            Self::Vars => "vars",
        }
    }
}

impl Cli {
    /// The selected mode, if any.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        if let Some(path) = &self.init {
            return Some(Mode::Init(path.clone()));
        }
        if let Some(tokens) = &self.exec {
            return Some(Mode::Exec(tokens.clone()));
        }
        self.vars.then_some(Mode::Vars)
    }
}
