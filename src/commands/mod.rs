//! Top-level CLI modes.
pub mod exec;
pub mod init;
pub mod vars;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::layout::Layout;
use crate::error::ConfError;
use crate::exec::SystemExecutor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::script::Context;
use crate::script::parser::Statement;
use crate::script::registry::Registry;
use crate::script::runner::{GateMode, Runner};
use crate::vars::{CONFIGS_PATH, VariableStore};

/// Exit code for a missing setup file.
pub const EXIT_SETUP_NOT_FOUND: u8 = 255;
/// Exit code for any other failure.
pub const EXIT_FAILURE: u8 = 1;

/// State shared by every mode, built once at startup.
#[derive(Debug)]
pub struct CommandSetup {
    /// Known script commands.
    pub registry: Registry,
    /// Execution context handed to the runner.
    pub ctx: Context,
    /// Conditional gating selected on the command line.
    pub gate: GateMode,
}

impl CommandSetup {
    /// Detect the platform, populate variables and resolve the install tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `--path` does not name an existing directory.
    pub fn init(args: &Cli, log: Arc<dyn Log>) -> Result<Self> {
        let platform = Platform::detect();
        let root = args
            .path
            .as_deref()
            .map(|p| {
                dunce::canonicalize(p)
                    .map_err(|e| ConfError::io(p, e))
                    .with_context(|| format!("install path {}", p.display()))
            })
            .transpose()?;

        let vars = VariableStore::populate(&platform, root.as_deref());
        let layout = Layout::new(PathBuf::from(vars.get(CONFIGS_PATH)));
        log.debug(&format!("install root: {}", layout.root().display()));

        let mut ctx = Context::new(vars, layout, platform, log, Arc::new(SystemExecutor));
        ctx.dry_run = args.dry_run;
        ctx.non_interactive = args.non_interactive;

        Ok(Self {
            registry: Registry::with_builtins(),
            ctx,
            gate: if args.strict_conditions {
                GateMode::AllFrames
            } else {
                GateMode::TopOnly
            },
        })
    }

    /// Execute parsed statements.
    ///
    /// # Errors
    ///
    /// Returns the first statement failure.
    pub fn run(&mut self, statements: &[Statement]) -> Result<()> {
        if self.ctx.dry_run {
            self.ctx.log.info("dry run: no files will be written");
        }
        self.ctx
            .log
            .debug(&format!("{} statement(s) parsed", statements.len()));
        Runner::new(self.gate).run(statements, &mut self.ctx)
    }
}

/// Process exit code for `err`.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let setup_missing = err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<ConfError>(),
            Some(ConfError::NotFound {
                what: "setup file",
                ..
            })
        )
    });
    if setup_missing {
        EXIT_SETUP_NOT_FOUND
    } else {
        EXIT_FAILURE
    }
}
