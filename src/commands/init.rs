//! `--init`: run a setup script file.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::script::parser::parse_file;

/// Run the setup file at `path`.
///
/// # Errors
///
/// Returns an error if the file is missing, a line fails to parse, or a
/// statement fails.
pub fn run(setup: &mut CommandSetup, path: &Path) -> Result<()> {
    setup
        .ctx
        .log
        .stage(&format!("Running {}", path.display()));
    let statements = parse_file(path, &setup.registry, &setup.ctx.layout)
        .with_context(|| format!("setup file {}", path.display()))?;
    setup.run(&statements)
}
