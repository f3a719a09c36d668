//! `--exec`: run inline statements.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::script::parser::parse_inline;

/// Run inline statements separated by `and`.
///
/// # Errors
///
/// Returns an error if a statement fails to parse or to execute.
pub fn run(setup: &mut CommandSetup, tokens: &[String]) -> Result<()> {
    setup.ctx.log.stage("Running inline script");
    let statements = parse_inline(tokens, &setup.registry, &setup.ctx.layout)
        .context("inline script")?;
    setup.run(&statements)
}
