//! Turning setup files and inline `--exec` strings into statements.
//!
//! Every statement is built up front; a single invalid line rejects the
//! whole script before anything executes.
use std::fs;
use std::path::Path;

use super::registry::Registry;
use super::{Flow, ScriptCommand};
use crate::config::ini::strip_comment;
use crate::config::layout::Layout;
use crate::error::ConfError;

/// Token separating statements of an inline script.
pub const INLINE_SEPARATOR: &str = "and";

/// A built command with the 1-based line (or statement) it came from.
#[derive(Debug)]
pub struct Statement {
    /// Source line, or statement index for inline scripts.
    pub line: usize,
    /// The command.
    pub command: Box<dyn ScriptCommand>,
}

/// Tracks `if`/`endif` nesting while parsing.
#[derive(Debug, Default)]
struct Nesting {
    depth: usize,
}

impl Nesting {
    fn check(&mut self, command: &dyn ScriptCommand) -> Result<(), ConfError> {
        match command.flow() {
            Flow::Open => self.depth += 1,
            Flow::Close => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| ConfError::invalid("endif without matching if"))?;
            }
            Flow::Action => {}
        }
        Ok(())
    }
}

fn build_statement(
    line: usize,
    tokens: &[String],
    registry: &Registry,
    layout: &Layout,
    nesting: &mut Nesting,
) -> Result<Statement, ConfError> {
    let wrap = |source: ConfError| ConfError::Parse {
        line,
        text: tokens.join(" "),
        source: Box::new(source),
    };
    let command = registry.build(tokens, layout).map_err(wrap)?;
    nesting.check(command.as_ref()).map_err(wrap)?;
    Ok(Statement { line, command })
}

/// Parse setup script text.
///
/// `#` starts a comment, blank lines are ignored and tokens are separated
/// by whitespace.
///
/// # Errors
///
/// Returns [`ConfError::Parse`] naming the first line that fails to build.
pub fn parse_script(
    text: &str,
    registry: &Registry,
    layout: &Layout,
) -> Result<Vec<Statement>, ConfError> {
    let mut nesting = Nesting::default();
    let mut statements = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let tokens: Vec<String> = strip_comment(raw)
            .split_whitespace()
            .map(String::from)
            .collect();
        if tokens.is_empty() {
            continue;
        }
        statements.push(build_statement(
            idx + 1,
            &tokens,
            registry,
            layout,
            &mut nesting,
        )?);
    }
    Ok(statements)
}

/// Read and parse the setup file at `path`.
///
/// # Errors
///
/// Returns [`ConfError::NotFound`] if the file does not exist,
/// [`ConfError::Io`] if it cannot be read, and [`ConfError::Parse`] for an
/// invalid line.
pub fn parse_file(
    path: &Path,
    registry: &Registry,
    layout: &Layout,
) -> Result<Vec<Statement>, ConfError> {
    if !path.is_file() {
        return Err(ConfError::NotFound {
            what: "setup file",
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| ConfError::io(path, e))?;
    parse_script(&text, registry, layout)
}

/// Split inline tokens into statements on the literal `and` token.
///
/// Empty statements (leading, trailing or doubled separators) are kept so
/// that statement numbers match what the operator typed.
#[must_use]
pub fn split_inline(tokens: &[String]) -> Vec<Vec<String>> {
    tokens
        .split(|t| t == INLINE_SEPARATOR)
        .map(<[String]>::to_vec)
        .collect()
}

/// Parse an inline script; statements are numbered from 1.
///
/// # Errors
///
/// Returns [`ConfError::Parse`] naming the first statement that fails to
/// build.
pub fn parse_inline(
    tokens: &[String],
    registry: &Registry,
    layout: &Layout,
) -> Result<Vec<Statement>, ConfError> {
    let mut nesting = Nesting::default();
    let mut statements = Vec::new();
    for (idx, part) in split_inline(tokens).iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        statements.push(build_statement(
            idx + 1,
            part,
            registry,
            layout,
            &mut nesting,
        )?);
    }
    Ok(statements)
}
