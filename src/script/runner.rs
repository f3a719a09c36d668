//! Sequential execution with the conditional stack.
use anyhow::{Context as _, Result};

use super::parser::Statement;
use super::{CommandResult, Context, Flow};
use crate::logging::RunStatus;

/// How enclosing `if` frames gate a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    /// Only the innermost frame decides; outer frames are ignored.
    #[default]
    TopOnly,
    /// Every open frame must be true.
    AllFrames,
}

#[derive(Debug, Clone)]
struct Frame {
    result: bool,
    text: String,
}

/// Executes statements left to right, exactly once each.
///
/// There is no rollback: when a statement fails, earlier changes stay and
/// the error is returned.
#[derive(Debug, Default)]
pub struct Runner {
    gate: GateMode,
    stack: Vec<Frame>,
}

impl Runner {
    /// Create a runner with the given gating mode.
    #[must_use]
    pub const fn new(gate: GateMode) -> Self {
        Self {
            gate,
            stack: Vec::new(),
        }
    }

    fn gate_open(&self) -> bool {
        match self.gate {
            GateMode::TopOnly => self.stack.last().is_none_or(|f| f.result),
            GateMode::AllFrames => self.stack.iter().all(|f| f.result),
        }
    }

    fn trace_stack(&self, ctx: &Context) {
        if self.stack.is_empty() {
            ctx.log.debug("condition stack: empty");
            return;
        }
        for (depth, frame) in self.stack.iter().enumerate().rev() {
            ctx.log.debug(&format!(
                "condition stack[{depth}]: {} => {}",
                frame.text, frame.result
            ));
        }
    }

    /// Run `statements` in order.
    ///
    /// # Errors
    ///
    /// Returns the first statement failure, prefixed with its line.
    pub fn run(&mut self, statements: &[Statement], ctx: &mut Context) -> Result<()> {
        for statement in statements {
            let repr = statement.command.represent();
            match statement.command.flow() {
                Flow::Open => {
                    let result = match self.execute(statement, &repr, ctx)? {
                        CommandResult::Condition(value) => value,
                        _ => true,
                    };
                    self.stack.push(Frame { result, text: repr });
                    self.trace_stack(ctx);
                }
                Flow::Close => {
                    self.execute(statement, &repr, ctx)?;
                    self.stack.pop();
                    self.trace_stack(ctx);
                }
                Flow::Action if !self.gate_open() => {
                    ctx.log.debug(&format!("skip line {}: {repr}", statement.line));
                    ctx.log
                        .record(&repr, RunStatus::Skipped, Some("condition not met"));
                }
                Flow::Action => {
                    let result = self.execute(statement, &repr, ctx)?;
                    let message = match &result {
                        CommandResult::Skipped(reason) => Some(reason.as_str()),
                        _ => None,
                    };
                    ctx.log.record(&repr, result.status(), message);
                }
            }
        }
        if let Some(frame) = self.stack.last() {
            ctx.log.warn(&format!(
                "{} unclosed condition(s) at end of script, innermost: {}",
                self.stack.len(),
                frame.text
            ));
        }
        Ok(())
    }

    fn execute(
        &self,
        statement: &Statement,
        repr: &str,
        ctx: &mut Context,
    ) -> Result<CommandResult> {
        ctx.log.debug(&format!("line {}: {repr}", statement.line));
        match statement.command.execute(ctx) {
            Ok(result) => Ok(result),
            Err(e) => {
                ctx.log
                    .record(repr, RunStatus::Failed, Some(&format!("{e:#}")));
                Err(e).with_context(|| format!("setup line {} <<{repr}>>", statement.line))
            }
        }
    }
}
