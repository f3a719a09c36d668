//! `if <a> == <b>`, `if <a> != <b>`, `if <a>` and `endif`
use std::fmt;

use anyhow::Result;

use crate::config::layout::Layout;
use crate::error::ConfError;
use crate::script::{CommandResult, Context, Flow, ScriptCommand};

/// Comparison performed by an `if`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    /// `a == b`
    Equal,
    /// `a != b`
    NotEqual,
    /// `if a` alone: true when `a` expands to the empty string.
    IsUnset,
}

impl fmt::Display for ConditionOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::IsUnset => "is empty",
        })
    }
}

/// Opens a conditional block.
///
/// Tokens after `if` are joined without separators before the operator is
/// located, so `if ${A}==x` and `if ${A} == x` are the same condition.
#[derive(Debug, Clone)]
pub struct ConditionOpen {
    tokens: Vec<String>,
    op: ConditionOp,
    lhs: String,
    rhs: String,
}

impl ConditionOpen {
    /// Build from statement tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ConfError::InvalidArgument`] for an empty condition, more
    /// than one operator, or an operator without a left operand.
    pub fn build(tokens: &[String], _: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        let joined = tokens.get(1..).unwrap_or_default().concat();
        let (op, lhs, rhs) = parse_condition(&joined)?;
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
            op,
            lhs,
            rhs,
        }))
    }

    /// The comparison.
    #[must_use]
    pub const fn op(&self) -> ConditionOp {
        self.op
    }
}

fn parse_condition(joined: &str) -> Result<(ConditionOp, String, String), ConfError> {
    let ops = joined.matches("==").count() + joined.matches("!=").count();
    if ops > 1 {
        return Err(ConfError::invalid(
            "condition takes exactly two operands around one of == or !=",
        ));
    }
    if let Some((lhs, rhs)) = joined.split_once("==") {
        return binary(ConditionOp::Equal, lhs, rhs);
    }
    if let Some((lhs, rhs)) = joined.split_once("!=") {
        return binary(ConditionOp::NotEqual, lhs, rhs);
    }
    if joined.is_empty() {
        return Err(ConfError::invalid("condition requires a value to check"));
    }
    Ok((ConditionOp::IsUnset, joined.to_string(), String::new()))
}

fn binary(op: ConditionOp, lhs: &str, rhs: &str) -> Result<(ConditionOp, String, String), ConfError> {
    if lhs.is_empty() {
        return Err(ConfError::invalid(format!("condition has no left operand for {op}")));
    }
    Ok((op, lhs.to_string(), rhs.to_string()))
}

impl ScriptCommand for ConditionOpen {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn flow(&self) -> Flow {
        Flow::Open
    }

    fn execute(&self, ctx: &mut Context) -> Result<CommandResult> {
        let lhs = ctx.vars.substitute(&self.lhs);
        let rhs = ctx.vars.substitute(&self.rhs);
        let result = match self.op {
            ConditionOp::Equal => lhs == rhs,
            ConditionOp::NotEqual => lhs != rhs,
            ConditionOp::IsUnset => lhs.is_empty(),
        };
        ctx.log.debug(&format!(
            "condition: '{lhs}' {} '{rhs}' -> {result}",
            self.op
        ));
        Ok(CommandResult::Condition(result))
    }
}

/// Closes the innermost conditional block.
#[derive(Debug, Clone)]
pub struct ConditionClose {
    tokens: Vec<String>,
}

impl ConditionClose {
    /// Build from statement tokens; extra tokens are ignored.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches [`Factory`](crate::script::registry::Factory).
    pub fn build(tokens: &[String], _: &Layout) -> Result<Box<dyn ScriptCommand>, ConfError> {
        Ok(Box::new(Self {
            tokens: tokens.to_vec(),
        }))
    }
}

impl ScriptCommand for ConditionClose {
    fn represent(&self) -> String {
        self.tokens.join(" ")
    }

    fn flow(&self) -> Flow {
        Flow::Close
    }

    fn execute(&self, _: &mut Context) -> Result<CommandResult> {
        Ok(CommandResult::Condition(true))
    }
}
