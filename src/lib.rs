//! Node configuration convergence engine.
//!
//! Reads a `.setup` script (or an inline `--exec` string) and idempotently
//! brings the INI-style config files of a cellframe-node install tree to the
//! described state, never clobbering values an operator has already set.
//!
//! The public API is organised into layers:
//!
//! - **[`vars`]** and **[`platform`]**: host facts and `${NAME}` substitution
//! - **[`config`]**: the config-file line model, install layout and write lock
//! - **[`resources`]**: idempotent `check + apply` primitives (network files, templates, service)
//! - **[`script`]**: command registry, parser and the conditional runner
//! - **[`commands`]**: top-level modes (`--init`, `--exec`, `--vars`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod script;
pub mod vars;
