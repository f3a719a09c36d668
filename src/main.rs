//! `cellframe-node-config` entry point: pick the mode, run it, report.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{CommandFactory as _, Parser as _};

use confctl::cli::{Cli, Mode};
use confctl::commands::{self, CommandSetup};
use confctl::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let Some(mode) = args.mode() else {
        // No mode selected: usage only.
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    logging::init_subscriber(args.verbose, mode.name());
    let log = Arc::new(Logger::new(mode.name()));
    let version = option_env!("CONFCTL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.debug(&format!("cellframe-node-config {version}"));

    let result = CommandSetup::init(&args, Arc::clone(&log) as Arc<dyn logging::Log>).and_then(
        |mut setup| match &mode {
            Mode::Init(path) => commands::init::run(&mut setup, path),
            Mode::Exec(tokens) => commands::exec::run(&mut setup, tokens),
            Mode::Vars => commands::vars::run(&setup, &mut std::io::stdout().lock())
                .context("write variables"),
        },
    );

    if args.verbose {
        log.print_summary();
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
