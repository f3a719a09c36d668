//! `--vars`: dump the variable store.
use std::io::{self, Write};

use super::CommandSetup;

/// Write every variable to `out` as a bare `NAME=value` line, sorted by name.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(setup: &CommandSetup, out: &mut impl Write) -> io::Result<()> {
    setup
        .ctx
        .log
        .debug(&format!("node install root: {}", setup.ctx.layout.root().display()));
    for (name, value) in setup.ctx.vars.iter() {
        writeln!(out, "{name}={value}")?;
    }
    out.flush()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use clap::Parser as _;

    use super::*;
    use crate::cli::Cli;
    use crate::logging::tests_support::RecordingLog;

    #[test]
    fn prints_bare_sorted_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().display().to_string();
        let args = Cli::parse_from(["cellframe-node-config", "-p", &root, "-s"]);
        let log = Arc::new(RecordingLog::new());
        let shared: Arc<dyn crate::logging::Log> = Arc::clone(&log) as _;
        let mut setup = CommandSetup::init(&args, shared).unwrap();
        setup.ctx.vars.set("A_FIRST", "1");

        let mut out = Vec::new();
        run(&setup, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A_FIRST=1");
        assert!(lines.iter().all(|l| l.contains('=') && !l.starts_with(' ')));
        assert!(lines.iter().any(|l| l.starts_with("CONFIGS_PATH=")));
        assert!(log.info_lines().is_empty());
        assert!(
            log.debug_lines()
                .iter()
                .any(|l| l.starts_with("node install root: "))
        );
    }
}
