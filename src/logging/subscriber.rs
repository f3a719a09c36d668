//! Tracing subscriber: operator console output and the persistent run log.
//!
//! Operator lines (`info`) are printed bare so that `network ... check`,
//! `config ... get` and `net_list` output can be parsed by install hooks.
//! Decoration is limited to stage headers, dry-run and summary lines, and
//! colour is only used on a terminal.
use std::fs;
use std::io::{IsTerminal as _, Write as _};
use std::sync::Mutex;

use tracing::Level;

use super::utils::{
    ROTATE_BYTES, header_timestamp, line_timestamp, log_file_path, plain, rotate_if_large,
};
use super::{TARGET_DRY_RUN, TARGET_STAGE, TARGET_SUMMARY};

/// What an event stands for, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Summary,
    Info,
    Warn,
    Error,
    Debug,
}

impl Kind {
    fn of(level: Level, target: &str) -> Self {
        match (level, target) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, TARGET_STAGE) => Self::Stage,
            (Level::INFO, TARGET_DRY_RUN) => Self::DryRun,
            (Level::INFO, TARGET_SUMMARY) => Self::Summary,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Stage => "STAGE",
            Self::DryRun => "DRYRUN",
            Self::Summary => "SUMMARY",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }
}

/// The `message` and optional `status` fields of an event.
#[derive(Debug, Default)]
struct Fields {
    message: String,
    status: Option<String>,
}

impl tracing::field::Visit for Fields {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "status" => self.status = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

impl Fields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

const RESET: &str = "\x1b[0m";

fn status_color(status: Option<&str>) -> &'static str {
    match status {
        Some("changed") => "\x1b[32m",
        Some("skipped") => "\x1b[33m",
        Some("dry-run") => "\x1b[36m",
        Some("failed") => "\x1b[31m",
        Some(_) => "\x1b[2m",
        None => "\x1b[1m",
    }
}

/// Render one console line, without the trailing newline.
fn console_line(kind: Kind, fields: &Fields, color: bool) -> String {
    let msg = &fields.message;
    if !color {
        return match kind {
            Kind::Stage => format!("== {msg}"),
            Kind::DryRun => format!("[dry-run] {msg}"),
            Kind::Summary | Kind::Debug => format!("  {msg}"),
            Kind::Info => msg.clone(),
            Kind::Warn => format!("warning: {msg}"),
            Kind::Error => format!("error: {msg}"),
        };
    }
    match kind {
        Kind::Stage => format!("\x1b[1m== {msg}{RESET}"),
        Kind::DryRun => format!("\x1b[36m[dry-run]{RESET} {msg}"),
        Kind::Summary => format!("  {}{msg}{RESET}", status_color(fields.status.as_deref())),
        Kind::Debug => format!("  \x1b[2m{msg}{RESET}"),
        Kind::Info => msg.clone(),
        Kind::Warn => format!("\x1b[33mwarning:{RESET} {msg}"),
        Kind::Error => format!("\x1b[31merror:{RESET} {msg}"),
    }
}

/// Render one log-file line, without the trailing newline.
fn file_line(kind: Kind, fields: &Fields, ts: &str) -> String {
    let msg = plain(&fields.message);
    match &fields.status {
        Some(status) => format!("{ts} {:<7} [{status}] {msg}", kind.tag()),
        None => format!("{ts} {:<7} {msg}", kind.tag()),
    }
}

/// A [`tracing_subscriber::Layer`] appending every event to the run log of
/// one mode, across runs.
///
/// Always captures `DEBUG` and above regardless of `--verbose`.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the log for `mode` for appending, rotating it first if it has
    /// grown past [`ROTATE_BYTES`], and write a run header.
    ///
    /// Returns `None` if the log directory or the file is unavailable.
    pub(super) fn new(mode: &str) -> Option<Self> {
        let path = log_file_path(mode)?;
        rotate_if_large(&path, ROTATE_BYTES);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()?;
        let version =
            option_env!("CONFCTL_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let cwd = std::env::current_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        writeln!(
            file,
            "--- cellframe-node-config {version} --{mode} pid {} cwd {cwd} at {} ---",
            std::process::id(),
            header_timestamp(),
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        let kind = Kind::of(*metadata.level(), metadata.target());
        let line = file_line(kind, &Fields::of(event), &line_timestamp());
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console formatter; see the module docs for the line shapes.
struct ConsoleFormatter {
    color: bool,
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let kind = Kind::of(*metadata.level(), metadata.target());
        writeln!(writer, "{}", console_line(kind, &Fields::of(event), self.color))
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Console output goes to stdout (INFO and below) and stderr (WARN and
/// above); DEBUG reaches the console only when `verbose` is set. Every event
/// is also appended to the run log of `mode`. Call once at program startup,
/// before any logging.
pub fn init_subscriber(verbose: bool, mode: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter { color })
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(mode).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
