//! Line classification for INI-style node configuration files.
//!
//! The line model never parses a file into sections; it keeps raw lines and
//! asks this module what each one is. Every helper works on a single line.

/// What a single physical line of a config file holds.
///
/// # Examples
///
/// ```
/// use confctl::config::ini::{LineKind, classify};
///
/// assert_eq!(classify("[general]"), LineKind::Header("general"));
/// assert_eq!(
///     classify("auto_online = true  # comment"),
///     LineKind::Pair { key: "auto_online", value: "true" }
/// );
/// assert_eq!(classify("   # only a comment"), LineKind::Blank);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty, whitespace-only, or comment-only line.
    Blank,
    /// A `[group]` header with the trimmed group name.
    Header(&'a str),
    /// A `key=value` line; both halves trimmed, inline comment removed.
    Pair {
        /// Parameter name.
        key: &'a str,
        /// Parameter value.
        value: &'a str,
    },
    /// Anything else, e.g. continuation lines of a multi-line array.
    Other(&'a str),
}

/// Classify one raw line.
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    let content = strip_comment(line).trim();
    if content.is_empty() {
        return LineKind::Blank;
    }
    if let Some(name) = parse_group_header(content) {
        return LineKind::Header(name);
    }
    match parse_kv_line(content) {
        Some((key, value)) => LineKind::Pair { key, value },
        None => LineKind::Other(content),
    }
}

/// Drop everything from the first `#` onwards.
///
/// # Examples
///
/// ```
/// use confctl::config::ini::strip_comment;
///
/// assert_eq!(strip_comment("port=8079 # tcp"), "port=8079 ");
/// assert_eq!(strip_comment("no comment"), "no comment");
/// ```
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// Whether the trimmed line is a comment line (starts with `#`).
#[must_use]
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Parse a `[name]` header, returning the trimmed name.
///
/// The whole line must be the header: a line containing `=` is a
/// parameter whose value happens to be bracketed.
fn parse_group_header(content: &str) -> Option<&str> {
    if content.contains('=') {
        return None;
    }
    let inner = content.strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return None;
    }
    Some(inner)
}

/// Split a `key=value` line on the first `=`; the key must be non-empty.
fn parse_kv_line(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
