// src/shell.rs

//! Human-readable, shell-quoted rendering of argument vectors for logs and
//! error messages.

use std::sync::LazyLock;

use regex::Regex;

static NEEDS_QUOTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[$`"!'\s]"#).unwrap_or_else(|err| unreachable!("static regex: {err}"))
});

static NEEDS_ESCAPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[$`"!]"#).unwrap_or_else(|err| unreachable!("static regex: {err}"))
});

/// Quote a single argument if the shell would otherwise split or expand it.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }

    if !NEEDS_QUOTING.is_match(arg) {
        return arg.to_string();
    }

    format!("\"{}\"", NEEDS_ESCAPING.replace_all(arg, r"\$0"))
}

/// Render `command` as a single shell-like line.
///
/// ```
/// use logexec::shell::format_shell_command;
///
/// let cmd = ["sh", "-c", "echo 1 >&2"].map(String::from);
/// assert_eq!(format_shell_command(&cmd), r#"sh -c "echo 1 >&2""#);
/// ```
pub fn format_shell_command<S: AsRef<str>>(command: &[S]) -> String {
    command
        .iter()
        .map(|arg| quote_arg(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
