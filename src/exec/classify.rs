// src/exec/classify.rs

//! Exit classification and diagnostic excerpts.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::exec::launcher::ExitInfo;
use crate::streams::CombinedLog;

/// How a process run ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Exit code 0.
    Success,
    /// Controlled exit with a non-zero code.
    NonZero(i32),
    /// Killed by a signal; there is no exit code.
    Signaled(i32),
    /// Neither an exit code nor a signal was reported.
    Unknown,
}

pub fn classify(exit: ExitInfo) -> Completion {
    match (exit.code, exit.signal) {
        (Some(0), _) => Completion::Success,
        (Some(code), _) => Completion::NonZero(code),
        (None, Some(signal)) => Completion::Signaled(signal),
        (None, None) => Completion::Unknown,
    }
}

// CSI / OSC sequences plus the single-byte C1 introducer.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x{1B}\x{9B}][\[\]()#;?]*(?:(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x{07})|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~]))",
    )
    .unwrap_or_else(|err| unreachable!("static regex: {err}"))
});

/// Remove terminal color/cursor escape sequences.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Everything the process printed, cleaned up for an error message.
///
/// Returns `None` when nothing but whitespace was printed. With a `limit`,
/// only the last `limit` characters are kept.
pub fn diagnostic_excerpt(log: &CombinedLog, limit: Option<usize>) -> Option<String> {
    let raw = log.concatenated();
    if raw.is_empty() {
        return None;
    }

    let text = String::from_utf8_lossy(&raw);
    let stripped = strip_ansi(&text);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let excerpt = match limit {
        Some(limit) => {
            let total = trimmed.chars().count();
            if total > limit {
                let tail: String = trimmed.chars().skip(total - limit).collect();
                format!("...{tail}")
            } else {
                trimmed.to_string()
            }
        }
        None => trimmed.to_string(),
    };

    Some(excerpt)
}
