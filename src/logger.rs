// src/logger.rs

//! Logging callbacks that receive launch/finish records and output lines.
//!
//! A [`Logger`] is invoked synchronously from the stream pumps. A slow logger
//! slows the pump down; nothing is buffered on its behalf.

use std::sync::Arc;

use tracing::info;

use crate::shell::format_shell_command;
use crate::types::Stream;

/// Receiver of execution records.
///
/// `command` is the full argument vector, `data` is one output line without
/// its trailing newline, `launch`, or `exit <code>`.
pub trait Logger: Send + Sync {
    fn log(&self, command: &[String], stream: Stream, data: &[u8]);
}

impl<F> Logger for F
where
    F: Fn(&[String], Stream, &[u8]) + Send + Sync,
{
    fn log(&self, command: &[String], stream: Stream, data: &[u8]) {
        self(command, stream, data)
    }
}

/// Logger that drops everything. Used when no logger is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _command: &[String], _stream: Stream, _data: &[u8]) {}
}

/// Logger forwarding every record to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, command: &[String], stream: Stream, data: &[u8]) {
        info!(
            target: "logexec",
            stream = %stream,
            command = %format_shell_command(command),
            "{}",
            String::from_utf8_lossy(data)
        );
    }
}

/// Render a record the way a human reads it in a log file:
///
/// ```text
/// launch | echo 1
/// stdout |  1
/// finish | echo 1 -> exit 0
/// ```
pub fn format_record(command: &[String], stream: Stream, data: &[u8]) -> String {
    match stream {
        Stream::Launch => format!("{:<6} | {}", stream, format_shell_command(command)),
        Stream::Finish => format!(
            "{:<6} | {} -> {}",
            stream,
            format_shell_command(command),
            String::from_utf8_lossy(data)
        ),
        Stream::Stdout | Stream::Stderr => {
            format!("{:<6} |  {}", stream, String::from_utf8_lossy(data))
        }
    }
}

/// Adapt a plain `Fn(String)` line sink (e.g. a closure around `println!`)
/// into a [`Logger`] using [`format_record`].
pub fn formatted<F>(sink: F) -> impl Logger
where
    F: Fn(String) + Send + Sync,
{
    move |command: &[String], stream: Stream, data: &[u8]| {
        sink(format_record(command, stream, data))
    }
}

/// Logger that only lets `Launch` and `Finish` records through.
struct LifecycleOnly {
    inner: Arc<dyn Logger>,
}

impl Logger for LifecycleOnly {
    fn log(&self, command: &[String], stream: Stream, data: &[u8]) {
        if !stream.is_output() {
            self.inner.log(command, stream, data);
        }
    }
}

/// Wrap `logger` so that child output lines are not logged.
pub fn lifecycle_only(logger: Arc<dyn Logger>) -> Arc<dyn Logger> {
    Arc::new(LifecycleOnly { inner: logger })
}
