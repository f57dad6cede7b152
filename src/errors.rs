// src/errors.rs

//! Crate-wide error types.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::types::Stream;

/// Failure of one execution, returned by `start`, `wait`, `run` and `output`.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be spawned (missing binary, permissions, ...).
    #[error("can't start command: {command}: {source}")]
    Start {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process could not be waited on, or its outcome is not a plain
    /// exit code.
    #[error("unable to wait command execution: {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: WaitFailure,
    },

    /// The process exited with a non-zero code.
    #[error(transparent)]
    ExitStatus(#[from] ExitStatusError),

    /// A capture target could not be read back after the run.
    #[error("can't read execution {stream}: {command}: {source}")]
    Read {
        stream: Stream,
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    pub fn is_exit_status(&self) -> bool {
        matches!(self, ExecError::ExitStatus(_))
    }

    /// Exit code of a non-zero exit, `None` for every other failure.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            ExecError::ExitStatus(err) => Some(err.code),
            _ => None,
        }
    }
}

/// Why `wait` could not classify the run as a clean exit.
#[derive(Error, Debug)]
pub enum WaitFailure {
    #[error("process killed by signal {0}")]
    Signaled(i32),

    #[error("process exited without an exit code or signal")]
    UnknownStatus,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("command was not started")]
    NotStarted,

    #[error("command was already waited on")]
    AlreadyWaited,

    #[error("copying {stream} failed: {source}")]
    Stream {
        stream: Stream,
        #[source]
        source: io::Error,
    },

    #[error("feeding stdin failed: {0}")]
    Stdin(#[source] io::Error),

    #[error("stream pump task failed: {0}")]
    Pump(String),
}

/// Controlled non-zero exit.
///
/// `output` holds everything the process printed on stdout and stderr,
/// with terminal escape codes removed and surrounding whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitStatusError {
    pub code: i32,
    pub command: String,
    pub output: Option<String>,
}

impl fmt::Display for ExitStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "execution completed with non-zero exit code {}: {}",
            self.code, self.command
        )?;
        if let Some(output) = &self.output {
            write!(f, "\n{output}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExitStatusError {}

/// Errors raised while loading or validating an [`ExecConfig`](crate::config::ExecConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ExecError>;
