// src/exec/launcher.rs

//! Pluggable process launcher abstraction.
//!
//! [`Execution`](super::Execution) talks to a `Launcher` instead of a raw
//! `tokio::process::Child`. This makes it easy to swap in a fake process in
//! tests (scripted output, exit codes, signal deaths) while keeping the
//! production implementation in [`TokioLauncher`].

use std::ffi::OsStr;
use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Raw outcome of waiting on a process.
///
/// Exactly one of `code` / `signal` is normally set. A process killed by a
/// signal has no exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitInfo {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

/// Capability set the execution controller needs from a process.
pub trait Launcher: Send {
    /// Program followed by its arguments.
    fn args(&self) -> &[String];

    /// Spawn the process with stdin, stdout and stderr piped.
    fn start(&mut self) -> io::Result<()>;

    /// Write end of the child's stdin. `None` before `start` or once taken.
    fn take_stdin(&mut self) -> Option<BoxedWriter>;

    /// Read end of the child's stdout. `None` before `start` or once taken.
    fn take_stdout(&mut self) -> Option<BoxedReader>;

    /// Read end of the child's stderr. `None` before `start` or once taken.
    fn take_stderr(&mut self) -> Option<BoxedReader>;

    /// Wait for the process to exit.
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ExitInfo>> + Send + '_>>;

    /// OS process id, if the process is running.
    fn id(&self) -> Option<u32>;
}

/// Real launcher backed by `tokio::process`.
pub struct TokioLauncher {
    command: Command,
    args: Vec<String>,
    child: Option<Child>,
}

impl TokioLauncher {
    pub fn new<I, S>(program: impl AsRef<OsStr>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = std::process::Command::new(program);
        command.args(args);
        Self::from_std(command)
    }

    /// Wrap an already configured `std::process::Command` (env, cwd, ...).
    /// Its stdio settings are replaced by pipes on `start`.
    pub fn from_std(command: std::process::Command) -> Self {
        let args = std::iter::once(command.get_program())
            .chain(command.get_args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        Self {
            command: Command::from(command),
            args,
            child: None,
        }
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.command.env(key, value);
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.command.current_dir(dir);
        self
    }
}

impl Launcher for TokioLauncher {
    fn args(&self) -> &[String] {
        &self.args
    }

    fn start(&mut self) -> io::Result<()> {
        if self.child.is_some() {
            return Err(io::Error::other("process already started"));
        }

        let child = self
            .command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        self.child = Some(child);
        Ok(())
    }

    fn take_stdin(&mut self) -> Option<BoxedWriter> {
        let stdin = self.child.as_mut()?.stdin.take()?;
        Some(Box::new(stdin))
    }

    fn take_stdout(&mut self) -> Option<BoxedReader> {
        let stdout = self.child.as_mut()?.stdout.take()?;
        Some(Box::new(stdout))
    }

    fn take_stderr(&mut self) -> Option<BoxedReader> {
        let stderr = self.child.as_mut()?.stderr.take()?;
        Some(Box::new(stderr))
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ExitInfo>> + Send + '_>> {
        Box::pin(async move {
            let child = self
                .child
                .as_mut()
                .ok_or_else(|| io::Error::other("process was not started"))?;
            let status = child.wait().await?;
            Ok(ExitInfo::from(status))
        })
    }

    fn id(&self) -> Option<u32> {
        self.child.as_ref()?.id()
    }
}
