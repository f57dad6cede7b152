// src/lib.rs

//! Run external processes while duplicating their stdout/stderr into a
//! structured log.
//!
//! Every chunk the child writes goes, unmodified, to the caller's capture
//! target and to an ordered combined log, and is re-chunked into lines for a
//! [`Logger`].
//!
//! ```no_run
//! # async fn demo() -> logexec::errors::Result<()> {
//! use logexec::{Execution, logger};
//!
//! let mut exec = Execution::command("echo", ["1"])
//!     .with_logger(logger::formatted(|line| println!("{line}")));
//! let output = exec.output().await?;
//! assert_eq!(output.stdout, b"1\n");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod exec;
pub mod logger;
pub mod logging;
pub mod shell;
pub mod streams;
pub mod types;

pub use config::ExecConfig;
pub use errors::{ConfigError, ExecError, ExitStatusError, WaitFailure};
pub use exec::{Execution, ExecutionState, ExitInfo, Launcher, Output, TokioLauncher};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use shell::format_shell_command;
pub use streams::{CombinedLog, SharedBuffer};
pub use types::{Stream, StreamEvent};
