// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] provides the `Launcher` trait and the production
//!   `TokioLauncher`; tests substitute an in-memory fake.
//! - [`pump`] copies one child pipe into a stream fan-out until EOF.
//! - [`classify`] turns a raw exit into success / non-zero / wait failure
//!   and builds the diagnostic excerpt for non-zero exits.
//! - [`execution`] owns the lifecycle: start, wait, run, output.

pub mod classify;
pub mod execution;
pub mod launcher;
pub mod pump;

pub use classify::{Completion, classify, diagnostic_excerpt, strip_ansi};
pub use execution::{Execution, ExecutionState, Output};
pub use launcher::{BoxedReader, BoxedWriter, ExitInfo, Launcher, TokioLauncher};
pub use pump::{PumpOutcome, pump};
