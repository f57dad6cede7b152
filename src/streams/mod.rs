// src/streams/mod.rs

//! Stream fan-out building blocks.
//!
//! Each child output stream is pumped into a [`FanOut`] which forwards every
//! chunk to:
//! - the caller's capture target (a [`WriterSink`], usually a [`SharedBuffer`]),
//! - the [`CombinedLog`] through a [`RecorderSink`],
//! - a [`LineRelay`] that re-chunks bytes into lines for a [`CallbackSink`].
//!
//! The combined log and the relay emit lock are the only state shared between
//! the stdout and stderr pumps, and they use separate mutexes.

pub mod buffer;
pub mod callback;
pub mod fanout;
pub mod line_relay;
pub mod recorder;

pub use buffer::SharedBuffer;
pub use callback::CallbackSink;
pub use fanout::{FanOut, StreamSink, WriterSink};
pub use line_relay::{LineRelay, LineSink};
pub use recorder::{CombinedLog, RecorderSink};
