// src/streams/line_relay.rs

//! Line-buffered relay.
//!
//! Turns arbitrarily sized writes into complete lines. Partial lines are kept
//! in a per-relay pending buffer until a `\n` arrives or the relay is closed.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Downstream of a [`LineRelay`]. Receives one call per line, without the
/// trailing `\n`.
pub trait LineSink: Send {
    fn emit(&mut self, line: &[u8]);
}

impl<F> LineSink for F
where
    F: FnMut(&[u8]) + Send,
{
    fn emit(&mut self, line: &[u8]) {
        self(line)
    }
}

pub struct LineRelay<S: LineSink> {
    pending: Vec<u8>,
    sink: S,
    /// Shared between relays of the same execution so that lines emitted by
    /// one feed call are never interleaved with another relay's lines.
    emit_lock: Arc<Mutex<()>>,
    closed: bool,
}

impl<S: LineSink> LineRelay<S> {
    pub fn new(sink: S, emit_lock: Arc<Mutex<()>>) -> Self {
        Self {
            pending: Vec::new(),
            sink,
            emit_lock,
            closed: false,
        }
    }

    /// Append `data` and emit every line it completes.
    ///
    /// Returns a `BrokenPipe` error once the relay has been closed; the data
    /// is not buffered in that case.
    pub fn feed(&mut self, data: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "line relay is closed",
            ));
        }

        self.pending.extend_from_slice(data);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        let _guard = self.emit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.sink.emit(&line[..line.len() - 1]);
        }

        Ok(())
    }

    /// Flush the unterminated remainder (if any) and mark the relay closed.
    ///
    /// Calling `close` again is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.pending.is_empty() {
            return Ok(());
        }

        let remainder = std::mem::take(&mut self.pending);
        let _guard = self.emit_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.emit(&remainder);

        Ok(())
    }

    /// Bytes received since the last line terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
