// src/streams/recorder.rs

//! Combined-stream recorder.
//!
//! Keeps every raw write from both output streams in arrival order. The
//! mutex here is independent of the line relay lock: recording happens on
//! every chunk, while relay emission only happens on line boundaries.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::streams::fanout::StreamSink;
use crate::types::{Stream, StreamEvent};

/// Ordered, append-only log of [`StreamEvent`]s shared by the pumps of one
/// execution. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CombinedLog {
    events: Arc<Mutex<Vec<StreamEvent>>>,
}

impl CombinedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `payload` tagged with `stream`.
    pub fn record(&self, stream: Stream, payload: &[u8]) {
        self.lock().push(StreamEvent::new(stream, payload));
    }

    /// Events appended so far.
    pub fn snapshot(&self) -> Vec<StreamEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All payloads concatenated in arrival order.
    pub fn concatenated(&self) -> Vec<u8> {
        self.lock()
            .iter()
            .flat_map(|event| event.data.iter().copied())
            .collect()
    }

    /// Payloads of a single stream, concatenated in arrival order.
    pub fn stream_bytes(&self, stream: Stream) -> Vec<u8> {
        self.lock()
            .iter()
            .filter(|event| event.stream == stream)
            .flat_map(|event| event.data.iter().copied())
            .collect()
    }

    /// A fan-out sink that records into this log under `stream`.
    pub fn sink(&self, stream: Stream) -> RecorderSink {
        RecorderSink {
            log: self.clone(),
            stream,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StreamEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`StreamSink`] side of the recorder, bound to one stream.
#[derive(Debug, Clone)]
pub struct RecorderSink {
    log: CombinedLog,
    stream: Stream,
}

impl StreamSink for RecorderSink {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.log.record(self.stream, data);
        Ok(())
    }
}
