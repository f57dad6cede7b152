// src/streams/fanout.rs

//! Fan-out multiplexer: one write, many consumers.
//!
//! Sinks are called in insertion order. The first failing sink aborts the
//! write, so later sinks never see a chunk that an earlier one rejected.

use std::io::{self, Write};

use crate::streams::line_relay::{LineRelay, LineSink};

/// Consumer of raw stream chunks inside a [`FanOut`].
pub trait StreamSink: Send {
    /// Consume the whole chunk.
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()>;

    /// Called once after the stream reached EOF.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts any [`std::io::Write`] into a [`StreamSink`]. Closing flushes.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> StreamSink for WriterSink<W> {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)
    }

    fn close(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl<S: LineSink> StreamSink for LineRelay<S> {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.feed(data)
    }

    fn close(&mut self) -> io::Result<()> {
        LineRelay::close(self)
    }
}

#[derive(Default)]
pub struct FanOut {
    sinks: Vec<Box<dyn StreamSink>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink; it receives chunks after all previously added sinks.
    pub fn with(mut self, sink: impl StreamSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn push(&mut self, sink: Box<dyn StreamSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver `data` to every sink, stopping at the first error.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.write_chunk(data)?;
        }
        Ok(())
    }

    /// Close every sink. All sinks are closed even if one fails; the first
    /// error is returned.
    pub fn close(&mut self) -> io::Result<()> {
        let mut first_err = None;
        for sink in self.sinks.iter_mut() {
            if let Err(err) = sink.close() {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Write for FanOut {
    /// Always reports the full length on success; consumers never see a
    /// short write.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
