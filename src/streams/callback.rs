// src/streams/callback.rs

use std::sync::Arc;

use crate::logger::Logger;
use crate::streams::line_relay::LineSink;
use crate::types::Stream;

/// Turns each line emitted by a [`LineRelay`](super::LineRelay) into one
/// synchronous [`Logger::log`] call tagged with the stream and the command.
pub struct CallbackSink {
    logger: Arc<dyn Logger>,
    command: Arc<[String]>,
    stream: Stream,
}

impl CallbackSink {
    pub fn new(logger: Arc<dyn Logger>, command: Arc<[String]>, stream: Stream) -> Self {
        Self {
            logger,
            command,
            stream,
        }
    }
}

impl LineSink for CallbackSink {
    fn emit(&mut self, line: &[u8]) {
        self.logger.log(&self.command, self.stream, line);
    }
}
