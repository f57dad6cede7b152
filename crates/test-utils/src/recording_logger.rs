use std::sync::{Arc, Mutex};

use logexec::logger::{Logger, format_record};
use logexec::Stream;

/// One call received by a [`RecordingLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub command: Vec<String>,
    pub stream: Stream,
    pub data: String,
}

/// Logger that keeps every record in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn streams(&self) -> Vec<Stream> {
        self.records().into_iter().map(|r| r.stream).collect()
    }

    /// Records rendered with `format_record`, e.g. `stdout |  1`.
    pub fn lines(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|r| format_record(&r.command, r.stream, r.data.as_bytes()))
            .collect()
    }

    /// Payloads logged for one stream, in order.
    pub fn payloads(&self, stream: Stream) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.stream == stream)
            .map(|r| r.data)
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, command: &[String], stream: Stream, data: &[u8]) {
        self.records.lock().unwrap().push(Record {
            command: command.to_vec(),
            stream,
            data: String::from_utf8_lossy(data).into_owned(),
        });
    }
}
