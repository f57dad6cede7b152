#![allow(dead_code, unused_imports)]

pub use logexec_test_utils::{
    FakeLauncherBuilder, RecordingLogger, init_tracing, with_timeout,
};

use std::error::Error;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use logexec::streams::LineRelay;

pub type TestResult = Result<(), Box<dyn Error>>;

/// Relay whose emitted lines are collected as strings.
pub fn collecting_relay(
    lock: Arc<Mutex<()>>,
) -> (LineRelay<impl FnMut(&[u8]) + Send>, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    let relay = LineRelay::new(
        move |line: &[u8]| {
            sink_lines
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(line).into_owned());
        },
        lock,
    );
    (relay, lines)
}

/// Writer that fails every write with `BrokenPipe`.
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
