use std::fmt;
use std::str::FromStr;

/// Origin of a record delivered to a logger or stored in the combined log.
///
/// - `Stdout` / `Stderr`: bytes written by the child process.
/// - `Launch`: emitted once when the process is started.
/// - `Finish`: emitted once when the process exited with a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
    Launch,
    Finish,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
            Stream::Launch => "launch",
            Stream::Finish => "finish",
        }
    }

    /// True for the two streams that carry child output.
    pub fn is_output(&self) -> bool {
        matches!(self, Stream::Stdout | Stream::Stderr)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so callers can use width/alignment flags like `{:<6}`.
        f.pad(self.as_str())
    }
}

impl FromStr for Stream {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" => Ok(Stream::Stdout),
            "stderr" => Ok(Stream::Stderr),
            "launch" => Ok(Stream::Launch),
            "finish" => Ok(Stream::Finish),
            other => Err(format!(
                "invalid stream: {other} (expected \"stdout\", \"stderr\", \"launch\" or \"finish\")"
            )),
        }
    }
}

/// One physical write that reached the combined log.
///
/// `data` is an owned copy; the writer that produced it is free to reuse its
/// buffer as soon as the write returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub stream: Stream,
    pub data: Vec<u8>,
}

impl StreamEvent {
    pub fn new(stream: Stream, data: &[u8]) -> Self {
        Self {
            stream,
            data: data.to_vec(),
        }
    }
}
