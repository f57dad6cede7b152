// src/exec/execution.rs

//! Execution controller.
//!
//! Lifecycle: `Configured -> Started -> {Succeeded, Failed}`.
//!
//! - `start` spawns the process, emits the `Launch` record, wires stdin and
//!   spawns one pump per output stream.
//! - `wait` waits for exit, drains both pumps to EOF, closes the fan-outs
//!   (flushing partial lines) and classifies the exit.
//! - `run` is `start` + `wait`; `output` additionally reads the captures.

use std::ffi::OsStr;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ExecConfig;
use crate::errors::{ExecError, ExitStatusError, Result, WaitFailure};
use crate::exec::classify::{Completion, classify, diagnostic_excerpt};
use crate::exec::launcher::{BoxedReader, BoxedWriter, Launcher, TokioLauncher};
use crate::exec::pump::{PumpOutcome, spawn_pump};
use crate::logger::{Logger, NoopLogger, lifecycle_only};
use crate::shell::format_shell_command;
use crate::streams::{
    CallbackSink, CombinedLog, FanOut, LineRelay, SharedBuffer, WriterSink,
};
use crate::types::{Stream, StreamEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Configured,
    Started,
    Succeeded,
    Failed,
}

/// Captured output returned by [`Execution::output`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

enum StdinSource {
    /// Caller writes through [`Execution::take_stdin`].
    Pipe(Option<BoxedWriter>),
    /// Copied into the child by a feeder task.
    Reader(Option<BoxedReader>),
}

enum CaptureTarget {
    Buffer(SharedBuffer),
    /// Moved into the pump on start.
    Writer(Option<Box<dyn Write + Send>>),
}

/// A command prepared for (or in the middle of) one run.
///
/// There is no raw pipe accessor for stdout/stderr. To consume a stream
/// directly, pass a writer to [`with_stdout`](Self::with_stdout) or
/// [`with_stderr`](Self::with_stderr); it receives every chunk unmodified,
/// and the line logger can be silenced with [`no_std_log`](Self::no_std_log).
pub struct Execution {
    launcher: Box<dyn Launcher>,
    logger: Arc<dyn Logger>,
    config: ExecConfig,
    stdin: StdinSource,
    stdout: CaptureTarget,
    stderr: CaptureTarget,
    combined: CombinedLog,
    state: ExecutionState,
    pumps: Vec<JoinHandle<PumpOutcome>>,
    stdin_feeder: Option<JoinHandle<io::Result<u64>>>,
    /// Set once `wait` got past the state check; a failed spawn leaves it unset.
    waited: bool,
}

impl Execution {
    pub fn new(launcher: impl Launcher + 'static) -> Self {
        Self {
            launcher: Box::new(launcher),
            logger: Arc::new(NoopLogger),
            config: ExecConfig::default(),
            stdin: StdinSource::Pipe(None),
            stdout: CaptureTarget::Buffer(SharedBuffer::new()),
            stderr: CaptureTarget::Buffer(SharedBuffer::new()),
            combined: CombinedLog::new(),
            state: ExecutionState::Configured,
            pumps: Vec::new(),
            stdin_feeder: None,
            waited: false,
        }
    }

    /// Execution of a real OS process.
    pub fn command<I, S>(program: impl AsRef<OsStr>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::new(TokioLauncher::new(program, args))
    }

    pub fn with_logger(self, logger: impl Logger + 'static) -> Self {
        self.with_shared_logger(Arc::new(logger))
    }

    pub fn with_shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    /// Write stdout to `target` instead of the internal buffer.
    pub fn with_stdout(mut self, target: impl Write + Send + 'static) -> Self {
        self.stdout = CaptureTarget::Writer(Some(Box::new(target)));
        self
    }

    /// Write stderr to `target` instead of the internal buffer.
    pub fn with_stderr(mut self, target: impl Write + Send + 'static) -> Self {
        self.stderr = CaptureTarget::Writer(Some(Box::new(target)));
        self
    }

    /// Feed `source` to the child's stdin; the pipe is closed at EOF.
    pub fn with_stdin(mut self, source: impl tokio::io::AsyncRead + Send + Unpin + 'static) -> Self {
        self.stdin = StdinSource::Reader(Some(Box::new(source)));
        self
    }

    pub fn with_stdin_bytes(self, data: impl Into<Vec<u8>>) -> Self {
        self.with_stdin(io::Cursor::new(data.into()))
    }

    /// Drop every record, including launch/finish.
    pub fn no_log(self) -> Self {
        self.with_logger(NoopLogger)
    }

    /// Keep launch/finish records, drop output lines.
    pub fn no_std_log(mut self) -> Self {
        self.logger = lifecycle_only(self.logger);
        self
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn args(&self) -> &[String] {
        self.launcher.args()
    }

    /// OS process id while the process is running.
    pub fn id(&self) -> Option<u32> {
        self.launcher.id()
    }

    /// Write end of the child's stdin, available between `start` and `wait`
    /// when no stdin source was configured.
    pub fn take_stdin(&mut self) -> Option<BoxedWriter> {
        match &mut self.stdin {
            StdinSource::Pipe(pipe) => pipe.take(),
            StdinSource::Reader(_) => None,
        }
    }

    /// Internal stdout buffer, `None` if stdout was redirected.
    pub fn stdout_buffer(&self) -> Option<&SharedBuffer> {
        match &self.stdout {
            CaptureTarget::Buffer(buf) => Some(buf),
            CaptureTarget::Writer(_) => None,
        }
    }

    /// Internal stderr buffer, `None` if stderr was redirected.
    pub fn stderr_buffer(&self) -> Option<&SharedBuffer> {
        match &self.stderr {
            CaptureTarget::Buffer(buf) => Some(buf),
            CaptureTarget::Writer(_) => None,
        }
    }

    pub fn combined_log(&self) -> &CombinedLog {
        &self.combined
    }

    /// Snapshot of the combined stdout/stderr events so far.
    pub fn streams_data(&self) -> Vec<StreamEvent> {
        self.combined.snapshot()
    }

    /// Start the command without waiting for it.
    pub async fn start(&mut self) -> Result<()> {
        let command = self.to_string();

        if self.state != ExecutionState::Configured {
            return Err(ExecError::Start {
                command,
                source: io::Error::other("execution was already started"),
            });
        }

        if !self.config.log_output {
            self.logger = lifecycle_only(self.logger.clone());
        }

        let args: Arc<[String]> = self.launcher.args().into();
        self.logger.log(&args, Stream::Launch, b"launch");

        if let Err(source) = self.launcher.start() {
            warn!(command = %command, error = %source, "failed to start process");
            self.state = ExecutionState::Failed;
            return Err(ExecError::Start { command, source });
        }

        self.state = ExecutionState::Started;
        info!(command = %command, pid = ?self.launcher.id(), "process started");

        self.wire_stdin();

        let emit_lock = Arc::new(Mutex::new(()));
        for stream in [Stream::Stdout, Stream::Stderr] {
            let reader = match stream {
                Stream::Stdout => self.launcher.take_stdout(),
                _ => self.launcher.take_stderr(),
            };
            let Some(reader) = reader else {
                debug!(command = %command, %stream, "no pipe for stream; not capturing");
                continue;
            };

            let fanout = self.build_fanout(stream, args.clone(), emit_lock.clone());
            self.pumps
                .push(spawn_pump(stream, reader, fanout, self.config.read_buffer_size));
        }

        Ok(())
    }

    /// Wait for the command to finish and classify its exit.
    pub async fn wait(&mut self) -> Result<()> {
        match self.state {
            ExecutionState::Started => {}
            ExecutionState::Configured => return Err(self.wait_error(WaitFailure::NotStarted)),
            ExecutionState::Failed if !self.waited => {
                return Err(self.wait_error(WaitFailure::NotStarted));
            }
            ExecutionState::Succeeded | ExecutionState::Failed => {
                return Err(self.wait_error(WaitFailure::AlreadyWaited));
            }
        }
        self.waited = true;

        // Nobody can write to an untaken stdin pipe any more; close it so
        // children reading stdin see EOF.
        if let StdinSource::Pipe(pipe) = &mut self.stdin {
            pipe.take();
        }

        let wait_result = self.launcher.wait().await;
        let exit = match wait_result {
            Ok(exit) => exit,
            Err(err) => {
                self.abort_tasks();
                self.state = ExecutionState::Failed;
                warn!(command = %self, error = %err, "waiting for process failed");
                return Err(self.wait_error(WaitFailure::Io(err)));
            }
        };

        let drained = self.drain_pumps().await;
        let fed = self.join_stdin_feeder().await;

        // A copy failure only outranks a clean exit; an unsuccessful exit
        // keeps its own classification.
        let completion = classify(exit);
        if let Err(failure) = drained.and(fed) {
            if completion == Completion::Success {
                self.state = ExecutionState::Failed;
                return Err(self.wait_error(failure));
            }
            warn!(command = %self, ?completion, error = %failure, "output copy failed after unsuccessful exit");
        }

        let args = self.launcher.args().to_vec();
        match completion {
            Completion::Success => {
                self.state = ExecutionState::Succeeded;
                info!(command = %self, exit_code = 0, "process exited");
                self.logger.log(&args, Stream::Finish, b"exit 0");
                Ok(())
            }
            Completion::NonZero(code) => {
                self.state = ExecutionState::Failed;
                info!(command = %self, exit_code = code, "process exited with non-zero code");
                self.logger
                    .log(&args, Stream::Finish, format!("exit {code}").as_bytes());

                let output = if self.config.attach_output {
                    diagnostic_excerpt(&self.combined, self.config.excerpt_limit)
                } else {
                    None
                };

                Err(ExecError::ExitStatus(ExitStatusError {
                    code,
                    command: self.to_string(),
                    output,
                }))
            }
            Completion::Signaled(signal) => {
                self.state = ExecutionState::Failed;
                warn!(command = %self, signal, "process killed by signal");
                Err(self.wait_error(WaitFailure::Signaled(signal)))
            }
            Completion::Unknown => {
                self.state = ExecutionState::Failed;
                Err(self.wait_error(WaitFailure::UnknownStatus))
            }
        }
    }

    /// Start the command and wait for it.
    pub async fn run(&mut self) -> Result<()> {
        self.start().await?;
        self.wait().await
    }

    /// Run the command and return both captured streams.
    pub async fn output(&mut self) -> Result<Output> {
        self.run().await?;

        Ok(Output {
            stdout: self.read_capture(Stream::Stdout)?,
            stderr: self.read_capture(Stream::Stderr)?,
        })
    }

    fn build_fanout(
        &mut self,
        stream: Stream,
        args: Arc<[String]>,
        emit_lock: Arc<Mutex<()>>,
    ) -> FanOut {
        let mut fanout = FanOut::new();

        let target = match stream {
            Stream::Stdout => &mut self.stdout,
            _ => &mut self.stderr,
        };
        match target {
            CaptureTarget::Buffer(buf) => fanout.push(Box::new(WriterSink::new(buf.clone()))),
            CaptureTarget::Writer(writer) => {
                if let Some(writer) = writer.take() {
                    fanout.push(Box::new(WriterSink::new(writer)));
                }
            }
        }

        let callback = CallbackSink::new(self.logger.clone(), args, stream);
        fanout
            .with(self.combined.sink(stream))
            .with(LineRelay::new(callback, emit_lock))
    }

    fn wire_stdin(&mut self) {
        let pipe = self.launcher.take_stdin();

        match &mut self.stdin {
            StdinSource::Pipe(slot) => *slot = pipe,
            StdinSource::Reader(source) => {
                let (Some(mut source), Some(mut pipe)) = (source.take(), pipe) else {
                    return;
                };
                self.stdin_feeder = Some(tokio::spawn(async move {
                    let copied = tokio::io::copy(&mut source, &mut pipe).await?;
                    pipe.shutdown().await?;
                    Ok::<_, io::Error>(copied)
                }));
            }
        }
    }

    /// Join both pumps, then run the closer on their fan-outs.
    async fn drain_pumps(&mut self) -> std::result::Result<(), WaitFailure> {
        let mut first_err = None;

        for handle in std::mem::take(&mut self.pumps) {
            match handle.await {
                Ok(mut outcome) => {
                    let closed = outcome.fanout.close();
                    if let Err(source) = outcome.result.and(closed) {
                        warn!(command = %self, stream = %outcome.stream, error = %source, "stream copy failed");
                        first_err.get_or_insert(WaitFailure::Stream {
                            stream: outcome.stream,
                            source,
                        });
                    }
                }
                Err(err) => {
                    first_err.get_or_insert(WaitFailure::Pump(err.to_string()));
                }
            }
        }

        match first_err {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    async fn join_stdin_feeder(&mut self) -> std::result::Result<(), WaitFailure> {
        let Some(handle) = self.stdin_feeder.take() else {
            return Ok(());
        };

        match handle.await {
            Ok(Ok(bytes)) => {
                debug!(command = %self, bytes, "stdin fed");
                Ok(())
            }
            Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {
                debug!(command = %self, "process closed stdin before reading all input");
                Ok(())
            }
            Ok(Err(err)) => Err(WaitFailure::Stdin(err)),
            Err(err) => Err(WaitFailure::Pump(err.to_string())),
        }
    }

    fn abort_tasks(&mut self) {
        for handle in self.pumps.drain(..) {
            handle.abort();
        }
        if let Some(feeder) = self.stdin_feeder.take() {
            feeder.abort();
        }
    }

    fn read_capture(&self, stream: Stream) -> Result<Vec<u8>> {
        let target = match stream {
            Stream::Stdout => &self.stdout,
            _ => &self.stderr,
        };

        match target {
            CaptureTarget::Buffer(buf) => Ok(buf.contents()),
            CaptureTarget::Writer(_) => Err(ExecError::Read {
                stream,
                command: self.to_string(),
                source: io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("{stream} was redirected to a caller-supplied writer"),
                ),
            }),
        }
    }

    fn wait_error(&self, source: WaitFailure) -> ExecError {
        ExecError::Wait {
            command: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_shell_command(self.launcher.args()))
    }
}
