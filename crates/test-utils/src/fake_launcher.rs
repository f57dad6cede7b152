use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::task::JoinHandle;

use logexec::SharedBuffer;
use logexec::exec::{BoxedReader, BoxedWriter, ExitInfo, Launcher};

/// Pipe capacity of the fake process. Small enough that large scripted
/// writes exercise back-pressure through the pumps.
const PIPE_CAPACITY: usize = 4096;

/// One action of the scripted "process", executed in order.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Sleep(Duration),
    /// Read stdin to EOF and keep it for [`FakeLauncher::stdin_probe`].
    ReadStdin,
    /// Read stdin to EOF and write it back to stdout.
    EchoStdin,
}

/// How the scripted process ends.
#[derive(Debug, Clone, Copy)]
pub enum FakeExit {
    Code(i32),
    Signal(i32),
    /// Neither code nor signal.
    Unknown,
    /// `wait` itself fails with this error kind.
    WaitError(io::ErrorKind),
}

/// In-memory [`Launcher`] that plays a script instead of spawning a process.
///
/// - records which bytes were sent on stdin,
/// - writes scripted chunks to stdout/stderr through real async pipes,
/// - reports a scripted exit from `wait`.
pub struct FakeLauncher {
    pub(crate) args: Vec<String>,
    pub(crate) steps: Vec<ScriptStep>,
    pub(crate) exit: FakeExit,
    pub(crate) spawn_error: Option<io::ErrorKind>,
    pub(crate) pid: u32,
    stdin_received: SharedBuffer,
    stdin: Option<DuplexStream>,
    stdout: Option<DuplexStream>,
    stderr: Option<DuplexStream>,
    script: Option<JoinHandle<()>>,
}

impl FakeLauncher {
    pub(crate) fn from_parts(
        args: Vec<String>,
        steps: Vec<ScriptStep>,
        exit: FakeExit,
        spawn_error: Option<io::ErrorKind>,
        pid: u32,
    ) -> Self {
        Self {
            args,
            steps,
            exit,
            spawn_error,
            pid,
            stdin_received: SharedBuffer::new(),
            stdin: None,
            stdout: None,
            stderr: None,
            script: None,
        }
    }

    /// Handle to the bytes the script read from stdin.
    pub fn stdin_probe(&self) -> SharedBuffer {
        self.stdin_received.clone()
    }
}

impl Launcher for FakeLauncher {
    fn args(&self) -> &[String] {
        &self.args
    }

    fn start(&mut self) -> io::Result<()> {
        if let Some(kind) = self.spawn_error {
            return Err(io::Error::new(kind, "scripted spawn failure"));
        }
        if self.script.is_some() {
            return Err(io::Error::other("process already started"));
        }

        let (stdin_w, mut stdin_r) = tokio::io::duplex(PIPE_CAPACITY);
        let (mut stdout_w, stdout_r) = tokio::io::duplex(PIPE_CAPACITY);
        let (mut stderr_w, stderr_r) = tokio::io::duplex(PIPE_CAPACITY);

        let steps = std::mem::take(&mut self.steps);
        let mut received = self.stdin_received.clone();

        self.script = Some(tokio::spawn(async move {
            for step in steps {
                match step {
                    ScriptStep::Stdout(data) => {
                        let _ = stdout_w.write_all(&data).await;
                    }
                    ScriptStep::Stderr(data) => {
                        let _ = stderr_w.write_all(&data).await;
                    }
                    ScriptStep::Sleep(dur) => tokio::time::sleep(dur).await,
                    ScriptStep::ReadStdin => {
                        let mut buf = Vec::new();
                        let _ = stdin_r.read_to_end(&mut buf).await;
                        let _ = io::Write::write_all(&mut received, &buf);
                    }
                    ScriptStep::EchoStdin => {
                        let mut buf = Vec::new();
                        let _ = stdin_r.read_to_end(&mut buf).await;
                        let _ = io::Write::write_all(&mut received, &buf);
                        let _ = stdout_w.write_all(&buf).await;
                    }
                }
            }
            // Dropping the write halves is the child "exiting": pumps see EOF.
        }));

        self.stdin = Some(stdin_w);
        self.stdout = Some(stdout_r);
        self.stderr = Some(stderr_r);
        Ok(())
    }

    fn take_stdin(&mut self) -> Option<BoxedWriter> {
        self.stdin.take().map(|pipe| Box::new(pipe) as BoxedWriter)
    }

    fn take_stdout(&mut self) -> Option<BoxedReader> {
        self.stdout.take().map(|pipe| Box::new(pipe) as BoxedReader)
    }

    fn take_stderr(&mut self) -> Option<BoxedReader> {
        self.stderr.take().map(|pipe| Box::new(pipe) as BoxedReader)
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ExitInfo>> + Send + '_>> {
        Box::pin(async move {
            let script = self
                .script
                .take()
                .ok_or_else(|| io::Error::other("process was not started or already reaped"))?;
            script.await.map_err(io::Error::other)?;

            match self.exit {
                FakeExit::Code(code) => Ok(ExitInfo::exited(code)),
                FakeExit::Signal(signal) => Ok(ExitInfo::signaled(signal)),
                FakeExit::Unknown => Ok(ExitInfo {
                    code: None,
                    signal: None,
                }),
                FakeExit::WaitError(kind) => Err(io::Error::new(kind, "scripted wait failure")),
            }
        })
    }

    fn id(&self) -> Option<u32> {
        self.script.as_ref().map(|_| self.pid)
    }
}
