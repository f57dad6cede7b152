#![allow(dead_code)]

use std::io;
use std::time::Duration;

use crate::fake_launcher::{FakeExit, FakeLauncher, ScriptStep};

/// Builder for `FakeLauncher` to simplify test setup.
pub struct FakeLauncherBuilder {
    args: Vec<String>,
    steps: Vec<ScriptStep>,
    exit: FakeExit,
    spawn_error: Option<io::ErrorKind>,
    pid: u32,
}

impl FakeLauncherBuilder {
    pub fn new<S: AsRef<str>>(args: &[S]) -> Self {
        Self {
            args: args.iter().map(|a| a.as_ref().to_string()).collect(),
            steps: vec![],
            exit: FakeExit::Code(0),
            spawn_error: None,
            pid: 4242,
        }
    }

    pub fn stdout(mut self, data: impl AsRef<[u8]>) -> Self {
        self.steps.push(ScriptStep::Stdout(data.as_ref().to_vec()));
        self
    }

    pub fn stderr(mut self, data: impl AsRef<[u8]>) -> Self {
        self.steps.push(ScriptStep::Stderr(data.as_ref().to_vec()));
        self
    }

    pub fn sleep_ms(mut self, ms: u64) -> Self {
        self.steps.push(ScriptStep::Sleep(Duration::from_millis(ms)));
        self
    }

    pub fn read_stdin(mut self) -> Self {
        self.steps.push(ScriptStep::ReadStdin);
        self
    }

    pub fn echo_stdin(mut self) -> Self {
        self.steps.push(ScriptStep::EchoStdin);
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit = FakeExit::Code(code);
        self
    }

    pub fn killed_by(mut self, signal: i32) -> Self {
        self.exit = FakeExit::Signal(signal);
        self
    }

    pub fn unknown_exit(mut self) -> Self {
        self.exit = FakeExit::Unknown;
        self
    }

    pub fn wait_error(mut self, kind: io::ErrorKind) -> Self {
        self.exit = FakeExit::WaitError(kind);
        self
    }

    pub fn spawn_error(mut self, kind: io::ErrorKind) -> Self {
        self.spawn_error = Some(kind);
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn build(self) -> FakeLauncher {
        FakeLauncher::from_parts(self.args, self.steps, self.exit, self.spawn_error, self.pid)
    }
}
