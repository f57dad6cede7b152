// tests/exec_real_process.rs

#![cfg(unix)]

mod common;
use crate::common::{RecordingLogger, TestResult, init_tracing, with_timeout};

use std::io;
use std::sync::{Arc, Mutex};

use logexec::logger;
use logexec::{ExecError, Execution, SharedBuffer, Stream, TokioLauncher, WaitFailure};

/// Run `command` with a formatted logger and explicit capture buffers, the
/// way an application would wire it.
async fn assert_command_output(
    command: &[&str],
    stdin: Option<&str>,
    expected_stdout: &str,
    expected_stderr: &str,
    expected_log: &[&str],
) -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&log);

    let stdout = SharedBuffer::new();
    let stderr = SharedBuffer::new();

    let mut exec = Execution::command(command[0], &command[1..])
        .with_logger(logger::formatted(move |line| sink.lock().unwrap().push(line)))
        .with_stdout(stdout.clone())
        .with_stderr(stderr.clone());
    if let Some(input) = stdin {
        exec = exec.with_stdin_bytes(input);
    }

    with_timeout(exec.run()).await?;

    assert_eq!(stdout.to_string_lossy(), expected_stdout);
    assert_eq!(stderr.to_string_lossy(), expected_stderr);
    assert_eq!(*log.lock().unwrap(), expected_log);
    Ok(())
}

#[tokio::test]
async fn returns_empty_output_when_command_prints_nothing() -> TestResult {
    assert_command_output(
        &["true"],
        None,
        "",
        "",
        &["launch | true", "finish | true -> exit 0"],
    )
    .await
}

#[tokio::test]
async fn returns_and_logs_line_on_stdout() -> TestResult {
    assert_command_output(
        &["echo", "1"],
        None,
        "1\n",
        "",
        &["launch | echo 1", "stdout |  1", "finish | echo 1 -> exit 0"],
    )
    .await
}

#[tokio::test]
async fn returns_and_logs_line_on_stderr() -> TestResult {
    assert_command_output(
        &["sh", "-c", "echo 1 >&2"],
        None,
        "",
        "1\n",
        &[
            r#"launch | sh -c "echo 1 >&2""#,
            "stderr |  1",
            r#"finish | sh -c "echo 1 >&2" -> exit 0"#,
        ],
    )
    .await
}

#[tokio::test]
async fn returns_and_logs_line_without_newline() -> TestResult {
    assert_command_output(
        &["printf", "1"],
        None,
        "1",
        "",
        &["launch | printf 1", "stdout |  1", "finish | printf 1 -> exit 0"],
    )
    .await
}

#[tokio::test]
async fn can_pass_stdin_to_command() -> TestResult {
    assert_command_output(
        &["sed", "s/^/xxx /"],
        Some("test"),
        "xxx test",
        "",
        &[
            r#"launch | sed "s/^/xxx /""#,
            "stdout |  xxx test",
            r#"finish | sed "s/^/xxx /" -> exit 0"#,
        ],
    )
    .await
}

#[tokio::test]
async fn cat_round_trips_stdin() -> TestResult {
    let input: String = (0..500).map(|i| format!("line {i}\n")).collect();
    let mut exec = Execution::command("cat", std::iter::empty::<&str>()).with_stdin_bytes(input.clone());

    let output = with_timeout(exec.output()).await?;

    assert_eq!(output.stdout, input.as_bytes());
    assert!(output.stderr.is_empty());
    Ok(())
}

#[tokio::test]
async fn three_lines_become_three_records_and_exact_combined_log() -> TestResult {
    let logger = RecordingLogger::new();
    let mut exec = Execution::command("printf", [r"1\n2\n3\n"]).with_logger(logger.clone());

    with_timeout(exec.run()).await?;

    assert_eq!(logger.payloads(Stream::Stdout), vec!["1", "2", "3"]);
    let events = exec.streams_data();
    assert!(events.iter().all(|e| e.stream == Stream::Stdout));
    let joined: Vec<u8> = events.into_iter().flat_map(|e| e.data).collect();
    assert_eq!(joined, b"1\n2\n3\n");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_reports_code_and_output() {
    let mut exec = Execution::command("sh", ["-c", "echo failing >&2; exit 7"]);

    match with_timeout(exec.run()).await {
        Err(ExecError::ExitStatus(status)) => {
            assert_eq!(status.code, 7);
            assert_eq!(status.output.as_deref(), Some("failing"));
            assert_eq!(status.command, r#"sh -c "echo failing >&2; exit 7""#);
        }
        other => panic!("expected ExitStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn output_returns_both_streams() -> TestResult {
    let mut exec = Execution::command("sh", ["-c", "printf out; printf err >&2"]);

    let output = with_timeout(exec.output()).await?;

    assert_eq!(output.stdout, b"out");
    assert_eq!(output.stderr, b"err");
    Ok(())
}

#[tokio::test]
async fn missing_binary_is_a_start_error() {
    let mut exec = Execution::command("logexec-definitely-missing-binary", std::iter::empty::<&str>());

    match with_timeout(exec.run()).await {
        Err(ExecError::Start { source, .. }) => {
            assert_eq!(source.kind(), io::ErrorKind::NotFound)
        }
        other => panic!("expected Start, got {other:?}"),
    }
}

#[tokio::test]
async fn killed_process_is_a_wait_error() {
    let mut exec = Execution::command("sh", ["-c", "kill -9 $$"]);

    match with_timeout(exec.run()).await {
        Err(ExecError::Wait {
            source: WaitFailure::Signaled(signal),
            ..
        }) => assert_eq!(signal, 9),
        other => panic!("expected Wait(Signaled), got {other:?}"),
    }
}

#[tokio::test]
async fn process_can_be_killed_externally_and_reaped() -> TestResult {
    let mut exec = Execution::command("sleep", ["30"]);
    exec.start().await?;

    let pid = exec.id().expect("running process has a pid");
    let status = std::process::Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .status()?;
    assert!(status.success());

    match with_timeout(exec.wait()).await {
        Err(ExecError::Wait {
            source: WaitFailure::Signaled(15),
            ..
        }) => Ok(()),
        other => panic!("expected Wait(Signaled(15)), got {other:?}"),
    }
}

#[tokio::test]
async fn launcher_settings_reach_the_process() -> TestResult {
    let dir = tempfile::tempdir()?;
    let launcher = TokioLauncher::new("sh", ["-c", "printf '%s %s' \"$GREETING\" \"$(pwd)\""])
        .env("GREETING", "hello")
        .current_dir(dir.path());
    let mut exec = Execution::new(launcher);

    let output = with_timeout(exec.output()).await?;

    let text = String::from_utf8(output.stdout)?;
    let canonical = dir.path().canonicalize()?;
    assert!(text.starts_with("hello "));
    assert!(text.ends_with(canonical.file_name().unwrap().to_str().unwrap()));
    Ok(())
}

#[tokio::test]
async fn concurrent_executions_do_not_share_state() -> TestResult {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            tokio::spawn(async move {
                let mut exec = Execution::command("sh", ["-c", &format!("echo out{i}; echo err{i} >&2")]);
                exec.output().await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.await??;
        assert_eq!(output.stdout, format!("out{i}\n").as_bytes());
        assert_eq!(output.stderr, format!("err{i}\n").as_bytes());
    }
    Ok(())
}
