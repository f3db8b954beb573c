//! [`ProcessRunnerPort`] backed by `tokio::process`.
//!
//! stdout and stderr are read concurrently, each capped at
//! `max_buffer_bytes`. Exceeding the cap or the timeout kills the child.

use async_trait::async_trait;
use deskpilot_application::{ProcessError, ProcessOptions, ProcessOutput, ProcessRunnerPort};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

async fn read_capped<R: AsyncRead + Unpin>(
    reader: Option<R>,
    limit: usize,
    program: &str,
) -> Result<Vec<u8>, ProcessError> {
    let Some(reader) = reader else {
        return Ok(Vec::new());
    };
    let mut buf = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .await
        .map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            message: format!("failed to read output: {}", e),
        })?;
    if buf.len() > limit {
        return Err(ProcessError::BufferExceeded { limit });
    }
    Ok(buf)
}

#[async_trait]
impl ProcessRunnerPort for TokioProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;
        debug!(program, args = ?args, pid = ?child.id(), "Spawned process");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = options.max_buffer_bytes;

        let run = async {
            let (out, err) = tokio::try_join!(
                read_capped(stdout, limit, program),
                read_capped(stderr, limit, program)
            )?;
            let status = child.wait().await.map_err(|e| ProcessError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;
            Ok::<_, ProcessError>((out, err, status))
        };

        let outcome = tokio::time::timeout(options.timeout, run).await;
        let (out, err, status) = match outcome {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                warn!(program, error = %e, "Process failed");
                let _ = child.start_kill();
                return Err(e);
            }
            Err(_) => {
                warn!(program, timeout = ?options.timeout, "Process timed out");
                let _ = child.start_kill();
                return Err(ProcessError::Timeout(options.timeout));
            }
        };

        let output = ProcessOutput {
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
            exit_code: status.code(),
        };

        if !status.success() {
            return Err(ProcessError::NonZeroExit {
                code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let output = TokioProcessRunner::new()
            .run("sh", &sh("echo out; echo err >&2"), &ProcessOptions::default())
            .await
            .unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = TokioProcessRunner::new()
            .run("sh", &sh("echo boom >&2; exit 3"), &ProcessOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::NonZeroExit {
                code: Some(3),
                stderr: "boom\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let options = ProcessOptions {
            timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let started = std::time::Instant::now();
        let err = TokioProcessRunner::new()
            .run("sh", &sh("sleep 10"), &options)
            .await
            .unwrap_err();
        assert_eq!(err, ProcessError::Timeout(Duration::from_millis(200)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_buffer_limit() {
        let options = ProcessOptions {
            max_buffer_bytes: 1000,
            ..Default::default()
        };
        let err = TokioProcessRunner::new()
            .run("sh", &sh("yes | head -c 100000"), &options)
            .await
            .unwrap_err();
        assert_eq!(err, ProcessError::BufferExceeded { limit: 1000 });
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = TokioProcessRunner::new()
            .run("deskpilot-no-such-binary", &[], &ProcessOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProcessOptions {
            working_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let output = TokioProcessRunner::new()
            .run("sh", &sh("touch marker && ls"), &options)
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "marker");
    }
}
