//! Process runner port
//!
//! Runs generated code for `code_gen` steps. Implementations must enforce
//! the hard timeout and the output cap; the engine relies on both.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default hard timeout for a generated program
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on captured stdout + stderr
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    pub timeout: Duration,
    pub max_buffer_bytes: usize,
    pub working_dir: Option<PathBuf>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROCESS_TIMEOUT,
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
            working_dir: None,
        }
    }
}

/// Captured output of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("Process timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Process output exceeded {limit} bytes")]
    BufferExceeded { limit: usize },

    #[error("Process exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

#[async_trait]
pub trait ProcessRunnerPort: Send + Sync {
    /// Run `program` with `args`, returning its output only on a zero exit.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutput, ProcessError>;
}
