//! Engine parameters: use case control knobs.
//!
//! [`EngineParams`] groups the static parameters that control plan
//! execution, project generation and turn handling. Application-layer
//! concerns only; the infrastructure config layer builds one from the
//! loaded file.

use crate::ports::llm_gateway::ChatOptions;
use crate::ports::process_runner::{DEFAULT_MAX_BUFFER_BYTES, DEFAULT_PROCESS_TIMEOUT};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineParams {
    /// Hard timeout for programs run by `code_gen` steps.
    pub code_timeout: Duration,
    /// Cap on captured stdout + stderr of those programs.
    pub max_output_bytes: usize,
    /// Where generated programs are written before running.
    pub scratch_dir: PathBuf,
    /// Generator attempts before falling back.
    pub generation_max_attempts: usize,
    /// Fixed delay between generator attempts.
    pub generation_retry_delay: Duration,
    /// Race each turn against this timeout, if set.
    pub turn_timeout: Option<Duration>,
    /// Write generated project files beneath this directory, if set.
    pub project_root: Option<PathBuf>,
    /// How many recent conversation lines the classifier sees.
    pub context_window: usize,
    /// Options for every provider call.
    pub chat_options: ChatOptions,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            code_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_BUFFER_BYTES,
            scratch_dir: std::env::temp_dir().join("deskpilot"),
            generation_max_attempts: 3,
            generation_retry_delay: Duration::from_secs(2),
            turn_timeout: None,
            project_root: None,
            context_window: 6,
            chat_options: ChatOptions::default(),
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_code_timeout(mut self, timeout: Duration) -> Self {
        self.code_timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_generation_attempts(mut self, attempts: usize) -> Self {
        self.generation_max_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.generation_retry_delay = delay;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_project_root(mut self, root: Option<PathBuf>) -> Self {
        self.project_root = root;
        self
    }

    pub fn with_chat_options(mut self, options: ChatOptions) -> Self {
        self.chat_options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = EngineParams::default();
        assert_eq!(params.code_timeout, Duration::from_secs(30));
        assert_eq!(params.max_output_bytes, 1024 * 1024);
        assert_eq!(params.generation_max_attempts, 3);
        assert_eq!(params.generation_retry_delay, Duration::from_secs(2));
        assert!(params.turn_timeout.is_none());
        assert!(params.project_root.is_none());
        assert!(params.scratch_dir.ends_with("deskpilot"));
    }

    #[test]
    fn test_builder() {
        let params = EngineParams::default()
            .with_generation_attempts(5)
            .with_retry_delay(Duration::ZERO)
            .with_project_root(Some(PathBuf::from("/tmp/out")));

        assert_eq!(params.generation_max_attempts, 5);
        assert_eq!(params.generation_retry_delay, Duration::ZERO);
        assert_eq!(params.project_root, Some(PathBuf::from("/tmp/out")));
    }
}
