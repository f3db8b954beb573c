//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into [`EngineParams`]
//! once validated.

mod execution;
mod generation;
mod logging;
mod output;
mod provider;

pub use execution::FileExecutionConfig;
pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;

use deskpilot_application::EngineParams;
use deskpilot_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Chat completions provider
    pub provider: FileProviderConfig,
    /// Plan execution settings
    pub execution: FileExecutionConfig,
    /// Project generation settings
    pub generation: FileGenerationConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.provider.issues();

        if self.execution.code_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "execution.code_timeout_secs cannot be 0",
            ));
        }
        if self.execution.turn_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "execution.turn_timeout_secs cannot be 0",
            ));
        }
        if self.generation.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroAttempts,
                "generation.max_attempts must be at least 1",
            ));
        }

        issues.extend(self.output.parse_format().1);
        issues
    }

    /// Validate, failing on errors and handing back the warnings.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(|i| i.is_error());
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(
                errors.into_iter().map(|i| i.message).collect(),
            ))
        }
    }

    /// Convert into runtime parameters for the engine.
    pub fn to_engine_params(&self) -> EngineParams {
        let mut params = EngineParams::default()
            .with_code_timeout(Duration::from_secs(self.execution.code_timeout_secs))
            .with_max_output_bytes(self.execution.max_output_bytes)
            .with_generation_attempts(self.generation.max_attempts)
            .with_retry_delay(Duration::from_millis(self.generation.retry_delay_ms))
            .with_turn_timeout(self.execution.turn_timeout_secs.map(Duration::from_secs))
            .with_project_root(self.generation.project_root.clone())
            .with_chat_options(self.provider.chat_options());
        if let Some(dir) = &self.execution.scratch_dir {
            params = params.with_scratch_dir(dir);
        }
        params
    }
}
