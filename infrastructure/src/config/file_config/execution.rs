//! Execution configuration from TOML (`[execution]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw plan execution configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Hard timeout for generated programs
    pub code_timeout_secs: u64,
    /// Cap on captured program output
    pub max_output_bytes: usize,
    /// Scratch directory for generated programs (default: system temp dir)
    pub scratch_dir: Option<PathBuf>,
    /// Abandon a turn after this many seconds (default: never)
    pub turn_timeout_secs: Option<u64>,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            code_timeout_secs: 30,
            max_output_bytes: 1024 * 1024,
            scratch_dir: None,
            turn_timeout_secs: None,
        }
    }
}
