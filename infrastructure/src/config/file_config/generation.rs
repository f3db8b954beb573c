//! Project generation configuration from TOML (`[generation]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw project generation configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Generator attempts before the fallback project is used
    pub max_attempts: usize,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Write generated projects beneath this directory
    pub project_root: Option<PathBuf>,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 2000,
            project_root: None,
        }
    }
}
