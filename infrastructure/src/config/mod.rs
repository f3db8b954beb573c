//! Configuration file loading for deskpilot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DESKPILOT_*` environment variables (e.g. `DESKPILOT_PROVIDER__MODEL`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./deskpilot.toml` or `./.deskpilot.toml`
//! 4. Global config: `$XDG_CONFIG_HOME/deskpilot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileExecutionConfig, FileGenerationConfig,
    FileLoggingConfig, FileOutputConfig, FileProviderConfig,
};
pub use loader::ConfigLoader;
