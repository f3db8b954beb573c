//! Infrastructure layer for deskpilot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod fs;
pub mod logging;
pub mod process;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExecutionConfig, FileGenerationConfig,
    FileLoggingConfig, FileOutputConfig, FileProviderConfig,
};
pub use fs::LocalFileSystem;
pub use logging::JsonlConversationLogger;
pub use process::TokioProcessRunner;
pub use providers::{OpenAiConfig, OpenAiGateway};
pub use tools::{LocalToolExecutor, default_tool_spec};
