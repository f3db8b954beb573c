//! Presentation layer for deskpilot
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the terminal prompt for `user_input` steps.

pub mod cli;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use input::TerminalUserInput;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
