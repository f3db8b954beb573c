//! Built-in tools for plan steps
//!
//! File access, directory listing, glob search and shell commands, exposed
//! through [`LocalToolExecutor`]. Desktop-flavoured aliases map onto the
//! canonical names.

pub mod command;
pub mod file;
pub mod search;

mod executor;

pub use executor::LocalToolExecutor;

use deskpilot_domain::ToolSpec;

/// Alternate names plans commonly use for the built-in tools
pub const TOOL_ALIASES: [(&str, &str); 6] = [
    ("file_writer", file::WRITE_FILE),
    ("file_reader", file::READ_FILE),
    ("terminal", command::RUN_COMMAND),
    ("shell", command::RUN_COMMAND),
    ("list_files", file::LIST_DIRECTORY),
    ("find_files", search::GLOB_SEARCH),
];

/// Create the default tool specification with all available tools
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(file::read_file_definition())
        .register(file::write_file_definition())
        .register(file::list_directory_definition())
        .register(command::run_command_definition())
        .register(search::glob_search_definition())
        .register_aliases(TOOL_ALIASES)
}
