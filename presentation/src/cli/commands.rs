//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for turn results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Intent, plan, step results and artifacts
    Full,
    /// Only the response
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for deskpilot_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => deskpilot_domain::OutputFormat::Full,
            OutputFormat::Summary => deskpilot_domain::OutputFormat::Summary,
            OutputFormat::Json => deskpilot_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for deskpilot
#[derive(Parser, Debug)]
#[command(name = "deskpilot")]
#[command(author, version, about = "Desktop assistant that turns requests into executed plans")]
#[command(long_about = r#"
deskpilot classifies a request, answers it directly or builds a step plan,
then runs the plan: tool calls, generated programs, file operations and
provider queries. Requests to build an app produce a complete project.

Configuration files are loaded from (in priority order):
1. DESKPILOT_* environment variables
2. --config <path>          Explicit config file
3. ./deskpilot.toml         Project-level config
4. ~/.config/deskpilot/config.toml   Global config

Example:
  deskpilot "what's in my Downloads folder?"
  deskpilot --project-root ~/code "build me a recipe tracker app"
  deskpilot -o json "summarize notes.md"
"#)]
pub struct Cli {
    /// The request to handle
    pub request: Option<String>,

    /// Output format (default: from config, else summary)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write generated projects beneath this directory
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}
