//! CLI entrypoint for deskpilot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use deskpilot_application::{
    ConversationLogger, GenerationProgressNotifier, HandleRequestUseCase, PlanProgressNotifier,
};
use deskpilot_domain::OutputFormat;
use deskpilot_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, LocalFileSystem, LocalToolExecutor,
    OpenAiConfig, OpenAiGateway, TokioProcessRunner,
};
use deskpilot_presentation::{
    Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, SimpleProgress, TerminalUserInput,
};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    for issue in config.check()? {
        warn!("{}", issue.message);
    }

    let Some(request) = cli.request.as_deref() else {
        bail!("A request is required, e.g. deskpilot \"list the files in ~/Downloads\"");
    };

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.parse_format().0)
        .unwrap_or_default();

    info!(model = %config.provider.model, "Starting deskpilot");

    let use_case = build_use_case(&config, &cli)?;
    let outcome = use_case.handle(request).await;

    println!("{}", ConsoleFormatter.render(&outcome, format));

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

// ==================== Dependency Injection ====================

fn build_use_case(config: &FileConfig, cli: &Cli) -> Result<HandleRequestUseCase> {
    let mut params = config.to_engine_params();
    if let Some(root) = &cli.project_root {
        params = params.with_project_root(Some(root.clone()));
    }

    let gateway = Arc::new(OpenAiGateway::new(OpenAiConfig {
        base_url: config.provider.base_url.clone(),
        api_key: config.provider.api_key(),
        model: config.provider.model.clone(),
        timeout: Duration::from_secs(config.provider.timeout_secs),
    })?);
    let processes = Arc::new(TokioProcessRunner::new());
    let tools = Arc::new(
        LocalToolExecutor::new(processes.clone()).with_max_output_bytes(params.max_output_bytes),
    );
    let files = Arc::new(LocalFileSystem::new());

    let mut use_case = HandleRequestUseCase::new(gateway, tools, processes, files, params)
        .with_user_input(Arc::new(TerminalUserInput::new()));

    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::open(path)
    {
        info!("Conversation log: {}", logger.path().display());
        use_case = use_case.with_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
    }

    if !cli.quiet {
        let (plan, generation): (
            Arc<dyn PlanProgressNotifier>,
            Arc<dyn GenerationProgressNotifier>,
        ) = if std::io::stderr().is_terminal() {
            let reporter = Arc::new(ProgressReporter::new());
            (
                reporter.clone() as Arc<dyn PlanProgressNotifier>,
                reporter as Arc<dyn GenerationProgressNotifier>,
            )
        } else {
            (
                Arc::new(SimpleProgress) as Arc<dyn PlanProgressNotifier>,
                Arc::new(SimpleProgress) as Arc<dyn GenerationProgressNotifier>,
            )
        };
        use_case = use_case
            .with_plan_progress(plan)
            .with_generation_progress(generation);
    }

    Ok(use_case)
}
