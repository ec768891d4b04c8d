//! CLI entrypoint for marvin-bridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use marvin_application::ToolExecutorPort;
use marvin_domain::ToolCall;
use marvin_infrastructure::{
    ConfigLoader, CouchDbStore, FileConfig, MarvinApiClient, MarvinToolExecutor, default_tool_spec,
};
use marvin_presentation::{
    Cli, Command, ConsoleFormatter, McpServer, OutputFormatter, parse_arguments,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    info!("Starting marvin-bridge");

    let config = load_config(&cli)?;

    if cli.show_config {
        show_config(&config, &cli)?;
        return Ok(ExitCode::SUCCESS);
    }

    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        marvin_presentation::output::disable_color();
    }
    let format = config.output.resolve_format(cli.output.map(Into::into));
    let formatter = ConsoleFormatter::new(format).with_debug(cli.debug);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Command::Tools => {
            println!("{}", formatter.format_tools(&default_tool_spec()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { tool, args, json } => {
            let arguments = parse_arguments(&args, json.as_deref())?;
            let call = ToolCall {
                tool_name: tool,
                arguments,
            };

            // === Dependency Injection ===
            let executor = build_executor(&config)?;
            let result = executor.execute(&call).await;

            println!("{}", formatter.format(&result));
            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Serve => {
            let executor = build_executor(&config)?;
            McpServer::new(executor)
                .run()
                .await
                .context("MCP server failed")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Log to stderr so stdout carries only tool output.
///
/// `RUST_LOG` takes precedence over the `-v` count.
fn init_logging(verbose: u8) -> WorkerGuard {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let config = config.map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    debug!(
        base_url = %config.api.base_url,
        store_configured = config.store_credentials().is_complete(),
        "Configuration loaded"
    );
    Ok(config)
}

fn show_config(config: &FileConfig, cli: &Cli) -> Result<()> {
    if !cli.no_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
    }
    let rendered = toml::to_string_pretty(&config.masked()).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

fn build_executor(config: &FileConfig) -> Result<MarvinToolExecutor<MarvinApiClient, CouchDbStore>> {
    let api_key = config.require_api_key()?;
    let timeout = Duration::from_secs(config.api.timeout_seconds);

    let mut client = MarvinApiClient::new(&config.api.base_url, api_key, timeout)?;
    if let Some(token) = config.api.full_access_token() {
        client = client.with_full_access_token(token)?;
    }
    debug!(full_access = client.has_full_access(), "API client ready");
    let service = Arc::new(client);
    let store = Arc::new(CouchDbStore::new(config.store_credentials(), timeout)?);

    Ok(MarvinToolExecutor::new(
        service,
        store,
        config.store_credentials(),
        config.aggregation_settings(),
    ))
}
