//! pagecast CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod args;
mod commands;
mod config;

use args::{Cli, Commands, LogFormat};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load errors surface from the command itself
    let configured = AppConfig::load(cli.config.as_deref())
        .ok()
        .map(|config| config.general.log_level);
    let log_level = effective_log_level(cli.log_level.as_deref(), configured);
    init_logging(&log_level, cli.log_format)?;

    match cli.command {
        Commands::News(args) => commands::run::execute_news(args, cli.config).await,
        Commands::Tips(args) => commands::run::execute_tips(args, cli.config).await,
        Commands::History(args) => commands::history::execute(args, cli.config).await,
        Commands::Config(args) => commands::config::execute(args, cli.config).await,
        Commands::Doctor(args) => commands::doctor::execute(args, cli.config).await,
    }
}

/// `--log-level`, then the config file, then `info`; `RUST_LOG` still wins
fn effective_log_level(flag: Option<&str>, configured: Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| configured.filter(|level| !level.trim().is_empty()))
        .unwrap_or_else(|| "info".to_string())
}

fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init(),
    }

    Ok(())
}
