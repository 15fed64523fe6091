//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use pagecast_domain::RiskLevel;
use std::path::PathBuf;

/// pagecast: post football news and betting tips to a Facebook Page
#[derive(Parser, Debug)]
#[command(name = "pagecast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a football headline and post it
    News(RunArgs),

    /// Pick a bet from bookmaker odds and post it
    Tips(TipsArgs),

    /// Show recorded runs
    History(HistoryArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Compose the post and record the run without publishing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct TipsArgs {
    /// Risk level of the pick (safe, value, risky)
    #[arg(long, default_value = "safe")]
    pub risk: RiskLevel,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show the most recent N runs
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (file plus environment overrides)
    Show,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also call the Graph API to confirm the page token works
    #[arg(long)]
    pub online: bool,
}
