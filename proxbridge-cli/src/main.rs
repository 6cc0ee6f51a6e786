///! Proxbridge CLI
///!
///! Offline inspection of how host records map onto Proxmox guests

mod commands;
mod input;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::OutputFormat;
use proxbridge_common::ComputeType;
use proxbridge_core::logging::LoggingConfig;
use proxbridge_core::ProxbridgeConfig;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a host's interfaces to NIC attributes
    Interfaces {
        /// Host record file (.json, .yaml or .toml)
        host: PathBuf,
    },
    /// Build the compute attributes of a host's guest
    ComputeAttrs {
        /// Host record file (.json, .yaml or .toml)
        host: PathBuf,
    },
    /// Show the config attributes a save would send
    Diff {
        /// Current guest config file
        existing: PathBuf,
        /// Requested compute attributes file
        request: PathBuf,
        /// Guest type (defaults to the request's type)
        #[arg(short = 't', long = "type", value_parser = parse_compute_type)]
        compute_type: Option<ComputeType>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a sample configuration file
    Sample,
    /// Validate the configuration
    Check,
}

fn parse_compute_type(s: &str) -> Result<ComputeType, String> {
    s.parse().map_err(|e: proxbridge_common::Error| e.to_string())
}

fn load_config(path: Option<&PathBuf>) -> Result<ProxbridgeConfig> {
    match path {
        Some(path) => ProxbridgeConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => ProxbridgeConfig::load().context("Failed to load configuration"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;

    let mut logging = LoggingConfig::from(&config.logging);
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    let _guard = logging
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config_source = cli
        .config
        .clone()
        .or_else(ProxbridgeConfig::find_config_file);
    match &config_source {
        Some(path) => info!(path = %path.display(), "Loaded configuration file"),
        None => debug!("No configuration file found, using defaults and environment"),
    }

    match cli.command {
        Commands::Interfaces { host } => {
            commands::interfaces::handle_interfaces_command(&host, cli.output)?
        }
        Commands::ComputeAttrs { host } => {
            commands::compute::handle_compute_attrs_command(&host, &config, cli.output)?
        }
        Commands::Diff {
            existing,
            request,
            compute_type,
        } => commands::diff::handle_diff_command(&existing, &request, compute_type, cli.output)?,
        Commands::Config { command } => {
            commands::config::handle_config_command(command, &config, config_source.as_ref())?
        }
    }

    Ok(())
}
