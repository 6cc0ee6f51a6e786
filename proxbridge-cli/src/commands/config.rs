///! Configuration commands

use crate::output;
use crate::ConfigCommands;
use anyhow::Result;
use proxbridge_core::config::ProxbridgeConfig;
use std::path::PathBuf;

pub fn handle_config_command(
    command: ConfigCommands,
    config: &ProxbridgeConfig,
    path: Option<&PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommands::Sample => {
            print!("{}", ProxbridgeConfig::generate_sample());
        }

        ConfigCommands::Check => {
            config.validate()?;

            let source = path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults and environment".to_string());
            output::print_success(&format!("Configuration from {} is valid", source));
            output::print_info(&format!(
                "Connecting to {} as {}",
                config.connection.url, config.connection.user
            ));
        }
    }

    Ok(())
}
