use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

pub fn handle_config_command(cmd: ConfigCommands, dir: &Path) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            let path = CliConfig::path_in(dir);
            if path.exists() && !force {
                println!("Config already exists at {}", path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }
            let path = CliConfig::default().save(dir)?;
            println!("Wrote default config to {}", path.display());
        }

        ConfigCommands::Show => {
            let config = CliConfig::load_or_default(dir)?;
            println!("# {}", CliConfig::path_in(dir).display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
