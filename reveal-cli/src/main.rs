mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use reveal_core::{Address, GameKind};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reveal")]
#[command(about = "Deterministic outcome reveal for Entropy-settled games")]
#[command(version)]
struct Cli {
    /// Directory holding config.json
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the seed for a settled event
    Seed(commands::EventArgs),
    /// Shuffle and deal the poker variant
    Deal(commands::EventArgs),
    /// Lay out the mines grid for a settled event
    Mines(commands::EventArgs),
    /// Plan the wheel spin for a settled event
    Wheel {
        #[command(flatten)]
        event: commands::EventArgs,
        /// Number of wheel segments
        #[arg(long)]
        segments: Option<u16>,
        /// Current wheel rotation in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        from: f64,
    },
    /// Replay a recorded input log through a session
    Replay {
        /// JSON array of session inputs
        log: PathBuf,
        /// Local player address
        #[arg(short, long)]
        player: Option<Address>,
        /// Game variant (poker, wheel, mines)
        #[arg(short, long)]
        game: Option<GameKind>,
    },
    /// Configuration commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "reveal={},reveal_core={},reveal_session={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(CliConfig::default_dir);

    let result = run(cli.command, &data_dir).await;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, data_dir: &Path) -> anyhow::Result<()> {
    let load = || CliConfig::load_or_default(data_dir);

    match command {
        Commands::Seed(event) => commands::handle_seed(&event, &load()?),
        Commands::Deal(event) => commands::handle_deal(&event, &load()?),
        Commands::Mines(event) => commands::handle_mines(&event, &load()?),
        Commands::Wheel {
            event,
            segments,
            from,
        } => commands::handle_wheel(&event, segments, from, &load()?),
        Commands::Replay { log, player, game } => {
            commands::handle_replay(&log, player, game, &load()?).await
        }
        Commands::Config(cmd) => commands::handle_config_command(cmd, data_dir),
    }
}
