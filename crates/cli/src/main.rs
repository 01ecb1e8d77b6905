//! VESTA CLI - Voice command gateway for home automation
//!
//! Usage:
//!   vesta                          - Start interactive dry-run console
//!   vesta serve                    - Start the HTTP command API
//!   vesta send "<command>"         - Run one command against the controller
//!   vesta rules list               - Print the rule table in match order
//!   vesta rules check              - Validate configured rules and lexicon
//!   vesta rules explain "<text>"   - Show which rule a text would match

use clap::{Parser, Subcommand};
use cli::commands::{RulesCommand, SendCommand, ServeCommand};
use cli::interactive::InteractiveCli;
use shared::VestaConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "vesta")]
#[command(about = "VESTA - Voice command gateway for home automation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to vesta.yaml (builtin defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP command API
    Serve(ServeCommand),
    /// Send a single command through the pipeline
    Send(SendCommand),
    /// Inspect and lint the intent rule table
    Rules(RulesCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve(cmd)) => cmd.run(config).await,
        Some(Commands::Send(cmd)) => cmd.run(config).await,
        Some(Commands::Rules(cmd)) => cmd.run(&config),
        None => {
            // No subcommand - start the interactive console
            let mut interactive = InteractiveCli::new(config)?;
            interactive.run().await
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<VestaConfig> {
    match path {
        Some(path) => Ok(VestaConfig::from_file(path)?),
        None => Ok(VestaConfig::default()),
    }
}
