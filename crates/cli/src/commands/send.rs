//! vesta send command

use crate::dry_run::DryRunDispatcher;
use clap::Args;
use console::style;
use gateway::{ControllerClient, Dispatch};
use pipeline::CommandPipeline;
use shared::{Command, ConsoleLogger, VestaConfig};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct SendCommand {
    /// Command text, e.g. "turn on the living room lights"
    pub command: String,

    /// Session id to run under (a fresh one is generated when omitted)
    #[arg(short, long)]
    pub session: Option<String>,

    /// Resolve and print the actuation without calling the controller
    #[arg(long)]
    pub dry_run: bool,
}

impl SendCommand {
    pub async fn run(&self, config: VestaConfig) -> anyhow::Result<()> {
        let dispatcher: Arc<dyn Dispatch> = if self.dry_run {
            Arc::new(DryRunDispatcher)
        } else {
            let token = config.controller.token()?;
            Arc::new(ControllerClient::new(&config.controller, token)?)
        };

        let pipeline = CommandPipeline::new(&config, dispatcher, Arc::new(ConsoleLogger))?;

        let session_id = self
            .session
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        match pipeline
            .handle(Command::new(self.command.clone(), session_id))
            .await
        {
            Ok(outcome) => {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                Ok(())
            }
            Err(e) => {
                eprintln!("{} {}: {}", style("rejected").red(), e.category(), e);
                anyhow::bail!("command rejected at the {} stage", e.category());
            }
        }
    }
}
