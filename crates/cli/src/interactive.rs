//! Interactive dry-run console
//!
//! Runs the full pipeline locally with the dry-run dispatcher, so nothing
//! typed here ever actuates a real device.

use crate::dry_run::DryRunDispatcher;
use console::style;
use dialoguer::Input;
use pipeline::CommandPipeline;
use shared::{Command, NullLogger, VestaConfig};
use std::sync::Arc;

pub struct InteractiveCli {
    pipeline: CommandPipeline,
    session_id: String,
}

impl InteractiveCli {
    pub fn new(config: VestaConfig) -> anyhow::Result<Self> {
        let pipeline =
            CommandPipeline::new(&config, Arc::new(DryRunDispatcher), Arc::new(NullLogger))?;

        Ok(Self {
            pipeline,
            session_id: uuid::Uuid::new_v4().to_string(),
        })
    }

    /// Run the console loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("VESTA Interactive Mode (dry-run)");
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            let input: String = Input::new()
                .with_prompt(self.prompt())
                .allow_empty(true)
                .interact_text()?;
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                match self.handle_command(input) {
                    Ok(true) => break,
                    Ok(false) => continue,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                }
            }

            match self
                .pipeline
                .handle(Command::new(input, self.session_id.clone()))
                .await
            {
                Ok(outcome) => {
                    if outcome.result.success {
                        println!("{} {}", style("ok").green(), outcome.result.message);
                    } else {
                        println!("{} {}", style("--").yellow(), outcome.result.message);
                    }
                }
                Err(e) => {
                    println!("{} {}: {}", style("rejected").red(), e.category(), e);
                }
            }
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        // First uuid segment is plenty to tell sessions apart
        let short = self.session_id.split('-').next().unwrap_or("session");
        format!("[{}]", short)
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /rules     - Show the rule table summary");
                println!("  /session   - Show current session state");
                println!("  /new       - Start a fresh session");
                println!("  /audit     - Show recent audit events");
                println!("  /quit      - Exit");
                println!("Anything else is run through the pipeline (dry-run).");
            }
            "/rules" => {
                let table = self.pipeline.classifier().table();
                println!("{} rules loaded:", table.len());
                for rule in table.rules() {
                    println!("  {:>4}  {}", rule.priority(), rule.intent().as_str());
                }
            }
            "/session" => match self.pipeline.governor().session(&self.session_id) {
                Some(session) => {
                    println!("Session {}:", session.session_id);
                    println!("  commands: {}", session.command_count);
                    println!("  started:  {}", session.created_at.to_rfc3339());
                }
                None => println!("Session {} has no commands yet", self.session_id),
            },
            "/new" => {
                self.session_id = uuid::Uuid::new_v4().to_string();
                println!("New session: {}", self.session_id);
            }
            "/audit" => {
                let events = self.pipeline.audit().recent(10);
                if events.is_empty() {
                    println!("No audit events yet");
                }
                for event in events {
                    println!(
                        "  {} {} {} [{}]",
                        event.timestamp,
                        event.intent.as_str(),
                        event.entity_id.as_deref().unwrap_or("-"),
                        event.stage
                    );
                }
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }
}
