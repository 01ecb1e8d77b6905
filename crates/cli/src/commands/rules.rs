//! vesta rules command

use clap::{Args, Subcommand};
use console::style;
use lexicon::{permitted_domain, EntityLexicon};
use nlu::{IntentClassifier, RuleTable};
use shared::VestaConfig;

#[derive(Debug, Args)]
pub struct RulesCommand {
    #[command(subcommand)]
    pub command: RulesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesSubcommand {
    /// List rules in evaluation order
    List,
    /// Validate the configured rule table and lexicon
    Check,
    /// Show which rule a given text would match
    Explain {
        /// Command text to classify
        text: String,
    },
}

impl RulesCommand {
    pub fn run(&self, config: &VestaConfig) -> anyhow::Result<()> {
        let table = match &config.rules_path {
            Some(path) => RuleTable::from_yaml(path)?,
            None => RuleTable::builtin()?,
        };

        match &self.command {
            RulesSubcommand::List => {
                for rule in table.rules() {
                    println!(
                        "{:>4}  {:<16}  {}",
                        rule.priority(),
                        rule.intent().as_str(),
                        rule.pattern_str()
                    );
                }
            }

            RulesSubcommand::Check => {
                let lexicon = match &config.lexicon_path {
                    Some(path) => EntityLexicon::from_yaml(path)?,
                    None => EntityLexicon::builtin(),
                };

                let violations: Vec<&str> = lexicon
                    .all_entity_ids()
                    .into_iter()
                    .filter(|id| permitted_domain(id).is_err())
                    .collect();

                println!("{} rules loaded", table.len());
                println!("{} lexicon entity ids", lexicon.all_entity_ids().len());

                if !violations.is_empty() {
                    for id in &violations {
                        println!("{} {}", style("not permitted:").red(), id);
                    }
                    anyhow::bail!(
                        "{} lexicon entries outside the domain allow-list",
                        violations.len()
                    );
                }
                println!(
                    "{}",
                    style("ok: all entity ids inside the domain allow-list").green()
                );
            }

            RulesSubcommand::Explain { text } => {
                let classifier = IntentClassifier::new(table);
                let normalized = text.trim().to_lowercase();

                match classifier.match_rule(&normalized) {
                    Some(rule) => println!(
                        "rule {} matches: intent {}",
                        rule.priority(),
                        rule.intent().as_str()
                    ),
                    None => println!("no rule matches; command would be unknown_command"),
                }
            }
        }

        Ok(())
    }
}
