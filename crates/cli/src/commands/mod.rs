//! CLI subcommands

mod rules;
mod send;
mod serve;

pub use rules::RulesCommand;
pub use send::SendCommand;
pub use serve::ServeCommand;
