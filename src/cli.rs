//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, SnippetCommands, TopicCommands};
pub use presentation::StatusSummary;
pub use route::RunContext;
