//! Line-oriented terminal surface over the chat agent

pub mod commands;
pub mod panels;
pub mod repl;

pub use commands::{get_help_text, interpret, parse_slash_command, ParsedCommand, SlashCommand};
pub use repl::{handle_event, run, Flow};
