use std::str::FromStr;

use crate::events::AppEvent;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a line with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Start a new session
    New,
    /// Select or list example categories
    Category,
    /// Show example prompts for the active category
    Examples,
    /// Send one of the example prompts
    Example,
    /// Show the last raw API response
    Raw,
    /// Show the last secondary payload
    Data,
    /// Dump the session state
    Debug,
    /// Show the session id
    Session,
    /// Show the conversation so far
    History,
    /// Show help
    Help,
    /// Exit the application
    Bye,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Turn the command into the event it requests
    pub fn into_event(self) -> Result<AppEvent, String> {
        let event = match self.command {
            SlashCommand::New => AppEvent::NewSession,
            SlashCommand::Category => match self.argument {
                Some(name) => AppEvent::SelectCategory { name },
                None => AppEvent::ListCategories,
            },
            SlashCommand::Examples => AppEvent::ShowExamples,
            SlashCommand::Example => {
                let arg = self
                    .argument()
                    .ok_or_else(|| "Usage: /example <number>".to_string())?;
                let index = arg
                    .parse::<usize>()
                    .map_err(|_| format!("'{arg}' is not an example number"))?;
                AppEvent::SubmitExample { index }
            }
            SlashCommand::Raw => AppEvent::ShowRaw,
            SlashCommand::Data => AppEvent::ShowData,
            SlashCommand::Debug => AppEvent::ShowDebug,
            SlashCommand::Session => AppEvent::ShowSession,
            SlashCommand::History => AppEvent::ShowHistory,
            SlashCommand::Help => AppEvent::ShowHelp,
            SlashCommand::Bye => AppEvent::ExitRequest,
        };
        Ok(event)
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::New => "start a new session (fresh id, empty history)",
            SlashCommand::Category => "select an example category, or list them without an argument",
            SlashCommand::Examples => "show example prompts for the active category",
            SlashCommand::Example => "send example prompt <n> of the active category",
            SlashCommand::Raw => "show the last raw API response",
            SlashCommand::Data => "show the last full_data payload",
            SlashCommand::Debug => "dump the session state as JSON",
            SlashCommand::Session => "show the session id",
            SlashCommand::History => "show the conversation so far",
            SlashCommand::Help => "show available commands",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Return all built-in commands paired with their command string.
pub fn built_in_slash_commands() -> Vec<(&'static str, SlashCommand)> {
    SlashCommand::iter().map(|c| (c.command(), c)).collect()
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let rest = input.trim().strip_prefix('/')?;

    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let rest: Vec<&str> = parts.collect();

    let command = SlashCommand::from_str(head).ok().or_else(|| match head.to_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "reset" | "n" => Some(SlashCommand::New),
        "c" | "cat" => Some(SlashCommand::Category),
        "ex" => Some(SlashCommand::Example),
        "h" | "?" => Some(SlashCommand::Help),
        _ => None,
    })?;

    let argument = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    Some(ParsedCommand { command, argument })
}

/// Map a line of input to an event. Anything not starting with '/' is a prompt.
pub fn interpret(line: &str) -> Result<AppEvent, String> {
    if !line.trim_start().starts_with('/') {
        return Ok(AppEvent::SubmitPrompt {
            text: line.to_string(),
        });
    }

    match parse_slash_command(line) {
        Some(parsed) => parsed.into_event(),
        None => Err(format!(
            "Unknown command '{}'. Type /help for the list.",
            line.trim()
        )),
    }
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Available commands:\n\n");
    for (command_str, command) in built_in_slash_commands() {
        help.push_str(&format!("/{} - {}\n", command_str, command.description()));
    }

    help.push_str("\nAliases: /q for /bye, /reset for /new, /c for /category, /ex for /example");
    help.push_str("\nAnything else you type is sent to the assistant.");

    help
}
