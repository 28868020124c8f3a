//! Commands typed into the interactive session.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Submit(String),
    Replace(String),
    Cancel,
    Clear,
    Health,
    Help,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit(_) => "submit",
            Self::Replace(_) => "replace",
            Self::Cancel => "cancel",
            Self::Clear => "clear",
            Self::Health => "health",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Unknown(_) => "unknown",
        }
    }
}

pub const HELP_TEXT: &str = "\
Type a question and press Enter to ask it.
  :cancel           cancel the pending question
  :clear            drop the current answer or pending question
  :replace <text>   ask <text> instead of the pending question
  :health           check that the query service is up
  :help             show this help
  :quit             exit";

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(directive) = line.strip_prefix(':') else {
        return Some(SessionCommand::Submit(line.to_string()));
    };

    let (name, rest) = directive
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((directive, ""));

    let command = match name.to_ascii_lowercase().as_str() {
        "cancel" | "c" => SessionCommand::Cancel,
        "clear" => SessionCommand::Clear,
        "replace" | "r" => SessionCommand::Replace(rest.to_string()),
        "health" => SessionCommand::Health,
        "help" | "h" | "?" => SessionCommand::Help,
        "quit" | "q" | "exit" => SessionCommand::Quit,
        _ => SessionCommand::Unknown(line.to_string()),
    };
    Some(command)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
