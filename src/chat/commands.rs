//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the API.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Set the API key for this session.  `None` asks for it with hidden input.
    Key(Option<String>),

    /// Attach an image file to the next submission.
    Image(String),

    /// Remove the attached image.
    Detach,

    /// Render the whole conversation again.
    History,

    /// Clear the conversation history.
    Clear,

    /// Change the model.
    Model(String),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

impl ChatCommand {
    /// Returns true if the command line carries a secret and must stay out of
    /// the line editor's history.
    pub fn is_secret(&self) -> bool {
        matches!(self, ChatCommand::Key(_))
    }
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use geminichat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/image cat.png").is_some());
/// assert!(parse_command("What is in this picture?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "key" => ChatCommand::Key(argument.map(str::to_string)),
        "image" | "img" => match argument {
            Some(path) => ChatCommand::Image(path.to_string()),
            None => ChatCommand::Invalid("/image requires a file path".to_string()),
        },
        "detach" => ChatCommand::Detach,
        "history" => ChatCommand::History,
        "clear" => ChatCommand::Clear,
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /key [api-key]         Set the Gemini API key; without one, prompts with hidden input
  /image <path>          Attach a JPG, PNG, or WEBP image to the next message
  /detach                Remove the attached image
  /history               Show the whole conversation again
  /clear                 Clear conversation history
  /model <name>          Change the model (e.g., /model gemini-2.5-pro)
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat

Type a message and press Enter to send it with the attached image.
Press Enter on an empty line to send the pending message or image."#
}
