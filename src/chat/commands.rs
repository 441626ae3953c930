//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the backend.

use crate::types::DEFAULT_SEARCH_RESULTS;

/// A parsed chat command.
///
/// These commands control the chat session and are not sent as chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Leave the current channel and pick another one.
    Reset,

    /// Search the backend for channels.
    Search {
        /// Free-text query.
        query: String,
        /// Number of results to ask for.
        max_results: u32,
    },

    /// Check backend health.
    Health,

    /// Show the metadata of the current channel.
    Info,

    /// Print the local message log.
    History,

    /// Fetch the server-side transcript of the current conversation.
    Conversation,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use channelchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/search rust talks").is_some());
/// assert!(parse_command("What is your latest video about?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "reset" | "change" => ChatCommand::Reset,
        "search" => parse_search(argument),
        "health" => ChatCommand::Health,
        "info" => ChatCommand::Info,
        "history" => ChatCommand::History,
        "conversation" => ChatCommand::Conversation,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

// `/search [-n <count>] <query>`
fn parse_search(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/search requires a query".to_string());
    };

    let (max_results, query) = match arg.strip_prefix("-n ") {
        Some(rest) => {
            let rest = rest.trim_start();
            let (count, query) = rest.split_once(' ').unwrap_or((rest, ""));
            match count.parse::<u32>() {
                Ok(n) if n > 0 => (n, query.trim()),
                _ => {
                    return ChatCommand::Invalid(
                        "/search -n expects a positive integer".to_string(),
                    );
                }
            }
        }
        None => (DEFAULT_SEARCH_RESULTS, arg),
    };

    if query.is_empty() {
        return ChatCommand::Invalid("/search requires a query".to_string());
    }
    ChatCommand::Search {
        query: query.to_string(),
        max_results,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /reset                 Leave this channel and pick another (alias: /change)
  /search [-n N] <query> Search for channels
  /health                Check the backend
  /info                  Show channel details
  /history               Show the messages of this session
  /conversation          Show the server-side transcript
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_reset() {
        assert_eq!(parse_command("/reset"), Some(ChatCommand::Reset));
        assert_eq!(parse_command("/change"), Some(ChatCommand::Reset));
        assert_eq!(parse_command("/RESET"), Some(ChatCommand::Reset));
    }

    #[test]
    fn parse_search() {
        assert_eq!(
            parse_command("/search  rust conference talks "),
            Some(ChatCommand::Search {
                query: "rust conference talks".to_string(),
                max_results: DEFAULT_SEARCH_RESULTS,
            })
        );
        assert_eq!(
            parse_command("/search -n 10 cooking"),
            Some(ChatCommand::Search {
                query: "cooking".to_string(),
                max_results: 10,
            })
        );
        assert!(matches!(
            parse_command("/search"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/search -n 0 cooking"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("positive")
        ));
        assert!(matches!(
            parse_command("/search -n 3"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_info_commands() {
        assert_eq!(parse_command("/health"), Some(ChatCommand::Health));
        assert_eq!(parse_command("/info"), Some(ChatCommand::Info));
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(
            parse_command("/conversation"),
            Some(ChatCommand::Conversation)
        );
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/model gpt"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello there!"), None);
        assert_eq!(parse_command("@SomeCreator"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/reset"));
        assert!(help.contains("/search"));
        assert!(help.contains("/conversation"));
    }
}
