//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction over the terminal.
//! Renderers only consume session state; they never change it.

use std::io::{self, Stdout, Write};

use crate::types::{ChannelInfo, Message, Sender};

/// ANSI escape code for bold text (used for the channel header).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for hints and the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for hints).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the channel speaker label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors and the avatar).
const ANSI_RED: &str = "\x1b[31m";

/// Returns to column zero and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Title shown when the channel has none.
pub const DEFAULT_TITLE: &str = "Channel assistant";

/// Avatar shown when the channel has no usable title.
pub const DEFAULT_AVATAR: &str = "YT";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print the header of an active session.
    fn print_header(&mut self, info: Option<&ChannelInfo>);

    /// Print a startup hint.
    fn print_hint(&mut self, hint: &str);

    /// Print one message of the log.
    fn print_message(&mut self, message: &Message, info: Option<&ChannelInfo>);

    /// Show the indicator for a pending reply.
    ///
    /// The indicator is cleared by the next thing printed.
    fn print_thinking(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    thinking: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            thinking: false,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clear_thinking(&mut self) {
        if self.thinking {
            if self.use_color {
                print!("{ANSI_CLEAR_LINE}");
            } else {
                println!();
            }
            self.thinking = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_header(&mut self, info: Option<&ChannelInfo>) {
        self.clear_thinking();
        let title = display_title(info);
        let avatar = avatar_initial(info);
        let subscribers = info
            .and_then(|info| info.subscriber_count.as_deref())
            .map(|count| format!(" · {} subscribers", format_subscriber_count(count)))
            .unwrap_or_default();
        if self.use_color {
            println!(
                "{ANSI_RED}[{avatar}]{ANSI_RESET} {ANSI_BOLD}{title}{ANSI_RESET}{ANSI_DIM}{subscribers}{ANSI_RESET}"
            );
        } else {
            println!("[{avatar}] {title}{subscribers}");
        }
        println!("Type /help for commands.\n");
    }

    fn print_hint(&mut self, hint: &str) {
        self.clear_thinking();
        if self.use_color {
            println!("{ANSI_DIM}{ANSI_ITALIC}{hint}{ANSI_RESET}");
        } else {
            println!("{hint}");
        }
    }

    fn print_message(&mut self, message: &Message, info: Option<&ChannelInfo>) {
        self.clear_thinking();
        match message.sender {
            Sender::User => println!("You: {}", message.text),
            Sender::Bot => {
                let speaker = display_title(info);
                if self.use_color {
                    println!("{ANSI_CYAN}{speaker}:{ANSI_RESET} {}", message.text);
                } else {
                    println!("{speaker}: {}", message.text);
                }
            }
        }
        self.flush();
    }

    fn print_thinking(&mut self) {
        if self.thinking {
            return;
        }
        if self.use_color {
            print!("{ANSI_DIM}Thinking...{ANSI_RESET}");
        } else {
            print!("Thinking...");
        }
        self.thinking = true;
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_thinking();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.clear_thinking();
        println!("{info}");
    }
}

/// Returns the channel title, or the generic assistant title.
pub fn display_title(info: Option<&ChannelInfo>) -> &str {
    info.and_then(|info| info.title.as_deref())
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(DEFAULT_TITLE)
}

/// Returns the avatar text: the uppercased first letter of the title.
pub fn avatar_initial(info: Option<&ChannelInfo>) -> String {
    info.and_then(|info| info.title.as_deref())
        .and_then(|title| title.trim().chars().next())
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| DEFAULT_AVATAR.to_string())
}

/// Inserts thousands separators into a decimal count.
///
/// Anything that is not a plain run of digits is returned unchanged.
///
/// ```
/// # use channelchat::chat::format_subscriber_count;
/// assert_eq!(format_subscriber_count("1234567"), "1,234,567");
/// assert_eq!(format_subscriber_count("hidden"), "hidden");
/// ```
pub fn format_subscriber_count(count: &str) -> String {
    let count = count.trim();
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return count.to_string();
    }
    let digits = count.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One-paragraph description of a channel for `/info` and search results.
pub fn channel_summary(info: &ChannelInfo) -> String {
    let mut lines = vec![display_title(Some(info)).to_string()];
    if let Some(id) = &info.id {
        lines.push(format!("  id:          {id}"));
    }
    if let Some(count) = &info.subscriber_count {
        lines.push(format!("  subscribers: {}", format_subscriber_count(count)));
    }
    if let Some(count) = &info.video_count {
        lines.push(format!("  videos:      {}", format_subscriber_count(count)));
    }
    if let Some(description) = info
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        lines.push(format!("  {description}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::default();
        assert!(renderer.use_color());
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color());
    }

    #[test]
    fn title_falls_back() {
        assert_eq!(display_title(None), DEFAULT_TITLE);
        assert_eq!(display_title(Some(&ChannelInfo::new())), DEFAULT_TITLE);
        assert_eq!(display_title(Some(&ChannelInfo::with_title("  "))), DEFAULT_TITLE);
        assert_eq!(
            display_title(Some(&ChannelInfo::with_title("Some Creator"))),
            "Some Creator"
        );
    }

    #[test]
    fn avatar_uses_first_letter() {
        assert_eq!(avatar_initial(Some(&ChannelInfo::with_title("neetcode"))), "N");
        assert_eq!(avatar_initial(Some(&ChannelInfo::with_title("@SomeCreator"))), "@");
        assert_eq!(avatar_initial(Some(&ChannelInfo::with_title("ßeta"))), "SS");
        assert_eq!(avatar_initial(Some(&ChannelInfo::new())), DEFAULT_AVATAR);
        assert_eq!(avatar_initial(None), DEFAULT_AVATAR);
    }

    #[test]
    fn subscriber_count_separators() {
        assert_eq!(format_subscriber_count("0"), "0");
        assert_eq!(format_subscriber_count("999"), "999");
        assert_eq!(format_subscriber_count("1000"), "1,000");
        assert_eq!(format_subscriber_count("12345"), "12,345");
        assert_eq!(format_subscriber_count("1234567"), "1,234,567");
        assert_eq!(format_subscriber_count("000123"), "123");
        assert_eq!(format_subscriber_count(" 4500 "), "4,500");
        assert_eq!(format_subscriber_count("1.2M"), "1.2M");
        assert_eq!(format_subscriber_count(""), "");
    }

    #[test]
    fn summary_lists_known_fields() {
        let mut info = ChannelInfo::with_title("Some Creator");
        info.id = Some("UC123".to_string());
        info.subscriber_count = Some("12345".to_string());
        let summary = channel_summary(&info);
        assert!(summary.starts_with("Some Creator"));
        assert!(summary.contains("UC123"));
        assert!(summary.contains("12,345"));
        assert!(!summary.contains("videos"));
    }
}
