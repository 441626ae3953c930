//! Interactive chat application for talking to a content channel.
//!
//! # Usage
//!
//! ```bash
//! # Pick the channel at the prompt
//! channelchat
//!
//! # Start right away
//! channelchat https://www.youtube.com/@SomeCreator
//!
//! # Point at another backend, without colors
//! channelchat --base-url https://channelchat.example.com --no-color @SomeCreator
//! ```
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/reset` - Pick another channel
//! - `/search <query>` - Search for channels
//! - `/info` - Show channel details
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use channelchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, channel_summary, help_text,
    parse_command,
};
use channelchat::{
    ChannelChat, ChannelSearchParams, Error, Session, SessionController, SessionHandle,
    SessionPhase,
};

/// Main entry point for the channelchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let (args, free) = ChatArgs::from_command_line_relaxed("channelchat [OPTIONS] [CHANNEL]");
    let config = ChatConfig::from_args(args)?;

    let client = Arc::new(ChannelChat::with_options(
        config.base_url.clone(),
        config.request_timeout,
    )?);
    tracing::info!(base_url = %client.base_url(), "using backend");
    let handle = SessionController::spawn(Arc::clone(&client), config.hint_delay);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    // Ctrl+C outside the line editor abandons whatever is pending.
    let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(());
    })?;

    println!("Channel Chat ({})", client.base_url());
    println!("Enter a channel URL or @handle. Type /help for commands, /quit to exit\n");

    if let Some(channel) = free.first() {
        handle.start(channel.as_str())?;
        wait_for_start(&handle, &mut interrupts, &mut renderer).await?;
    }

    loop {
        let session = handle.state();
        let prompt = match session.phase() {
            SessionPhase::NotStarted => "Channel: ",
            SessionPhase::Active => "You: ",
            SessionPhase::Starting => {
                wait_for_start(&handle, &mut interrupts, &mut renderer).await?;
                continue;
            }
        };

        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line);

        if let Some(cmd) = parse_command(line) {
            if !run_command(cmd, &client, &handle, &session, &mut renderer).await {
                println!("Goodbye!");
                break;
            }
            continue;
        }

        match session.phase() {
            SessionPhase::NotStarted => {
                handle.start(line)?;
                wait_for_start(&handle, &mut interrupts, &mut renderer).await?;
            }
            SessionPhase::Active => {
                handle.set_input(line)?;
                let before = session.messages().len();
                match handle.send(line).await {
                    Ok(()) => {
                        wait_for_reply(&handle, before, &mut interrupts, &mut renderer).await?
                    }
                    Err(err) => renderer.print_error(&err.to_string()),
                }
            }
            SessionPhase::Starting => {}
        }
    }

    Ok(())
}

/// Executes a slash command.  Returns false when the user asked to quit.
async fn run_command(
    cmd: ChatCommand,
    client: &ChannelChat,
    handle: &SessionHandle,
    session: &Session,
    renderer: &mut PlainTextRenderer,
) -> bool {
    match cmd {
        ChatCommand::Quit => return false,
        ChatCommand::Help => {
            for line in help_text().lines() {
                println!("    {line}");
            }
        }
        ChatCommand::Reset => {
            if session.phase() == SessionPhase::NotStarted {
                renderer.print_info("No channel selected.");
            } else if let Err(err) = handle.reset() {
                renderer.print_error(&err.to_string());
            } else {
                renderer.print_info("Pick another channel.");
            }
        }
        ChatCommand::Search { query, max_results } => {
            let params = ChannelSearchParams::new(query).with_max_results(max_results);
            match client.search_channels(&params).await {
                Ok(channels) if channels.is_empty() => renderer.print_info("No channels found."),
                Ok(channels) => {
                    for channel in &channels {
                        renderer.print_info(&channel_summary(channel));
                    }
                }
                Err(err) => renderer.print_error(&format!("Search failed: {err}")),
            }
        }
        ChatCommand::Health => match client.health().await {
            Ok(health) => renderer.print_info(&format!(
                "Backend status: {} (version {}, {})",
                health.status,
                health.version.as_deref().unwrap_or("unknown"),
                health.environment.as_deref().unwrap_or("unknown environment"),
            )),
            Err(err) => renderer.print_error(&format!("Health check failed: {err}")),
        },
        ChatCommand::Info => match session.phase() {
            SessionPhase::NotStarted => renderer.print_info("No channel selected."),
            _ => {
                renderer.print_info(&format!("Channel: {}", session.reference()));
                match session.channel_info() {
                    Some(info) => renderer.print_info(&channel_summary(info)),
                    None => renderer.print_info("No channel details available."),
                }
            }
        },
        ChatCommand::History => {
            if session.messages().is_empty() {
                renderer.print_info("No messages yet.");
            }
            for message in session.messages() {
                renderer.print_message(message, session.channel_info());
            }
        }
        ChatCommand::Conversation => match session.conversation_id() {
            None => renderer.print_info("No conversation recorded by the backend yet."),
            Some(id) => match client.conversation(id).await {
                Ok(conversation) => {
                    renderer.print_info(&format!("Conversation {}", conversation.conversation_id));
                    for turn in &conversation.messages {
                        renderer.print_info(&format!("  {}: {}", turn.role, turn.content));
                    }
                }
                Err(err) => renderer.print_error(&format!("Could not fetch conversation: {err}")),
            },
        },
        ChatCommand::Invalid(message) => renderer.print_error(&message),
    }
    true
}

/// Follows a pending start, printing hints, until it is active or abandoned.
async fn wait_for_start(
    handle: &SessionHandle,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
    renderer: &mut PlainTextRenderer,
) -> Result<(), Error> {
    while interrupts.try_recv().is_ok() {}
    let mut rx = handle.subscribe();
    let epoch = rx.borrow().epoch();
    let mut shown_hint: Option<String> = None;
    loop {
        let session = rx.borrow_and_update().clone();
        match session.phase() {
            SessionPhase::Active => {
                renderer.print_header(session.channel_info());
                for message in session.messages() {
                    renderer.print_message(message, session.channel_info());
                }
                return Ok(());
            }
            // Same epoch means the start request has not been processed yet.
            SessionPhase::NotStarted if session.epoch() != epoch => return Ok(()),
            SessionPhase::NotStarted => {}
            SessionPhase::Starting => {
                if let Some(hint) = session.hint() {
                    if shown_hint.as_deref() != Some(hint) {
                        renderer.print_hint(hint);
                        shown_hint = Some(hint.to_string());
                    }
                }
            }
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Err(Error::abort("session controller stopped"));
                }
            }
            Some(()) = interrupts.recv() => {
                handle.reset()?;
                renderer.print_info("\nStart abandoned.");
            }
        }
    }
}

/// Shows the thinking indicator until the reply to the last message arrives.
///
/// Ctrl+C leaves the channel instead of waiting.
async fn wait_for_reply(
    handle: &SessionHandle,
    before: usize,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
    renderer: &mut PlainTextRenderer,
) -> Result<(), Error> {
    while interrupts.try_recv().is_ok() {}
    let mut rx = handle.subscribe();
    let epoch = rx.borrow().epoch();
    loop {
        let session = rx.borrow_and_update().clone();
        if session.epoch() != epoch {
            return Ok(());
        }
        if session.is_loading() {
            renderer.print_thinking();
        } else if session.messages().len() > before {
            for message in session.messages()[before..].iter().filter(|m| m.is_bot()) {
                renderer.print_message(message, session.channel_info());
            }
            return Ok(());
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Err(Error::abort("session controller stopped"));
                }
            }
            Some(()) = interrupts.recv() => {
                handle.reset()?;
                renderer.print_info("\nLeft the channel. Pick another channel.");
            }
        }
    }
}
