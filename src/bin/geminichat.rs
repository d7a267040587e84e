//! Interactive chat application for conversing with Gemini.
//!
//! This binary provides a REPL interface for chatting with Gemini models via
//! the `generateContent` API.  Each prompt may carry one attached image.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the key is read from GEMINI_API_KEY or entered with /key
//! geminichat
//!
//! # Specify a model
//! geminichat --model gemini-2.5-pro
//!
//! # Disable colors (useful for piping output)
//! geminichat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/key [api-key]` - Set the API key; without one, it is read with masked input
//! - `/image <path>` - Attach an image to the next message
//! - `/detach` - Remove the attached image
//! - `/history` - Show the conversation so far
//! - `/clear` - Clear conversation history
//! - `/model <name>` - Change the model
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application
//!
//! An empty line submits whatever is in the form, so an attached image can be
//! sent on its own.

use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use geminichat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command, read_hidden_key,
};
use geminichat::render::describe_image;
use geminichat::{API_KEY_ENV, Blob, Credential, Gemini, Model};

/// Main entry point for the geminichat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("geminichat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let client = Gemini::with_options(
        config.base_url.clone(),
        config.model.clone(),
        Some(config.timeout),
    )?;
    let mut session = ChatSession::new(client, Credential::from_env());
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Gemini Chat (model: {})", session.model());
    if !session.has_credential() {
        println!("No API key found in {API_KEY_ENV}; set one with /key");
    }
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let line = line.trim();

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    if !cmd.is_secret() {
                        let _ = rl.add_history_entry(line);
                    }
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Key(key) => {
                            let credential = match key {
                                Some(key) => Ok(Credential::new(key)),
                                None => read_hidden_key("API key: "),
                            };
                            match credential {
                                Ok(Some(credential)) => {
                                    session.set_credential(Some(credential));
                                    renderer.print_info("API key set for this session.");
                                }
                                Ok(None) => renderer.print_warning("No API key entered."),
                                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                                    renderer.print_info("API key unchanged.");
                                }
                                Err(err) => {
                                    renderer.print_error(&format!("Input error: {}", err))
                                }
                            }
                        }
                        ChatCommand::Image(path) => {
                            match session.form_mut().attach_image_from_path(&path) {
                                Ok(image) => {
                                    let blob = Blob::new(image.mime_type.clone(), image.data.clone());
                                    renderer.print_info(&format!(
                                        "Attached {} {}",
                                        image.name,
                                        describe_image(&blob)
                                    ));
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Detach => match session.form_mut().detach_image() {
                            Some(image) => {
                                renderer.print_info(&format!("Detached {}", image.name))
                            }
                            None => renderer.print_info("No image attached."),
                        },
                        ChatCommand::History => {
                            if session.history().is_empty() {
                                renderer.print_info("No messages yet.");
                            } else {
                                session.render_history(&mut renderer);
                            }
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            let model = model_name
                                .parse()
                                .unwrap_or_else(|_| Model::Custom(model_name.clone()));
                            session.set_model(model);
                            renderer.print_info(&format!("Model changed to: {}", session.model()));
                        }
                        ChatCommand::Stats => {
                            print_stats(&session, config.timeout);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                if !line.is_empty() {
                    let _ = rl.add_history_entry(line);
                    session.form_mut().set_text(line);
                }

                // Errors are reported by the session.
                let _ = session.submit(&mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession, timeout: Duration) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Turns: {}", stats.turn_count);
    println!(
        "      Replies: {} committed / {} rolled back",
        stats.committed_turns, stats.rolled_back_turns
    );
    println!("      Rejected submissions: {}", stats.rejected_submissions);
    println!(
        "      API key: {}",
        if stats.credential_set {
            "set"
        } else {
            "(not set)"
        }
    );
    match stats.pending_image {
        Some(ref name) => println!("      Attached image: {}", name),
        None => println!("      Attached image: (none)"),
    }
    println!("      Timeout: {}s", timeout.as_secs());
}
