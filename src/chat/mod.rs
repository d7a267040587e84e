//! Chat application module for interactive conversations with Gemini.
//!
//! This module provides a REPL chat interface built on top of the geminichat
//! client library. It supports:
//!
//! - Text prompts with an optional attached image
//! - Markdown rendering of replies with optional ANSI styling
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`form`]: The prompt and image that make up one submission
//! - [`history`]: The ordered list of turns sent with every request
//! - [`session`]: Core chat session management and API interaction
//! - [`commands`]: Slash command parsing and handling
//! - [`key_prompt`]: Masked entry of the API key

mod commands;
mod config;
mod form;
mod history;
mod key_prompt;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use form::{ImageUpload, InputForm, Submission};
pub use history::History;
pub use key_prompt::{KeyMasker, read_hidden_key};
pub use session::{ChatSession, SessionStats};
