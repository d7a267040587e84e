// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod markdown;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{Gemini, GenerateContent};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use markdown::render_markdown;
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
