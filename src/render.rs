//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the session can
//! draw turns, warnings, and the waiting indicator without knowing where they
//! go.  The default implementation writes to stdout with optional ANSI styling.

use std::io::{self, Cursor, Stdout, Write};

use crate::markdown::render_markdown;
use crate::types::{Blob, ContentPart, Role, Turn};

/// ANSI escape code for bold text (used for role labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for the waiting indicator and bodies).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the model label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for magenta text (used for image summaries).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI sequence that returns to column zero and clears the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Called before the parts of a turn are printed.
    fn start_turn(&mut self, role: Role);

    /// Print a text part.  The text is markdown.
    fn print_text(&mut self, text: &str);

    /// Print an inline image part.
    fn print_image(&mut self, image: &Blob);

    /// Called after the parts of a turn are printed.
    fn finish_turn(&mut self);

    /// Show that a reply is being awaited.
    fn start_waiting(&mut self);

    /// Remove the waiting indicator.
    fn finish_waiting(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a warning message.
    fn print_warning(&mut self, warning: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a raw response body returned alongside an error.
    fn print_response_body(&mut self, body: &str);

    /// Print every part of a turn, in order.
    fn render_turn(&mut self, turn: &Turn) {
        self.start_turn(turn.role);
        for part in &turn.parts {
            match part {
                ContentPart::Text { text } => self.print_text(text),
                ContentPart::InlineData { inline_data } => self.print_image(inline_data),
            }
        }
        self.finish_turn();
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    waiting: bool,
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
            waiting: false,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn start_turn(&mut self, role: Role) {
        let label = role_label(role);
        let style = match role {
            Role::User => ANSI_CYAN,
            Role::Model => ANSI_GREEN,
        };
        let label = self.paint(&format!("{ANSI_BOLD}{style}"), label);
        println!("{label}:");
        self.flush();
    }

    fn print_text(&mut self, text: &str) {
        print!("{}", render_markdown(text, self.use_color));
        self.flush();
    }

    fn print_image(&mut self, image: &Blob) {
        let summary = self.paint(ANSI_MAGENTA, &describe_image(image));
        println!("{summary}");
        self.flush();
    }

    fn finish_turn(&mut self) {
        println!();
        self.flush();
    }

    fn start_waiting(&mut self) {
        self.waiting = true;
        let indicator = self.paint(ANSI_DIM, "Gemini is thinking...");
        if self.use_color {
            print!("{indicator}");
        } else {
            println!("{indicator}");
        }
        self.flush();
    }

    fn finish_waiting(&mut self) {
        if self.waiting && self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        }
        self.waiting = false;
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.finish_waiting();
        eprintln!("{}", self.paint(ANSI_RED, &format!("Error: {error}")));
    }

    fn print_warning(&mut self, warning: &str) {
        self.finish_waiting();
        eprintln!("{}", self.paint(ANSI_YELLOW, &format!("Warning: {warning}")));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_response_body(&mut self, body: &str) {
        eprintln!("{}", self.paint(ANSI_DIM, &pretty_body(body)));
    }
}

/// The label shown above a turn.
pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Model => "Gemini",
    }
}

/// Summarize an inline image: mime type, size, and dimensions when they can be decoded.
pub fn describe_image(image: &Blob) -> String {
    let size = format_size(image.data.len());
    match image_dimensions(&image.data) {
        Some((width, height)) => {
            format!("[image: {}, {size}, {width}x{height}]", image.mime_type)
        }
        None => format!("[image: {}, {size}]", image.mime_type),
    }
}

fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

/// Pretty-print a body when it is JSON; otherwise return it unchanged.
pub fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_string())
}
