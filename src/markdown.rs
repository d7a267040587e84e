//! Markdown rendering for the terminal.
//!
//! Provides [`render_markdown`] to convert model replies to ANSI-styled text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_UNDERLINE: &str = "\x1b[4m";
const ANSI_STRIKE: &str = "\x1b[9m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_RESET: &str = "\x1b[0m";

/// Render markdown text for a terminal.
///
/// With `use_color` the output carries ANSI styles; without it only the layout
/// (list markers, quote bars, code indentation) survives.  The result always
/// ends in exactly one newline unless it is empty.
pub fn render_markdown(input: &str, use_color: bool) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = MarkdownRenderer::new(use_color);
    renderer.run(Parser::new_ext(input, options));
    renderer.finish()
}

struct MarkdownRenderer {
    out: String,
    line: String,
    use_color: bool,
    style_stack: Vec<&'static str>,
    list_stack: Vec<Option<u64>>,
    link_stack: Vec<String>,
    pending_marker: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
}

impl MarkdownRenderer {
    fn new(use_color: bool) -> Self {
        Self {
            out: String::new(),
            line: String::new(),
            use_color,
            style_stack: Vec::new(),
            list_stack: Vec::new(),
            link_stack: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            in_code_block: false,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn finish(mut self) -> String {
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                self.style_stack.push(ANSI_BOLD);
                if level == HeadingLevel::H1 {
                    self.style_stack.push(ANSI_UNDERLINE);
                }
            }
            Event::End(TagEnd::Heading(level)) => {
                self.flush_line();
                self.style_stack.pop();
                if level == HeadingLevel::H1 {
                    self.style_stack.pop();
                }
                self.blank_line();
            }
            Event::Start(Tag::Emphasis) => self.style_stack.push(ANSI_ITALIC),
            Event::Start(Tag::Strong) => self.style_stack.push(ANSI_BOLD),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(ANSI_STRIKE),
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {
                self.style_stack.pop();
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.style_stack.push(ANSI_UNDERLINE);
                self.link_stack.push(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                self.style_stack.pop();
                if let Some(url) = self.link_stack.pop() {
                    self.push_styled(&format!(" ({url})"), Some(ANSI_BLUE));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.blank_line();
            }
            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{indent}{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::TaskListMarker(checked) => {
                self.push_text(if checked { "[x] " } else { "[ ] " });
            }
            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_code_block_text(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => {
                if self.use_color {
                    self.push_styled(&code, Some(ANSI_CYAN));
                } else {
                    self.push_text(&format!("`{code}`"));
                }
            }
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.push_styled("────────", Some(ANSI_DIM));
                self.flush_line();
                self.blank_line();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            _ => {}
        }
    }

    fn push_code_block_text(&mut self, text: &str) {
        for segment in text.split_inclusive('\n') {
            let content = segment.strip_suffix('\n');
            self.push_styled(content.unwrap_or(segment), Some(ANSI_DIM));
            if content.is_some() {
                self.end_line();
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        self.push_styled(text, None);
    }

    fn push_styled(&mut self, text: &str, extra: Option<&'static str>) {
        if let Some(marker) = self.pending_marker.take() {
            self.line.push_str(&marker);
        }
        if !self.use_color || (self.style_stack.is_empty() && extra.is_none()) {
            self.line.push_str(text);
            return;
        }
        for style in self.style_stack.iter().copied().chain(extra) {
            self.line.push_str(style);
        }
        self.line.push_str(text);
        self.line.push_str(ANSI_RESET);
    }

    fn flush_line(&mut self) {
        if self.line.is_empty() && self.pending_marker.is_none() {
            return;
        }
        self.end_line();
    }

    fn end_line(&mut self) {
        if let Some(marker) = self.pending_marker.take() {
            self.line.insert_str(0, &marker);
        }
        for _ in 0..self.quote_depth {
            self.out.push_str("│ ");
        }
        if self.in_code_block {
            self.out.push_str("    ");
        }
        self.out.push_str(&self.line);
        self.out.push('\n');
        self.line.clear();
    }

    fn blank_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paragraphs() {
        let out = render_markdown("Hello world.\n\nSecond paragraph.", false);
        assert_eq!(out, "Hello world.\n\nSecond paragraph.\n");
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_markdown("", false), "");
        assert_eq!(render_markdown("", true), "");
    }

    #[test]
    fn soft_breaks_join_lines() {
        assert_eq!(render_markdown("one\ntwo", false), "one two\n");
    }

    #[test]
    fn lists_without_color() {
        let out = render_markdown("- apples\n- pears\n  1. green\n  2. red\n", false);
        assert_eq!(out, "• apples\n• pears\n  1. green\n  2. red\n");
    }

    #[test]
    fn ordered_list_honors_start() {
        let out = render_markdown("3. three\n4. four\n", false);
        assert_eq!(out, "3. three\n4. four\n");
    }

    #[test]
    fn code_block_is_indented() {
        let out = render_markdown("```rust\nfn main() {}\nlet x = 1;\n```\n", false);
        assert_eq!(out, "    fn main() {}\n    let x = 1;\n");
    }

    #[test]
    fn inline_code_and_links_without_color() {
        let out = render_markdown("Run `cargo` at [docs](https://example.com).", false);
        assert_eq!(out, "Run `cargo` at docs (https://example.com).\n");
    }

    #[test]
    fn blockquote_gets_bar() {
        let out = render_markdown("> quoted", false);
        assert_eq!(out, "│ quoted\n");
    }

    #[test]
    fn strong_is_bold_with_color() {
        let out = render_markdown("a **b** c", true);
        assert_eq!(out, format!("a {ANSI_BOLD}b{ANSI_RESET} c\n"));
    }

    #[test]
    fn heading_with_color() {
        let out = render_markdown("## Title\nbody", true);
        assert_eq!(out, format!("{ANSI_BOLD}Title{ANSI_RESET}\n\nbody\n"));
    }

    #[test]
    fn nested_styles_stack() {
        let out = render_markdown("***both***", true);
        assert!(out.contains(ANSI_ITALIC));
        assert!(out.contains(ANSI_BOLD));
        assert!(out.contains("both"));
    }
}
