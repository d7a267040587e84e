//! Hidden-input prompt for the API key.

use std::borrow::Cow;

use rustyline::completion::Completer;
use rustyline::config::{ColorMode, Config};
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use crate::types::Credential;

/// A rustyline helper that draws every typed character as `*`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyMasker;

impl Highlighter for KeyMasker {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Completer for KeyMasker {
    type Candidate = String;
}

impl Hinter for KeyMasker {
    type Hint = String;
}

impl Validator for KeyMasker {}

impl Helper for KeyMasker {}

/// Reads an API key with masked echo and never records it in any history.
///
/// Returns `Ok(None)` when the entered line is blank.
pub fn read_hidden_key(prompt: &str) -> rustyline::Result<Option<Credential>> {
    let config = Config::builder()
        .auto_add_history(false)
        .color_mode(ColorMode::Forced)
        .build();
    let mut rl: Editor<KeyMasker, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(KeyMasker));
    let line = rl.readline(prompt)?;
    Ok(Credential::new(line))
}
