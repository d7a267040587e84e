//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns everything that
//! lives for one conversation (the credential, the input form, and the
//! history) and runs one request/response cycle per submission.

use crate::chat::form::InputForm;
use crate::chat::history::History;
use crate::client::{Gemini, GenerateContent};
use crate::error::{Error, Result};
use crate::observability::{
    SESSION_SUBMISSIONS_REJECTED, SESSION_TURNS_COMMITTED, SESSION_TURNS_ROLLED_BACK,
};
use crate::render::Renderer;
use crate::types::{Credential, Model, Turn};

/// A chat session that manages conversation state and API interactions.
///
/// Every submission runs to completion before the next one can start: the
/// user turn is appended, the whole history is sent, and the reply is either
/// appended or the user turn is rolled back.
pub struct ChatSession<C: GenerateContent = Gemini> {
    client: C,
    credential: Option<Credential>,
    form: InputForm,
    history: History,
    committed_turns: u64,
    rolled_back_turns: u64,
    rejected_submissions: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of turns in the conversation.
    pub turn_count: usize,
    /// Replies received and committed.
    pub committed_turns: u64,
    /// User turns removed after a failed request.
    pub rolled_back_turns: u64,
    /// Submissions rejected before any request was made.
    pub rejected_submissions: u64,
    /// Whether an API key is set.
    pub credential_set: bool,
    /// Name of the attached image, if any.
    pub pending_image: Option<String>,
}

impl<C: GenerateContent> ChatSession<C> {
    /// Creates a new chat session.
    pub fn new(client: C, credential: Option<Credential>) -> Self {
        Self {
            client,
            credential,
            form: InputForm::new(),
            history: History::new(),
            committed_turns: 0,
            rolled_back_turns: 0,
            rejected_submissions: 0,
        }
    }

    /// Submits the input form and runs one request/response cycle.
    ///
    /// Validation failures are reported and returned without touching the
    /// history or the form.  After validation the form is reset, the user turn
    /// is appended and rendered, and the whole history is sent.  On success the
    /// reply is appended as a model turn and returned; on failure the user turn
    /// is rolled back so the history never ends in an unanswered user turn.
    pub async fn submit(&mut self, renderer: &mut dyn Renderer) -> Result<String> {
        let credential = match self.validate() {
            Ok(credential) => credential,
            Err(err) => {
                SESSION_SUBMISSIONS_REJECTED.click();
                self.rejected_submissions += 1;
                report(renderer, &err);
                return Err(err);
            }
        };
        let submission = self.form.take()?;

        let turn = Turn::user(submission.into_parts());
        let previous_len = self.history.len();
        self.history.push(turn);
        if let Some(turn) = self.history.last() {
            renderer.render_turn(turn);
        }

        renderer.start_waiting();
        let request = self.history.request();
        let result = self.client.generate(&request, &credential).await;
        renderer.finish_waiting();

        match result {
            Ok(reply) => {
                let turn = Turn::model_text(reply.clone());
                renderer.render_turn(&turn);
                self.history.push(turn);
                SESSION_TURNS_COMMITTED.click();
                self.committed_turns += 1;
                Ok(reply)
            }
            Err(err) => {
                self.history.rollback_user_turn();
                debug_assert_eq!(self.history.len(), previous_len);
                SESSION_TURNS_ROLLED_BACK.click();
                self.rolled_back_turns += 1;
                report(renderer, &err);
                Err(err)
            }
        }
    }

    /// Checks the credential and then the form.
    fn validate(&self) -> Result<Credential> {
        let credential = self.credential.clone().ok_or(Error::MissingCredential)?;
        self.form.validate()?;
        Ok(credential)
    }

    /// Sets or clears the API key.
    pub fn set_credential(&mut self, credential: Option<Credential>) {
        self.credential = credential;
    }

    /// Returns true if an API key is set.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// The input form.
    pub fn form(&self) -> &InputForm {
        &self.form
    }

    /// The input form, for editing.
    pub fn form_mut(&mut self) -> &mut InputForm {
        &mut self.form
    }

    /// The conversation so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Renders every turn, oldest first.
    pub fn render_history(&self, renderer: &mut dyn Renderer) {
        for turn in self.history.turns() {
            renderer.render_turn(turn);
        }
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Returns the number of turns in the conversation.
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.client.set_model(model);
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        self.client.model()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.model().clone(),
            turn_count: self.turn_count(),
            committed_turns: self.committed_turns,
            rolled_back_turns: self.rolled_back_turns,
            rejected_submissions: self.rejected_submissions,
            credential_set: self.has_credential(),
            pending_image: self.form.image().map(|image| image.name.clone()),
        }
    }
}

fn report(renderer: &mut dyn Renderer, err: &Error) {
    match err {
        Error::EmptyInput => renderer.print_warning(&err.to_string()),
        _ => renderer.print_error(&err.to_string()),
    }
    if let Some(body) = err.response_body() {
        renderer.print_response_body(body);
    }
}
