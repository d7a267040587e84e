use serde::{Deserialize, Serialize};

use crate::types::ContentPart;

/// The party a turn belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role.
    User,

    /// Model role.
    Model,
}

/// One party's contribution to the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    /// The role of the turn.
    pub role: Role,

    /// The parts of the turn, in order.
    pub parts: Vec<ContentPart>,
}

impl Turn {
    /// Create a new `Turn` with the given role and parts.
    pub fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Create a new user `Turn`.
    pub fn user(parts: Vec<ContentPart>) -> Self {
        Self::new(Role::User, parts)
    }

    /// Create a new model `Turn` holding a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![ContentPart::text(text)])
    }

    /// Returns true if this turn belongs to the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
