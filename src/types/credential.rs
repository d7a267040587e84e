use std::env;
use std::fmt;

/// Environment variable consulted for an API key at start-up.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// An API key held in memory for the current session.
///
/// A credential is never serialized and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential, or `None` if the key is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// Read the credential from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Option<Self> {
        env::var(API_KEY_ENV).ok().and_then(Self::new)
    }

    /// The raw key, for placing on the request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
