use std::fmt;
use std::str::FromStr;

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or tuned models)
    Custom(String),
}

/// Known Gemini model versions that accept image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownModel {
    /// Gemini 2.5 Flash (2025-05-20 preview)
    Gemini25FlashPreview0520,

    /// Gemini 2.5 Flash
    Gemini25Flash,

    /// Gemini 2.5 Pro
    Gemini25Pro,

    /// Gemini 2.0 Flash
    Gemini20Flash,
}

impl KnownModel {
    const ALL: [KnownModel; 4] = [
        KnownModel::Gemini25FlashPreview0520,
        KnownModel::Gemini25Flash,
        KnownModel::Gemini25Pro,
        KnownModel::Gemini20Flash,
    ];

    /// The identifier used in the request path.
    pub fn id(&self) -> &'static str {
        match self {
            KnownModel::Gemini25FlashPreview0520 => "gemini-2.5-flash-preview-05-20",
            KnownModel::Gemini25Flash => "gemini-2.5-flash",
            KnownModel::Gemini25Pro => "gemini-2.5-pro",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Gemini25FlashPreview0520)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("model identifier must not be empty".to_string());
        }
        let s = s.strip_prefix("models/").unwrap_or(s);
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.id() == s)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}
