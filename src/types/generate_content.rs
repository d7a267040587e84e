use serde::{Deserialize, Serialize};

use crate::types::{Role, Turn};

/// The body of a `generateContent` request.
///
/// The payload is the whole conversation, oldest turn first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    /// Every turn of the conversation, in order.
    pub contents: Vec<Turn>,
}

impl GenerateContentRequest {
    /// Create a new request from the given turns.
    pub fn new(contents: Vec<Turn>) -> Self {
        Self { contents }
    }

    /// Project a conversation into a request without dropping or rewriting any turn.
    pub fn from_history(turns: &[Turn]) -> Self {
        Self::new(turns.to_vec())
    }
}

/// The body of a successful `generateContent` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Response options, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// The model version that produced the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// One response option.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content.  Absent when generation was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,

    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The content of a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateContent {
    /// The parts of the reply.  Parts without text are kept so indexes line up.
    /// Absent when generation stopped before producing anything, e.g. `MAX_TOKENS`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<CandidatePart>>,

    /// The role, normally `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// A part of a candidate.  Only text is read; other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidatePart {
    /// The text of the part, if it has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// The reply text: every text part of the first candidate, concatenated in order.
    ///
    /// Returns `None` when there is no candidate, or the first candidate carries no
    /// content or no parts.
    pub fn reply_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        Some(
            content
                .parts
                .as_ref()?
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentPart;
    use serde_json::{json, to_value};

    #[test]
    fn request_wire_shape() {
        let history = vec![
            Turn::user(vec![ContentPart::text("Hello")]),
            Turn::model_text("Hi!"),
            Turn::user(vec![ContentPart::inline_image("image/png", b"png".to_vec())]),
        ];
        let request = GenerateContentRequest::from_history(&history);
        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "Hello"}]},
                    {"role": "model", "parts": [{"text": "Hi!"}]},
                    {"role": "user", "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "cG5n"}}
                    ]}
                ]
            })
        );
    }

    #[test]
    fn request_preserves_history() {
        let history = vec![
            Turn::user(vec![ContentPart::text("one")]),
            Turn::model_text("two"),
        ];
        let request = GenerateContentRequest::from_history(&history);
        let json = serde_json::to_string(&request).unwrap();
        let decoded: GenerateContentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.contents, history);
    }

    #[test]
    fn reply_text_concatenates_first_candidate() {
        let json = json!({
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "Hello, "}, {"thought": true}, {"text": "world"}],
                        "role": "model"
                    },
                    "finishReason": "STOP",
                    "index": 0
                },
                {"content": {"parts": [{"text": "ignored"}], "role": "model"}}
            ],
            "usageMetadata": {"totalTokenCount": 12},
            "modelVersion": "gemini-2.5-flash"
        });
        let response: GenerateContentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.reply_text(), Some("Hello, world".to_string()));
        assert_eq!(response.model_version.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn reply_text_missing() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.reply_text(), None);

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(response.reply_text(), None);

        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(response.reply_text(), None);
    }

    #[test]
    fn reply_text_without_text_parts_is_empty() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert_eq!(response.reply_text(), Some(String::new()));
    }

    #[test]
    fn reply_text_content_without_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model"}, "finishReason": "MAX_TOKENS"}]}"#,
        )
        .unwrap();
        assert_eq!(response.reply_text(), None);
        assert_eq!(
            response.candidates[0].finish_reason.as_deref(),
            Some("MAX_TOKENS")
        );
    }
}
