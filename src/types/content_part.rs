use serde::{Deserialize, Serialize};

/// Raw bytes with the mime type that describes them.
///
/// On the wire the data is standard base64.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The declared mime type of the data.
    pub mime_type: String,

    /// The raw, decoded bytes.
    #[serde(with = "crate::utils::base64_bytes")]
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new `Blob`.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// One atomic piece of a turn: either text or an inline image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContentPart {
    /// A run of text, rendered as markdown.
    Text {
        /// The text.
        text: String,
    },

    /// Inline binary data, always an image in this crate.
    InlineData {
        /// The data and its mime type.
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

impl ContentPart {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an inline image part.
    pub fn inline_image(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        ContentPart::InlineData {
            inline_data: Blob::new(mime_type, data),
        }
    }

    /// Returns the text if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text { text } => Some(text),
            ContentPart::InlineData { .. } => None,
        }
    }

    /// Returns the blob if this is an inline data part.
    pub fn as_inline_data(&self) -> Option<&Blob> {
        match self {
            ContentPart::Text { .. } => None,
            ContentPart::InlineData { inline_data } => Some(inline_data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn text_part_wire_shape() {
        let part = ContentPart::text("Hello");
        assert_eq!(to_value(&part).unwrap(), json!({"text": "Hello"}));
    }

    #[test]
    fn inline_data_wire_shape() {
        let part = ContentPart::inline_image("image/png", b"Hello World".to_vec());
        assert_eq!(
            to_value(&part).unwrap(),
            json!({
                "inlineData": {
                    "mimeType": "image/png",
                    "data": "SGVsbG8gV29ybGQ="
                }
            })
        );
    }

    #[test]
    fn inline_data_decodes_base64() {
        let json = r#"{"inlineData":{"mimeType":"image/jpeg","data":"SGVsbG8gV29ybGQ="}}"#;
        let part: ContentPart = serde_json::from_str(json).unwrap();
        let blob = part.as_inline_data().unwrap();
        assert_eq!(blob.mime_type, "image/jpeg");
        assert_eq!(blob.data, b"Hello World");
        assert!(part.as_text().is_none());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let json = r#"{"inlineData":{"mimeType":"image/jpeg","data":"not base64!"}}"#;
        assert!(serde_json::from_str::<ContentPart>(json).is_err());
    }
}
