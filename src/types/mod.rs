// Public modules
pub mod content_part;
pub mod credential;
pub mod generate_content;
pub mod image_media_type;
pub mod model;
pub mod turn;

// Re-exports
pub use content_part::{Blob, ContentPart};
pub use credential::{API_KEY_ENV, Credential};
pub use generate_content::{
    Candidate, CandidateContent, CandidatePart, GenerateContentRequest, GenerateContentResponse,
};
pub use image_media_type::{ImageMediaType, mime_type_for_path};
pub use model::{KnownModel, Model};
pub use turn::{Role, Turn};
