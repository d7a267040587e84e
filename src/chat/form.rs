//! The input form: a prompt, an optional image, and a submit action.
//!
//! The form never touches the network or the history.  It only turns what the
//! user entered into a [`Submission`] and resets itself once it has done so.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ContentPart, ImageMediaType, mime_type_for_path};

/// An image picked by the user, with the mime type it was declared as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Display name, usually the file name.
    pub name: String,

    /// The declared mime type.  Not yet validated.
    pub mime_type: String,

    /// The raw bytes of the image.
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Create a new upload.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Read an image from disk, declaring its mime type from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|err| Error::io(format!("failed to read {}", path.display()), err))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type_for_path(path), data))
    }

    /// The accepted media type, or `None` if the declared type is not accepted.
    pub fn media_type(&self) -> Option<ImageMediaType> {
        ImageMediaType::from_mime_type(&self.mime_type)
    }
}

/// What a successful submission yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The prompt; may be empty when an image is present.
    pub text: String,

    /// The attached image, if any.
    pub image: Option<ImageUpload>,
}

impl Submission {
    /// The parts of the user turn: text first if non-empty, then the image if present.
    pub fn into_parts(self) -> Vec<ContentPart> {
        let mut parts = Vec::with_capacity(2);
        if !self.text.is_empty() {
            parts.push(ContentPart::text(self.text));
        }
        if let Some(image) = self.image {
            let mime_type = image
                .media_type()
                .map(|media_type| media_type.mime_type().to_string())
                .unwrap_or(image.mime_type);
            parts.push(ContentPart::inline_image(mime_type, image.data));
        }
        parts
    }
}

/// The widget group that collects one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputForm {
    text: String,
    image: Option<ImageUpload>,
}

impl InputForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the prompt text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The current prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attaches an image, replacing any previous one.
    pub fn attach_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
    }

    /// Reads an image from disk and attaches it.  The form is unchanged on error.
    pub fn attach_image_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<&ImageUpload> {
        let image = ImageUpload::from_path(path)?;
        Ok(&*self.image.insert(image))
    }

    /// Removes and returns the attached image.
    pub fn detach_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }

    /// The attached image, if any.
    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Returns true when the text is `""` and there is no image.  Whitespace counts as text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.image.is_none()
    }

    /// Checks that the form would produce an acceptable submission.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some(image) = &self.image
            && image.media_type().is_none()
        {
            return Err(Error::unsupported_image_format(&image.mime_type));
        }
        Ok(())
    }

    /// Validates, yields the submission, and resets every field.
    ///
    /// On error nothing is reset.
    pub fn take(&mut self) -> Result<Submission> {
        self.validate()?;
        let submission = Submission {
            text: std::mem::take(&mut self.text),
            image: self.image.take(),
        };
        Ok(submission)
    }

    /// Resets every field.
    pub fn clear(&mut self) {
        self.text.clear();
        self.image = None;
    }
}
