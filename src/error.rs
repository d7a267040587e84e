//! Error types for geminichat.
//!
//! Every failure a submission can meet is one variant of [`Error`].  Validation
//! failures happen before any history is touched; transport and response
//! failures happen after the user turn was appended and cause it to be rolled
//! back.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// The main error type for geminichat.
#[derive(Clone, Debug)]
pub enum Error {
    /// No API key has been provided for this session.
    MissingCredential,

    /// The submission had neither prompt text nor an image.
    EmptyInput,

    /// The attached image declares a type the API does not accept.
    UnsupportedImageFormat {
        /// The declared mime type.
        mime_type: String,
    },

    /// The request did not complete within the client timeout.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// The provider could not be reached.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// The provider answered with a non-success status.
    Http {
        /// HTTP status code.
        status_code: u16,
        /// The raw response body.
        body: String,
    },

    /// The provider answered with success but no usable candidate.
    MalformedResponse {
        /// The raw response body.
        body: String,
    },

    /// Anything else that went wrong during a request.
    Unexpected {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates a new unsupported image format error.
    pub fn unsupported_image_format(mime_type: impl Into<String>) -> Self {
        Error::UnsupportedImageFormat {
            mime_type: mime_type.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new HTTP status error.
    pub fn http(status_code: u16, body: impl Into<String>) -> Self {
        Error::Http {
            status_code,
            body: body.into(),
        }
    }

    /// Creates a new malformed response error.
    pub fn malformed_response(body: impl Into<String>) -> Self {
        Error::MalformedResponse { body: body.into() }
    }

    /// Creates a new unexpected error.
    pub fn unexpected(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Unexpected {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Returns true if the credential was missing.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Error::MissingCredential)
    }

    /// Returns true if the submission was empty.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Error::EmptyInput)
    }

    /// Returns true if the image type was rejected.
    pub fn is_unsupported_image_format(&self) -> bool {
        matches!(self, Error::UnsupportedImageFormat { .. })
    }

    /// Returns true if this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Returns true if this error is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// Returns true if the provider returned a non-success status.
    pub fn is_http(&self) -> bool {
        matches!(self, Error::Http { .. })
    }

    /// Returns true if the provider returned a body without candidates.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Error::MalformedResponse { .. })
    }

    /// Returns true if this error is unexpected.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, Error::Unexpected { .. })
    }

    /// Returns true if this error is caught before a request is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential | Error::EmptyInput | Error::UnsupportedImageFormat { .. }
        )
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns the raw response body for errors that carry one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Http { body, .. } => Some(body),
            Error::MalformedResponse { body } => Some(body),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCredential => {
                write!(f, "Please enter your Gemini API key to proceed.")
            }
            Error::EmptyInput => {
                write!(f, "Please enter a message or attach an image to ask Gemini.")
            }
            Error::UnsupportedImageFormat { mime_type } => {
                write!(
                    f,
                    "Unsupported image format: {mime_type}. Please attach a JPG, JPEG, PNG, or WEBP."
                )
            }
            Error::Timeout { duration, .. } => {
                if let Some(duration) = duration {
                    write!(
                        f,
                        "Request timed out after {duration} seconds. Gemini took too long to respond. Please try again."
                    )
                } else {
                    write!(
                        f,
                        "Request timed out. Gemini took too long to respond. Please try again."
                    )
                }
            }
            Error::Connection { message, .. } => {
                write!(
                    f,
                    "Network connection error. Please check your internet connection. ({message})"
                )
            }
            Error::Http { status_code, .. } => {
                write!(f, "HTTP error from Gemini API: {status_code}")
            }
            Error::MalformedResponse { .. } => {
                write!(f, "Gemini API did not return a valid response.")
            }
            Error::Unexpected { message, .. } => {
                write!(f, "An unexpected error occurred: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Unexpected { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::unexpected(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for geminichat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors() {
        assert!(Error::MissingCredential.is_validation());
        assert!(Error::EmptyInput.is_validation());
        assert!(Error::unsupported_image_format("image/gif").is_validation());
        assert!(!Error::timeout("slow", Some(120.0)).is_validation());
        assert!(!Error::http(500, "{}").is_validation());
    }

    #[test]
    fn response_body_only_for_http_and_malformed() {
        assert_eq!(Error::http(403, "denied").response_body(), Some("denied"));
        assert_eq!(
            Error::malformed_response(r#"{"candidates":[]}"#).response_body(),
            Some(r#"{"candidates":[]}"#)
        );
        assert_eq!(Error::timeout("slow", None).response_body(), None);
        assert_eq!(Error::unexpected("boom", None).response_body(), None);
    }

    #[test]
    fn status_code() {
        assert_eq!(Error::http(429, "").status_code(), Some(429));
        assert_eq!(Error::EmptyInput.status_code(), None);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::unsupported_image_format("image/gif").to_string(),
            "Unsupported image format: image/gif. Please attach a JPG, JPEG, PNG, or WEBP."
        );
        assert_eq!(
            Error::http(404, "").to_string(),
            "HTTP error from Gemini API: 404"
        );
        assert!(
            Error::timeout("slow", Some(120.0))
                .to_string()
                .contains("120 seconds")
        );
    }

    #[test]
    fn io_conversion_keeps_source() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "no such file").into();
        assert!(matches!(err, Error::Io { .. }));
        assert!(error::Error::source(&err).is_some());
    }
}
