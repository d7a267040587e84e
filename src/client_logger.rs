//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log every exchange passing through the [`Gemini`](crate::Gemini) client.
//! The API key is part of the request URL and never reaches a logger.

use crate::{Error, GenerateContentRequest, GenerateContentResponse};

/// A trait for logging Gemini client operations.
///
/// # Example
///
/// ```rust,ignore
/// use geminichat::{ClientLogger, Error, GenerateContentRequest, GenerateContentResponse};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {} turns", request.contents.len()).unwrap();
///     }
///
///     fn log_response(&self, response: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Response: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_error(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Error: {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request immediately before it is sent.
    fn log_request(&self, request: &GenerateContentRequest);

    /// Log a successfully parsed response.
    ///
    /// This is called for every 2xx response that parses, including those that
    /// carry no candidates.
    fn log_response(&self, response: &GenerateContentResponse);

    /// Log a failed request.
    fn log_error(&self, error: &Error);
}
