use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_TIMEOUTS, CLIENT_REQUESTS,
};
use crate::types::{Credential, GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Something that turns a conversation into reply text.
///
/// [`Gemini`] is the production implementation; the chat session only depends on
/// this trait so it can be driven without a network.
#[async_trait::async_trait]
pub trait GenerateContent: Send + Sync {
    /// Issue one request carrying `request` and return the reply text.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
        credential: &Credential,
    ) -> Result<String>;

    /// The model requests are sent to.
    fn model(&self) -> &Model;

    /// Changes the model requests are sent to.
    fn set_model(&mut self, model: Model);
}

/// Client for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct Gemini {
    client: ReqwestClient,
    base_url: Url,
    model: Model,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client for `model` with the default endpoint and timeout.
    pub fn new(model: Model) -> Result<Self> {
        Self::with_options(None, model, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        base_url: Option<String>,
        model: Model,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::unexpected(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            model,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request, response, and error.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The upper bound on a single request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request URL for the current model, carrying the key as a query parameter.
    pub fn endpoint(&self, credential: &Credential) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))?;
        url.query_pairs_mut()
            .append_pair("key", credential.expose());
        Ok(url)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Convert a transport error, dropping the URL so the key never lands in a message.
    fn classify(&self, e: reqwest::Error) -> Error {
        let e = e.without_url();
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::unexpected(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Send the conversation to the API and return the reply text.
    ///
    /// Exactly one POST is made.  The reply is every text part of the first
    /// candidate, concatenated in order with no separator.
    pub async fn send(
        &self,
        request: &GenerateContentRequest,
        credential: &Credential,
    ) -> Result<String> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }
        let start = Instant::now();
        let result = self.send_once(request, credential).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &result {
            CLIENT_REQUEST_ERRORS.click();
            if err.is_timeout() {
                CLIENT_REQUEST_TIMEOUTS.click();
            }
            if let Some(logger) = &self.logger {
                logger.log_error(err);
            }
        }
        result
    }

    async fn send_once(
        &self,
        request: &GenerateContentRequest,
        credential: &Credential,
    ) -> Result<String> {
        let url = self.endpoint(credential)?;

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(Error::http(status.as_u16(), body));
        }

        let parsed = serde_json::from_str::<GenerateContentResponse>(&body).map_err(|e| {
            Error::unexpected(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        if let Some(logger) = &self.logger {
            logger.log_response(&parsed);
        }

        parsed
            .reply_text()
            .ok_or_else(|| Error::malformed_response(body))
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model.to_string())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl GenerateContent for Gemini {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
        credential: &Credential,
    ) -> Result<String> {
        self.send(request, credential).await
    }

    fn model(&self) -> &Model {
        &self.model
    }

    fn set_model(&mut self, model: Model) {
        self.model = model;
    }
}
