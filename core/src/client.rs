//! SlimSurveys API client.
//!
//! # Design
//! `Client` holds the validated configuration, the optional auth token and
//! a shared `Transport`. It carries no per-call state: every call starts a
//! new `RequestBuilder`, which finalizes into an immutable `HttpRequest`
//! before dispatch. A `Client` can therefore be shared across threads.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn, Span};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::HttpRequest;
use crate::outcome::Outcome;
use crate::request::RequestBuilder;
use crate::transport::{Transport, UreqTransport};

#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Build a client that talks to the network through `ureq`.
    ///
    /// Fails with `Error::Configuration` when the API key is empty or the
    /// base URL is unusable.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let config = config.validated()?;
        let transport = UreqTransport::new(config.connect_timeout, config.timeout);
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Build a client on a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, Error> {
        Ok(Self {
            config: config.validated()?,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.config.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.config.token = (!token.trim().is_empty()).then_some(token);
    }

    pub fn clear_token(&mut self) {
        self.config.token = None;
    }

    /// Start a request for `path`, relative to the base URL.
    pub fn request(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, path.into())
    }

    /// Send a finalized request. Any status code is returned as an
    /// `Outcome`; only a missing response is an error.
    #[instrument(
        name = "slimsurveys_request",
        skip(self, request),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub fn execute(&self, request: &HttpRequest) -> Result<Outcome, Error> {
        let span = Span::current();
        span.record("http.method", request.method.as_str());
        span.record("http.url", request.url.as_str());

        let response = self.transport.execute(request).inspect_err(|err| {
            warn!(error = %err, "request failed");
        })?;

        span.record("http.status_code", response.status);
        debug!(
            elapsed_ms = u64::try_from(response.elapsed.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );
        Ok(Outcome::new(response))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("format", &self.config.format)
            .field("key", &"<redacted>")
            .field("token", &self.config.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}
