//! Blocking HTTP transport for the tavola client.
//!
//! [`HttpTransport`] performs exactly one GET per [`Transport::issue`] call
//! and copies status, headers, and body into the core response type. It
//! never retries; classification and the retry loop live in `tavola-core`.
//! Deadlines belong here: the builder's timeout is the only cancellation
//! mechanism the blocking fetch model offers.
#![warn(missing_docs)]

use std::time::Duration;

use reqwest::blocking::Client;

use tavola_core::{TavolaError, Transport, TransportResponse, Url};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("tavola/", env!("CARGO_PKG_VERSION"));

/// GET-only transport over a pooled blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// A transport with the default timeout and user agent.
    ///
    /// # Errors
    /// Returns [`TavolaError::Transport`] when the underlying client cannot
    /// be constructed (e.g. TLS backend initialization failure).
    pub fn new() -> Result<Self, TavolaError> {
        Self::builder().build()
    }

    /// Start configuring a transport.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn issue(&self, target: &Url) -> Result<TransportResponse, TavolaError> {
        let response = self
            .client
            .get(target.clone())
            .send()
            .map_err(|e| TavolaError::transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .map_err(|e| TavolaError::transport(e.to_string()))?
            .to_vec();
        Ok(TransportResponse::new(status, headers, body))
    }
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: String,
}

impl HttpTransportBuilder {
    /// Overall per-request deadline covering connect, send, and read.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default `tavola/<version>` user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// Returns [`TavolaError::Transport`] when the underlying client cannot
    /// be constructed.
    pub fn build(self) -> Result<HttpTransport, TavolaError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| TavolaError::transport(e.to_string()))?;
        Ok(HttpTransport { client })
    }
}
