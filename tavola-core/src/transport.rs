//! Transport seam between the fetch orchestrator and an HTTP client.
//!
//! The orchestrator never talks to the network directly; it issues GET
//! requests through this trait and classifies whatever comes back. Concrete
//! implementations live in `tavola-http` (blocking reqwest) and `tavola-mock`
//! (scripted responses for tests).

use url::Url;

use crate::TavolaError;

/// One raw response from the remote service.
///
/// Header access is case-insensitive; status-code and header semantics are
/// interpreted by the orchestrator, not the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TransportResponse {
    /// Assemble a response from its transport-level parts.
    #[must_use]
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// First header value for `name`, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw response body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response and return its body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// GET-only transport abstraction.
///
/// `issue` performs exactly one round-trip for a fully-parameterized target
/// and reports the raw result. Transports must not retry; the retry loop is
/// the orchestrator's job. Deadlines, if any, belong here (e.g. a connect or
/// read timeout on the underlying client) since the fetch loop itself carries
/// no cancel signal.
pub trait Transport: Send + Sync {
    /// Perform one GET of `target`.
    ///
    /// # Errors
    /// Returns [`TavolaError::Transport`] when no HTTP response was obtained
    /// at all (connection failure, timeout). Non-2xx responses are not errors
    /// at this layer.
    fn issue(&self, target: &Url) -> Result<TransportResponse, TavolaError>;
}
