//! Scripted transport for CI-safe tests. Replays canned responses in order
//! and records every target it was asked to fetch.

use std::collections::VecDeque;
use std::sync::Mutex;

use tavola_core::{TavolaError, Transport, TransportResponse, Url};

/// Transport that hands out a pre-loaded script of responses, one per call.
///
/// An exhausted script reports a transport error rather than panicking, so a
/// test that issues more calls than scripted fails through the normal error
/// path.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TavolaError>>>,
    requests: Mutex<Vec<Url>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// An empty script; enqueue responses before use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a canned response to the script.
    pub fn enqueue(&self, response: TransportResponse) {
        self.script.lock().expect("mutex poisoned").push_back(Ok(response));
    }

    /// Append a transport-level failure to the script.
    pub fn enqueue_error(&self, error: TavolaError) {
        self.script.lock().expect("mutex poisoned").push_back(Err(error));
    }

    /// Every target issued so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().expect("mutex poisoned").clone()
    }

    /// Number of calls issued so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("mutex poisoned").len()
    }

    /// A 200 response with a JSON body.
    #[must_use]
    pub fn json_ok(body: &str) -> TransportResponse {
        TransportResponse::new(
            200,
            vec![("Content-Type".into(), "application/json".into())],
            body.as_bytes().to_vec(),
        )
    }

    /// A bare response with the given status and empty body.
    #[must_use]
    pub fn status(status: u16) -> TransportResponse {
        TransportResponse::new(status, Vec::new(), Vec::new())
    }

    /// A 429 with optional `Retry-After` / `X-RateLimit-Remaining` headers.
    #[must_use]
    pub fn rate_limited(retry_after: Option<u64>, remaining: Option<i64>) -> TransportResponse {
        let mut headers = Vec::new();
        if let Some(seconds) = retry_after {
            headers.push(("Retry-After".into(), seconds.to_string()));
        }
        if let Some(remaining) = remaining {
            headers.push(("X-RateLimit-Remaining".into(), remaining.to_string()));
        }
        TransportResponse::new(429, headers, Vec::new())
    }

    /// A 422 carrying a rejection message body.
    #[must_use]
    pub fn rejected(message: &str) -> TransportResponse {
        TransportResponse::new(422, Vec::new(), message.as_bytes().to_vec())
    }
}

impl Transport for ScriptedTransport {
    fn issue(&self, target: &Url) -> Result<TransportResponse, TavolaError> {
        self.requests.lock().expect("mutex poisoned").push(target.clone());
        self.script
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(TavolaError::transport("mock script exhausted")))
    }
}
