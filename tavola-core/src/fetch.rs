//! Retry-governed fetch orchestration.
//!
//! [`Fetcher`] performs one logical fetch: it issues the transport call,
//! classifies the outcome into a small taxonomy ([`FetchOutcome`]), and drives
//! the [`RetryPolicy`] loop until success or a terminal error. The loop is an
//! explicit state machine (`Attempting` / `Retrying`; terminal transitions
//! return) so suspension points stay auditable in tests.
//!
//! Orchestration progress is reported as structured [`FetchEvent`]s through an
//! injected [`FetchObserver`] rather than a global logger; the default
//! observer forwards to `tracing`.

use std::time::Duration;

use url::Url;

use crate::TavolaError;
use crate::retry::{RetryDecision, RetryPolicy};
use crate::transport::{Transport, TransportResponse};

/// Header consulted on HTTP 429 for the server's requested pause.
pub const RETRY_AFTER: &str = "Retry-After";
/// Header consulted on HTTP 429 for the caller's remaining quota.
pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";

/// Classification of a single transport attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx; carries the response body for the decoder.
    Success(Vec<u8>),
    /// 429; the service is throttling the caller.
    RateLimited {
        /// Parsed `Retry-After` pause requested by the server, if present.
        retry_after: Option<Duration>,
        /// Parsed `X-RateLimit-Remaining` budget, if present.
        remaining: Option<i64>,
    },
    /// 503; the service is briefly down and worth retrying.
    TemporarilyUnavailable,
    /// 422; the request itself is semantically invalid.
    MalformedRequest(String),
    /// Anything else, including transport-level I/O failures.
    OtherFailure(String),
}

/// Transient classification kept as error context once retries run out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientFailure {
    /// The final attempt was rate-limited.
    RateLimited {
        /// `Retry-After` hint of the final attempt.
        retry_after: Option<Duration>,
        /// Remaining quota reported on the final attempt.
        remaining: Option<i64>,
    },
    /// The final attempt hit a 503.
    TemporarilyUnavailable,
}

/// Classify one raw transport response by status code.
///
/// Rules: 2xx success; 422 malformed request (body text becomes the message);
/// 429 rate-limited with `Retry-After` / `X-RateLimit-Remaining` extracted
/// when parseable; 503 temporarily unavailable; everything else is an
/// unclassified failure.
#[must_use]
pub fn classify(response: TransportResponse) -> FetchOutcome {
    match response.status() {
        200..=299 => FetchOutcome::Success(response.into_body()),
        422 => {
            FetchOutcome::MalformedRequest(String::from_utf8_lossy(response.body()).into_owned())
        }
        429 => FetchOutcome::RateLimited {
            retry_after: response
                .header(RETRY_AFTER)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
            remaining: response
                .header(RATE_LIMIT_REMAINING)
                .and_then(|v| v.trim().parse::<i64>().ok()),
        },
        503 => FetchOutcome::TemporarilyUnavailable,
        other => FetchOutcome::OtherFailure(format!("unexpected status {other}")),
    }
}

/// Structured orchestration event, emitted once per state transition.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// A transport attempt is about to be issued.
    Attempt {
        /// Zero-based attempt number.
        attempt: u32,
        /// Target of the fetch.
        target: &'a Url,
    },
    /// A transport attempt finished and was classified.
    Classified {
        /// Zero-based attempt number.
        attempt: u32,
        /// The classification it received.
        outcome: &'a FetchOutcome,
    },
    /// The policy granted a retry; the orchestrator is about to sleep.
    BackingOff {
        /// Zero-based attempt number that just failed.
        attempt: u32,
        /// Sleep duration taken from the policy.
        delay: Duration,
    },
}

/// Sink for [`FetchEvent`]s.
///
/// Injected so orchestration stays observable in tests without side-channel
/// assertions on a global logger.
pub trait FetchObserver: Send + Sync {
    /// Called once per event, in order.
    fn on_event(&self, event: &FetchEvent<'_>);
}

/// Default observer: forwards events to `tracing` at debug/trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn on_event(&self, event: &FetchEvent<'_>) {
        match event {
            FetchEvent::Attempt { attempt, target } => {
                tracing::debug!(attempt, %target, "issuing fetch");
            }
            FetchEvent::Classified { attempt, outcome } => {
                tracing::trace!(attempt, ?outcome, "attempt classified");
            }
            FetchEvent::BackingOff { attempt, delay } => {
                tracing::debug!(attempt, ?delay, "backing off before retry");
            }
        }
    }
}

static DEFAULT_OBSERVER: TracingObserver = TracingObserver;

/// Retry loop states between attempts; terminal transitions return instead.
enum FetchState {
    Attempting { attempt: u32 },
    Retrying { attempt: u32, delay: Duration },
}

/// Orchestrator for one logical fetch with transport-classified retry.
///
/// Parameterized over the payload type through [`Fetcher::fetch`]'s decoder
/// argument, so the same loop serves every request kind (raw metadata blob or
/// decoded table).
pub struct Fetcher<'a> {
    transport: &'a dyn Transport,
    policy: &'a RetryPolicy,
    observer: &'a dyn FetchObserver,
}

impl<'a> Fetcher<'a> {
    /// Bind an orchestrator to a transport and a retry policy.
    #[must_use]
    pub fn new(transport: &'a dyn Transport, policy: &'a RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            observer: &DEFAULT_OBSERVER,
        }
    }

    /// Replace the default tracing observer with an injected sink.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn FetchObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Perform one logical fetch of `target`, retrying transient failures
    /// according to the policy, and decode the successful body into `P`.
    ///
    /// The decoder runs at most once, on the final successful response; a
    /// decoder failure is terminal, never retried. Sleeping between attempts
    /// is synchronous (`std::thread::sleep`) and is the loop's sole
    /// suspension point.
    ///
    /// # Errors
    /// - [`TavolaError::RequestRejected`] on 422 (first occurrence, no retry).
    /// - [`TavolaError::QuotaExceeded`] on 429 reporting remaining quota ≤ 0
    ///   (no retry; exhaustion must be positively asserted by the service,
    ///   a 429 without quota information stays on the retry path).
    /// - [`TavolaError::RetriesExhausted`] when the policy gives up on a
    ///   transient failure, wrapping the last classified outcome.
    /// - [`TavolaError::Transport`] for I/O failures and unexpected statuses.
    /// - Whatever the decoder returns, propagated verbatim.
    pub fn fetch<P, D>(&self, target: &Url, decode: D) -> Result<P, TavolaError>
    where
        D: FnOnce(&[u8]) -> Result<P, TavolaError>,
    {
        let mut state = FetchState::Attempting { attempt: 0 };
        loop {
            state = match state {
                FetchState::Attempting { attempt } => {
                    self.observer
                        .on_event(&FetchEvent::Attempt { attempt, target });
                    let outcome = match self.transport.issue(target) {
                        Ok(response) => classify(response),
                        Err(err) => FetchOutcome::OtherFailure(err.to_string()),
                    };
                    self.observer.on_event(&FetchEvent::Classified {
                        attempt,
                        outcome: &outcome,
                    });
                    match outcome {
                        FetchOutcome::Success(body) => return decode(&body),
                        FetchOutcome::MalformedRequest(message) => {
                            return Err(TavolaError::RequestRejected { message });
                        }
                        FetchOutcome::OtherFailure(message) => {
                            return Err(TavolaError::Transport(message));
                        }
                        FetchOutcome::RateLimited {
                            retry_after,
                            remaining,
                        } => {
                            if let Some(left) = remaining
                                && left <= 0
                            {
                                return Err(TavolaError::QuotaExceeded { remaining: left });
                            }
                            self.consult_policy(
                                attempt,
                                TransientFailure::RateLimited {
                                    retry_after,
                                    remaining,
                                },
                            )?
                        }
                        FetchOutcome::TemporarilyUnavailable => {
                            self.consult_policy(attempt, TransientFailure::TemporarilyUnavailable)?
                        }
                    }
                }
                FetchState::Retrying { attempt, delay } => {
                    self.observer
                        .on_event(&FetchEvent::BackingOff { attempt, delay });
                    std::thread::sleep(delay);
                    FetchState::Attempting {
                        attempt: attempt + 1,
                    }
                }
            };
        }
    }

    fn consult_policy(
        &self,
        attempt: u32,
        last: TransientFailure,
    ) -> Result<FetchState, TavolaError> {
        match self.policy.decision(attempt) {
            RetryDecision::Wait(delay) => Ok(FetchState::Retrying { attempt, delay }),
            RetryDecision::GiveUp => Err(TavolaError::RetriesExhausted {
                attempts: attempt + 1,
                last,
            }),
        }
    }
}
