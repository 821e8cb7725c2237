//! Retry strategies for transient fetch failures.
//!
//! A policy is pure data: given the zero-based attempt number it answers
//! whether the orchestrator should wait and reattempt or give up. Policies own
//! no per-request state and may be shared freely across concurrent fetches.

use std::time::Duration;

/// Outcome of consulting a [`RetryPolicy`] for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given duration, then reattempt.
    Wait(Duration),
    /// Stop retrying; the failure is terminal.
    GiveUp,
}

/// Stateless strategy deciding whether a transient failure is retried.
///
/// The delay is the caller's responsibility to honor; consulting a policy
/// never fails and has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Give up on the very first failure.
    Never,
    /// Wait a fixed delay between attempts, up to `max_retries` retries.
    Fixed {
        /// Delay applied before every reattempt.
        delay: Duration,
        /// Number of retries granted after the initial attempt.
        max_retries: u32,
    },
    /// Look the delay up from an explicit backoff sequence indexed by attempt
    /// number; the sequence length bounds the retry count.
    Sequence(Vec<Duration>),
}

impl RetryPolicy {
    /// Decide what to do after the failure of attempt `attempt` (zero-based).
    #[must_use]
    pub fn decision(&self, attempt: u32) -> RetryDecision {
        match self {
            Self::Never => RetryDecision::GiveUp,
            Self::Fixed { delay, max_retries } => {
                if attempt < *max_retries {
                    RetryDecision::Wait(*delay)
                } else {
                    RetryDecision::GiveUp
                }
            }
            Self::Sequence(delays) => match delays.get(attempt as usize) {
                Some(delay) => RetryDecision::Wait(*delay),
                None => RetryDecision::GiveUp,
            },
        }
    }
}

impl Default for RetryPolicy {
    /// Three retries half a second apart.
    fn default() -> Self {
        Self::Fixed {
            delay: Duration::from_millis(500),
            max_retries: 3,
        }
    }
}
