//! tavola-core
//!
//! Core types and fetch orchestration shared across the tavola workspace.
//!
//! - `table`: immutable table value types and the multi-series merge.
//! - `retry`: stateless retry policies for transient failures.
//! - `transport`: the GET-only transport seam implemented by provider crates.
//! - `fetch`: the retry-governed fetch orchestrator and outcome taxonomy.
//! - `error`: the unified error type.
//!
//! Blocking execution model
//! ------------------------
//! This crate is synchronous by design: a fetch blocks the calling thread for
//! the transport round-trip and any retry sleeps, and multi-series fetches
//! run strictly sequentially. There is no cancellation mid-fetch; callers
//! wanting a deadline configure it on the transport. All shared values
//! (policies, headers, tables) are immutable and freely shareable across
//! threads.
#![warn(missing_docs)]

/// Unified error type and helper constructors.
pub mod error;
/// Fetch orchestration: outcome classification, retry loop, observer events.
pub mod fetch;
/// Retry strategies for transient fetch failures.
pub mod retry;
pub mod table;
/// Transport seam implemented by HTTP and mock transports.
pub mod transport;

pub use error::TavolaError;
pub use fetch::{
    FetchEvent, FetchObserver, FetchOutcome, Fetcher, RATE_LIMIT_REMAINING, RETRY_AFTER,
    TracingObserver, TransientFailure, classify,
};
pub use retry::{RetryDecision, RetryPolicy};
pub use table::merge::{DATE_COLUMN, SeriesId, SortOrder, merge_series};
pub use table::{DATE_FORMAT, HeaderDefinition, Row, TabularResult};
pub use transport::{Transport, TransportResponse};

// Re-exported so downstream crates build fetch targets without naming `url`.
pub use url::Url;
