//! tavola turns a remote tabular time-series service into typed in-process
//! values.
//!
//! Overview
//! - One blocking [`Session`] per service deployment; typed and raw result
//!   representations share the same orchestration ([`ResponseFormat`]).
//! - Every remote read runs through the retry-governed fetch loop in
//!   `tavola-core`: rate limiting and brief unavailability are retried under
//!   a [`RetryPolicy`](tavola_core::RetryPolicy), everything else surfaces
//!   immediately as one typed error.
//! - Multi-series requests fetch each series sequentially, skip (and log)
//!   individual failures, and align the survivors on their shared date key
//!   into one wide table.
//!
//! Key behaviors and trade-offs
//! - Blocking by design: calls occupy the calling thread for round-trips and
//!   backoff sleeps; set deadlines on the transport (`tavola-http`'s builder)
//!   rather than expecting mid-fetch cancellation.
//! - Partial failure in a batch is not an error: a merged table may cover a
//!   subset of the requested series, with the missing series's columns
//!   simply absent. Absent observations are nulls, never zeros.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use tavola::{DatasetRequest, SessionBuilder, TypedSession};
//! use tavola_core::SortOrder;
//! use tavola_http::HttpTransport;
//!
//! let session: TypedSession = SessionBuilder::new()
//!     .transport(Arc::new(HttpTransport::new()?))
//!     .api_key(std::env::var("TAVOLA_API_KEY")?)
//!     .build()?;
//!
//! let close = session.dataset(&DatasetRequest::new("WIKI/AAPL".parse()?).column(4))?;
//! let merged = session.dataset_multi(
//!     &["WIKI/AAPL".parse().map(DatasetRequest::new)?,
//!       "WIKI/MSFT".parse().map(DatasetRequest::new)?],
//!     SortOrder::Ascending,
//! )?;
//! ```
#![warn(missing_docs)]

/// JSON envelope decoding shared by the typed and raw representations.
pub mod codec;
/// Result-representation capability trait and its implementations.
pub mod format;
/// Typed metadata and search documents.
pub mod metadata;
/// Dataset codes, request builders, and query mappings.
pub mod request;
/// The session façade.
pub mod session;

pub use format::{Raw, ResponseFormat, Typed};
pub use metadata::{DatasetMetadata, SearchResults};
pub use request::{DatasetCode, DatasetRequest, Frequency, SearchQuery, Transform};
pub use session::{DEFAULT_BASE_URL, RawSession, Session, SessionBuilder, TypedSession};

pub use tavola_core::{
    HeaderDefinition, RetryPolicy, Row, SeriesId, SortOrder, TabularResult, TavolaError,
};
