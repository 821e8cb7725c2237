use thiserror::Error;

use crate::fetch::TransientFailure;

/// Unified error type for the tavola workspace.
///
/// This covers request rejection, quota exhaustion, retry give-ups, decode and
/// table-shape failures, and unclassified transport faults. Transient
/// conditions (rate limiting with quota left, temporary unavailability) are
/// retried inside the fetch loop and never surface directly; everything here
/// is terminal for the call that produced it.
#[derive(Debug, Error)]
pub enum TavolaError {
    /// The service rejected the request as semantically invalid (HTTP 422).
    /// Never retried; resending an invalid request cannot help.
    #[error("request rejected by the service: {message}")]
    RequestRejected {
        /// Message extracted from the rejection body.
        message: String,
    },

    /// The caller's API quota is exhausted (HTTP 429 with a reported
    /// remaining budget of zero or less). Never retried.
    #[error("api quota exceeded (remaining={remaining})")]
    QuotaExceeded {
        /// Remaining quota units reported by the service at rejection time.
        remaining: i64,
    },

    /// Transient failures persisted past the retry policy's limit.
    #[error("retries exhausted after {attempts} attempt(s); last outcome: {last:?}")]
    RetriesExhausted {
        /// Number of transport attempts issued, including the first.
        attempts: u32,
        /// The transient classification of the final failed attempt.
        last: TransientFailure,
    },

    /// A successful response carried a structurally invalid payload.
    /// Never retried; the transport did its job, the payload did not.
    #[error("decode failure: {0}")]
    Decode(String),

    /// A table input is malformed (duplicate column names, zero columns,
    /// a row bound to a foreign header).
    #[error("malformed table: {0}")]
    Shape(String),

    /// A row was constructed with a cell count different from its header's
    /// column count.
    #[error("row has {actual} cell(s) but header defines {expected} column(s)")]
    ShapeMismatch {
        /// Column count of the header the row is bound to.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },

    /// A lookup named a column the header does not define.
    #[error("no such column: {column}")]
    ColumnNotFound {
        /// The requested column name (or `#index` for positional lookups).
        column: String,
    },

    /// A typed accessor found a non-null cell it could not parse.
    #[error("cannot parse {value:?} in column {column:?}")]
    Parse {
        /// Column the cell belongs to.
        column: String,
        /// Raw cell contents that failed to parse.
        value: String,
    },

    /// Unclassified transport failure (I/O error or an unexpected status).
    #[error("transport failure: {0}")]
    Transport(String),

    /// Invalid input argument to a request builder or session operation.
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl TavolaError {
    /// Helper: build a `RequestRejected` error from the rejection message.
    pub fn request_rejected(message: impl Into<String>) -> Self {
        Self::RequestRejected {
            message: message.into(),
        }
    }

    /// Helper: build a `Decode` error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Helper: build a `Shape` error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Helper: build a `ColumnNotFound` error for a column name.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Helper: build a `Parse` error for a cell that failed a typed read.
    pub fn parse(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Parse {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Helper: build an `InvalidArg` error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Self::InvalidArg(msg.into())
    }
}
