//! Result-representation capability point.
//!
//! The session is generic over a [`ResponseFormat`] so the same orchestration
//! and merge logic serves distinct result shapes. [`Typed`] yields core table
//! and metadata types; [`Raw`] yields unprocessed `serde_json::Value`
//! documents for callers doing their own decoding.

use serde_json::Value;

use tavola_core::{TabularResult, TavolaError};

use crate::codec;
use crate::metadata::{DatasetMetadata, SearchResults};

/// Capability set turning raw payloads into one concrete result
/// representation.
///
/// Any implementation can be plugged into the session; the orchestrator and
/// multi-series merge are shared.
pub trait ResponseFormat {
    /// Representation of a dataset table.
    type Table;
    /// Representation of a dataset metadata document.
    type Metadata;
    /// Representation of a search result page.
    type Search;

    /// Decode a successful dataset-data body.
    ///
    /// # Errors
    /// Returns [`TavolaError::Decode`] (or a shape error) for a structurally
    /// invalid payload; never retried by the orchestrator.
    fn decode_table(bytes: &[u8]) -> Result<Self::Table, TavolaError>;

    /// Decode a successful metadata body.
    ///
    /// # Errors
    /// Returns [`TavolaError::Decode`] for a structurally invalid payload.
    fn decode_metadata(bytes: &[u8]) -> Result<Self::Metadata, TavolaError>;

    /// Decode a successful search body.
    ///
    /// # Errors
    /// Returns [`TavolaError::Decode`] for a structurally invalid payload.
    fn decode_search(bytes: &[u8]) -> Result<Self::Search, TavolaError>;

    /// Package a merged multi-series table into this representation.
    ///
    /// # Errors
    /// Implementation-specific; the typed representation is infallible here.
    fn from_merged(table: TabularResult) -> Result<Self::Table, TavolaError>;
}

/// Typed representation: core tables plus typed metadata wrappers.
#[derive(Debug, Clone, Copy)]
pub struct Typed;

impl ResponseFormat for Typed {
    type Table = TabularResult;
    type Metadata = DatasetMetadata;
    type Search = SearchResults;

    fn decode_table(bytes: &[u8]) -> Result<Self::Table, TavolaError> {
        codec::decode_table(bytes)
    }

    fn decode_metadata(bytes: &[u8]) -> Result<Self::Metadata, TavolaError> {
        codec::decode_metadata(bytes)
    }

    fn decode_search(bytes: &[u8]) -> Result<Self::Search, TavolaError> {
        codec::decode_search(bytes)
    }

    fn from_merged(table: TabularResult) -> Result<Self::Table, TavolaError> {
        Ok(table)
    }
}

/// Raw representation: JSON documents as the service sent them.
///
/// Bodies are still validated as JSON so the orchestrator's no-garbage
/// guarantee holds; merged output is re-encoded as a `dataset_data` document.
#[derive(Debug, Clone, Copy)]
pub struct Raw;

impl ResponseFormat for Raw {
    type Table = Value;
    type Metadata = Value;
    type Search = Value;

    fn decode_table(bytes: &[u8]) -> Result<Self::Table, TavolaError> {
        codec::decode_raw(bytes)
    }

    fn decode_metadata(bytes: &[u8]) -> Result<Self::Metadata, TavolaError> {
        codec::decode_raw(bytes)
    }

    fn decode_search(bytes: &[u8]) -> Result<Self::Search, TavolaError> {
        codec::decode_raw(bytes)
    }

    fn from_merged(table: TabularResult) -> Result<Self::Table, TavolaError> {
        Ok(codec::table_to_json(&table))
    }
}
