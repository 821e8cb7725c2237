//! Decoding of the service's JSON envelopes into core table and metadata
//! types, plus the reverse encoding used by the raw representation.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use tavola_core::{HeaderDefinition, Row, TabularResult, TavolaError};

use crate::metadata::{DatasetMetadata, SearchResults};

#[derive(Deserialize)]
struct DatasetDataEnvelope {
    dataset_data: DatasetData,
}

#[derive(Deserialize)]
struct DatasetData {
    column_names: Vec<String>,
    data: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct MetadataEnvelope {
    dataset: DatasetMetadata,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    datasets: Vec<DatasetMetadata>,
    #[serde(default)]
    meta: Option<SearchMeta>,
}

#[derive(Deserialize)]
struct SearchMeta {
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    current_page: Option<u64>,
}

/// Decode a `dataset_data` envelope into a [`TabularResult`].
///
/// JSON scalars map onto nullable string cells: `null` stays null, strings
/// pass through verbatim, numbers and booleans render via their display form.
///
/// # Errors
/// [`TavolaError::Decode`] for malformed JSON or non-scalar cells,
/// [`TavolaError::Shape`]/[`TavolaError::ShapeMismatch`] when the payload's
/// rows do not fit its own header.
pub fn decode_table(bytes: &[u8]) -> Result<TabularResult, TavolaError> {
    let envelope: DatasetDataEnvelope =
        serde_json::from_slice(bytes).map_err(|e| TavolaError::decode(e.to_string()))?;
    let header = Arc::new(HeaderDefinition::from_names(
        envelope.dataset_data.column_names,
    )?);
    let mut rows = Vec::with_capacity(envelope.dataset_data.data.len());
    for raw in envelope.dataset_data.data {
        let cells = raw
            .into_iter()
            .map(cell_from_json)
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(Row::new(Arc::clone(&header), cells)?);
    }
    TabularResult::new(header, rows)
}

/// Decode a `dataset` metadata envelope.
///
/// # Errors
/// [`TavolaError::Decode`] for malformed JSON.
pub fn decode_metadata(bytes: &[u8]) -> Result<DatasetMetadata, TavolaError> {
    let envelope: MetadataEnvelope =
        serde_json::from_slice(bytes).map_err(|e| TavolaError::decode(e.to_string()))?;
    Ok(envelope.dataset)
}

/// Decode a `datasets` search envelope.
///
/// # Errors
/// [`TavolaError::Decode`] for malformed JSON.
pub fn decode_search(bytes: &[u8]) -> Result<SearchResults, TavolaError> {
    let envelope: SearchEnvelope =
        serde_json::from_slice(bytes).map_err(|e| TavolaError::decode(e.to_string()))?;
    let meta = envelope.meta.unwrap_or(SearchMeta {
        total_count: None,
        current_page: None,
    });
    Ok(SearchResults {
        datasets: envelope.datasets,
        total_count: meta.total_count,
        current_page: meta.current_page,
    })
}

/// Decode any response body as raw JSON.
///
/// # Errors
/// [`TavolaError::Decode`] for malformed JSON.
pub fn decode_raw(bytes: &[u8]) -> Result<Value, TavolaError> {
    serde_json::from_slice(bytes).map_err(|e| TavolaError::decode(e.to_string()))
}

/// Re-encode a table as a `dataset_data` JSON document (raw representation
/// of merged output).
#[must_use]
pub fn table_to_json(table: &TabularResult) -> Value {
    let data: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            Value::Array(
                row.cells()
                    .iter()
                    .map(|cell| match cell {
                        Some(text) => Value::String(text.clone()),
                        None => Value::Null,
                    })
                    .collect(),
            )
        })
        .collect();
    serde_json::json!({
        "dataset_data": {
            "column_names": table.header().names(),
            "data": data,
        }
    })
}

fn cell_from_json(value: Value) -> Result<Option<String>, TavolaError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(TavolaError::decode(format!(
            "unsupported cell value: {other}"
        ))),
    }
}
