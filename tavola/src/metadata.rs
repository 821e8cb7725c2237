//! Typed wrappers for the service's metadata and search documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata document describing one dataset.
///
/// Fields the service omits deserialize to `None`/empty rather than failing,
/// since metadata coverage varies per database.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetMetadata {
    /// Service-assigned numeric id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Dataset component of the code (e.g. `AAPL`).
    #[serde(rename = "dataset_code")]
    pub code: String,
    /// Database component of the code (e.g. `WIKI`).
    pub database_code: String,
    /// Human-readable dataset name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Most recent observation date.
    #[serde(default)]
    pub newest_available_date: Option<NaiveDate>,
    /// Oldest observation date.
    #[serde(default)]
    pub oldest_available_date: Option<NaiveDate>,
    /// Column names of the dataset's table.
    #[serde(default)]
    pub column_names: Vec<String>,
    /// Native sampling frequency as reported by the service.
    #[serde(default)]
    pub frequency: Option<String>,
    /// Whether the dataset requires a paid subscription.
    #[serde(default)]
    pub premium: Option<bool>,
}

impl DatasetMetadata {
    /// The full `DB/CODE` form of this dataset's code.
    #[must_use]
    pub fn full_code(&self) -> String {
        format!("{}/{}", self.database_code, self.code)
    }
}

/// One page of dataset search results.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResults {
    /// Matching dataset documents, best match first.
    pub datasets: Vec<DatasetMetadata>,
    /// Total matches across all pages, when reported.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// One-based page this result set covers, when reported.
    #[serde(default)]
    pub current_page: Option<u64>,
}
