//! Request construction: dataset codes, query builders, and their pure
//! data-to-string query mappings.

use core::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use tavola_core::{DATE_FORMAT, SeriesId, SortOrder, TavolaError};

/// A dataset identifier: database code plus dataset code, rendered `DB/CODE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetCode {
    database: String,
    dataset: String,
}

impl DatasetCode {
    /// Build a code from its two components.
    ///
    /// # Errors
    /// Returns [`TavolaError::InvalidArg`] when a component is empty or
    /// contains a `/`.
    pub fn new(database: impl Into<String>, dataset: impl Into<String>) -> Result<Self, TavolaError> {
        let database = database.into();
        let dataset = dataset.into();
        for part in [&database, &dataset] {
            if part.is_empty() {
                return Err(TavolaError::invalid_arg("dataset code component is empty"));
            }
            if part.contains('/') {
                return Err(TavolaError::invalid_arg(format!(
                    "dataset code component {part:?} contains '/'"
                )));
            }
        }
        Ok(Self { database, dataset })
    }

    /// The database component (e.g. `WIKI`).
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The dataset component (e.g. `AAPL`).
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }
}

impl fmt::Display for DatasetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.dataset)
    }
}

impl FromStr for DatasetCode {
    type Err = TavolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((database, dataset)) => Self::new(database, dataset),
            None => Err(TavolaError::invalid_arg(format!(
                "dataset code {s:?} is not of the form DB/CODE"
            ))),
        }
    }
}

/// Sampling frequency the service collapses a series to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// One observation per day.
    Daily,
    /// One observation per week.
    Weekly,
    /// One observation per month.
    Monthly,
    /// One observation per quarter.
    Quarterly,
    /// One observation per year.
    Annual,
}

impl Frequency {
    fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

/// Server-side transformation applied to value columns before delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Row-on-row difference.
    Diff,
    /// Row-on-row percent change.
    RDiff,
    /// Cumulative sum.
    Cumulative,
    /// Scale the series so its first value is 100.
    Normalize,
}

impl Transform {
    fn as_str(self) -> &'static str {
        match self {
            Self::Diff => "diff",
            Self::RDiff => "rdiff",
            Self::Cumulative => "cumul",
            Self::Normalize => "normalize",
        }
    }
}

/// One fully-parameterized dataset read.
///
/// Construction is builder-style; [`DatasetRequest::query_pairs`] is the pure
/// mapping from these fields to request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    code: DatasetCode,
    column: Option<usize>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    collapse: Option<Frequency>,
    transform: Option<Transform>,
    order: SortOrder,
    limit: Option<u32>,
}

impl DatasetRequest {
    /// A request for the full dataset, oldest rows first.
    #[must_use]
    pub fn new(code: DatasetCode) -> Self {
        Self {
            code,
            column: None,
            start: None,
            end: None,
            collapse: None,
            transform: None,
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    /// Restrict the response to a single value column by index.
    #[must_use]
    pub const fn column(mut self, index: usize) -> Self {
        self.column = Some(index);
        self
    }

    /// First date to include.
    #[must_use]
    pub const fn start_date(mut self, date: NaiveDate) -> Self {
        self.start = Some(date);
        self
    }

    /// Last date to include.
    #[must_use]
    pub const fn end_date(mut self, date: NaiveDate) -> Self {
        self.end = Some(date);
        self
    }

    /// Collapse the series to the given sampling frequency.
    #[must_use]
    pub const fn collapse(mut self, frequency: Frequency) -> Self {
        self.collapse = Some(frequency);
        self
    }

    /// Apply a server-side transformation to the value columns.
    #[must_use]
    pub const fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Requested row ordering over the date column.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The dataset this request reads.
    #[must_use]
    pub fn code(&self) -> &DatasetCode {
        &self.code
    }

    /// The series identifier labeling this request's columns in a merge.
    #[must_use]
    pub fn series_id(&self) -> SeriesId {
        match self.column {
            Some(index) => SeriesId::with_column(self.code.to_string(), index),
            None => SeriesId::new(self.code.to_string()),
        }
    }

    /// Check cross-field consistency before issuing the request.
    ///
    /// # Errors
    /// Returns [`TavolaError::InvalidArg`] when the date range is inverted.
    pub fn validate(&self) -> Result<(), TavolaError> {
        if let Some(start) = self.start
            && let Some(end) = self.end
            && start > end
        {
            return Err(TavolaError::invalid_arg(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(())
    }

    /// Resource path of this request, relative to the service base URL.
    #[must_use]
    pub fn data_path(&self) -> String {
        format!("datasets/{}/data.json", self.code)
    }

    /// The pure field-to-parameter mapping for this request.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(index) = self.column {
            pairs.push(("column_index", index.to_string()));
        }
        if let Some(start) = self.start {
            pairs.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }
        if let Some(frequency) = self.collapse {
            pairs.push(("collapse", frequency.as_str().to_string()));
        }
        if let Some(transform) = self.transform {
            pairs.push(("transform", transform.as_str().to_string()));
        }
        if self.order == SortOrder::Descending {
            pairs.push(("order", "desc".to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// A free-text dataset search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    per_page: Option<u32>,
    page: Option<u32>,
}

impl SearchQuery {
    /// Search for datasets matching `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            per_page: None,
            page: None,
        }
    }

    /// Number of results per page.
    #[must_use]
    pub const fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// One-based results page to return.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// The pure field-to-parameter mapping for this query.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}
