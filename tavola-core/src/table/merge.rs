use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::TavolaError;
use crate::table::{HeaderDefinition, Row, TabularResult};

/// Name of the shared key column in merged output.
pub const DATE_COLUMN: &str = "Date";

/// Requested ordering of merged rows over the parsed date key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest date first (the default).
    #[default]
    Ascending,
    /// Newest date first.
    Descending,
}

/// Opaque key identifying one series within a multi-series request.
///
/// Labels the series's columns in merged output and, when a single-column
/// index is attached, narrows the per-series fetch to that column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesId {
    code: String,
    column: Option<usize>,
}

impl SeriesId {
    /// Identify a series by its dataset code.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            column: None,
        }
    }

    /// Identify a series by code plus a requested single-column index.
    pub fn with_column(code: impl Into<String>, column: usize) -> Self {
        Self {
            code: code.into(),
            column: Some(column),
        }
    }

    /// The dataset code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The requested single-column index, if any.
    #[must_use]
    pub const fn column(&self) -> Option<usize> {
        self.column
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Combine independently fetched series, each keyed by its own first column
/// as a date, into one wide table keyed by the union of all dates.
///
/// The merged header is `["Date"]` followed, per input in encounter order, by
/// that input's non-date column names qualified as `"<series id> - <name>"`.
/// A cell absent for a date in one series stays null in the merged row, and a
/// series contributing no usable rows still reserves its column range as
/// nulls. Rows whose date cell is null or unparseable are skipped rather than
/// failing the merge. The raw date string of the last row landing on a date
/// wins; ordering is always over the parsed date.
///
/// # Errors
/// Returns [`TavolaError::Shape`] when an input table has zero columns, or
/// when the qualified column labels collide in the merged header.
pub fn merge_series(
    inputs: &[(SeriesId, TabularResult)],
    order: SortOrder,
) -> Result<TabularResult, TavolaError> {
    // Column layout: the shared date column counted once, then each series's
    // non-date columns at a fixed offset, in encounter order.
    let mut offsets = Vec::with_capacity(inputs.len());
    let mut total_width = 1usize;
    for (id, table) in inputs {
        let width = table.header().len();
        if width == 0 {
            return Err(TavolaError::shape(format!("series {id} has no columns")));
        }
        offsets.push(total_width);
        total_width += width - 1;
    }

    let mut names = Vec::with_capacity(total_width);
    names.push(DATE_COLUMN.to_string());
    for (id, table) in inputs {
        for name in &table.header().names()[1..] {
            names.push(format!("{id} - {name}"));
        }
    }
    let header = Arc::new(HeaderDefinition::from_names(names)?);

    let mut by_date: BTreeMap<NaiveDate, Vec<Option<String>>> = BTreeMap::new();
    for ((id, table), offset) in inputs.iter().zip(&offsets) {
        let series_width = table.header().len() - 1;
        for row in table.rows() {
            let date = match row.date_at(0) {
                Ok(Some(date)) => date,
                Ok(None) | Err(_) => {
                    tracing::debug!(series = %id, "skipping row with unusable date cell");
                    continue;
                }
            };
            let merged = by_date
                .entry(date)
                .or_insert_with(|| vec![None; total_width]);
            merged[0] = row.cells()[0].clone();
            merged[*offset..*offset + series_width].clone_from_slice(&row.cells()[1..]);
        }
    }

    let ordered: Vec<Vec<Option<String>>> = match order {
        SortOrder::Ascending => by_date.into_values().collect(),
        SortOrder::Descending => by_date.into_values().rev().collect(),
    };
    let mut rows = Vec::with_capacity(ordered.len());
    for cells in ordered {
        rows.push(Row::new(Arc::clone(&header), cells)?);
    }
    TabularResult::new(header, rows)
}
