//! Immutable table value types and the multi-series merge.
//!
//! Modules include:
//! - `header`: ordered name → index column mapping
//! - `row`: nullable string cells with lazy typed accessors
//! - `merge`: align multiple series on a shared date key into one wide table

/// Ordered column-name mapping shared by rows of one table.
pub mod header;
/// Wide-table merge across independently fetched series.
pub mod merge;
/// Nullable-cell rows with typed accessors.
pub mod row;

pub use header::HeaderDefinition;
pub use row::{DATE_FORMAT, Row};

use std::sync::Arc;

use crate::TavolaError;

/// An immutable decoded table: one header plus an ordered sequence of rows.
///
/// Every row references the table's own header (or a structurally equal one);
/// this is enforced at construction. Two tables are equal iff their headers
/// are equal and their rows are equal positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularResult {
    header: Arc<HeaderDefinition>,
    rows: Vec<Row>,
}

impl TabularResult {
    /// Bind `rows` to `header`.
    ///
    /// # Errors
    /// Returns [`TavolaError::Shape`] when a row is bound to a header that is
    /// neither the same instance nor structurally equal.
    pub fn new(header: Arc<HeaderDefinition>, rows: Vec<Row>) -> Result<Self, TavolaError> {
        for row in &rows {
            if !Arc::ptr_eq(row.header(), &header) && **row.header() != *header {
                return Err(TavolaError::shape("row bound to a different header"));
            }
        }
        Ok(Self { header, rows })
    }

    /// A table with the given header and no rows.
    #[must_use]
    pub fn empty(header: Arc<HeaderDefinition>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// The table's header.
    #[must_use]
    pub fn header(&self) -> &Arc<HeaderDefinition> {
        &self.header
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_must_share_the_table_header() {
        let header = Arc::new(HeaderDefinition::from_names(["Date", "Close"]).unwrap());
        let other = Arc::new(HeaderDefinition::from_names(["Date", "Open"]).unwrap());
        let row = Row::new(Arc::clone(&other), vec![None, None]).unwrap();
        assert!(matches!(
            TabularResult::new(header, vec![row]),
            Err(TavolaError::Shape(_))
        ));
    }

    #[test]
    fn structurally_equal_headers_are_accepted() {
        let header = Arc::new(HeaderDefinition::from_names(["Date", "Close"]).unwrap());
        let twin = Arc::new(HeaderDefinition::from_names(["Date", "Close"]).unwrap());
        let row = Row::new(twin, vec![Some("2020-01-01".into()), None]).unwrap();
        let table = TabularResult::new(Arc::clone(&header), vec![row]).unwrap();
        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(table.header(), &header));
    }
}
