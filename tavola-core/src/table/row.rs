use std::sync::Arc;

use chrono::NaiveDate;

use crate::TavolaError;
use crate::table::HeaderDefinition;

/// Date format used by the service for key cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A fixed-length ordered sequence of nullable string cells bound to exactly
/// one [`HeaderDefinition`].
///
/// Typed accessors parse lazily: a null or empty cell always yields `None`
/// rather than an error, while a malformed non-empty cell fails with
/// [`TavolaError::Parse`].
#[derive(Debug, Clone)]
pub struct Row {
    header: Arc<HeaderDefinition>,
    cells: Vec<Option<String>>,
}

impl Row {
    /// Bind `cells` to `header`.
    ///
    /// # Errors
    /// Returns [`TavolaError::ShapeMismatch`] when the cell count differs
    /// from the header's column count.
    pub fn new(
        header: Arc<HeaderDefinition>,
        cells: Vec<Option<String>>,
    ) -> Result<Self, TavolaError> {
        if cells.len() != header.len() {
            return Err(TavolaError::ShapeMismatch {
                expected: header.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { header, cells })
    }

    /// The header this row is bound to.
    #[must_use]
    pub fn header(&self) -> &Arc<HeaderDefinition> {
        &self.header
    }

    /// All cells in column order.
    #[must_use]
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// Raw cell contents for the named column.
    ///
    /// # Errors
    /// Returns [`TavolaError::ColumnNotFound`] for an unknown name.
    pub fn cell(&self, name: &str) -> Result<Option<&str>, TavolaError> {
        let index = self.header.column_index(name)?;
        Ok(self.cells[index].as_deref())
    }

    /// Parse the named cell as a calendar date (`%Y-%m-%d`).
    ///
    /// # Errors
    /// [`TavolaError::ColumnNotFound`] for an unknown name,
    /// [`TavolaError::Parse`] for a malformed non-empty cell.
    pub fn date(&self, name: &str) -> Result<Option<NaiveDate>, TavolaError> {
        self.date_at(self.header.column_index(name)?)
    }

    /// Parse the cell at `index` as a calendar date (`%Y-%m-%d`).
    ///
    /// # Errors
    /// [`TavolaError::ColumnNotFound`] for an out-of-range index,
    /// [`TavolaError::Parse`] for a malformed non-empty cell.
    pub fn date_at(&self, index: usize) -> Result<Option<NaiveDate>, TavolaError> {
        let Some(raw) = self.raw_at(index)? else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| TavolaError::parse(self.column_name(index), raw))
    }

    /// Parse the named cell as a floating-point value.
    ///
    /// # Errors
    /// [`TavolaError::ColumnNotFound`] for an unknown name,
    /// [`TavolaError::Parse`] for a malformed non-empty cell.
    pub fn value(&self, name: &str) -> Result<Option<f64>, TavolaError> {
        self.value_at(self.header.column_index(name)?)
    }

    /// Parse the cell at `index` as a floating-point value.
    ///
    /// # Errors
    /// [`TavolaError::ColumnNotFound`] for an out-of-range index,
    /// [`TavolaError::Parse`] for a malformed non-empty cell.
    pub fn value_at(&self, index: usize) -> Result<Option<f64>, TavolaError> {
        let Some(raw) = self.raw_at(index)? else {
            return Ok(None);
        };
        raw.parse::<f64>()
            .map(Some)
            .map_err(|_| TavolaError::parse(self.column_name(index), raw))
    }

    /// Non-empty raw contents at `index`; null and empty cells collapse to `None`.
    fn raw_at(&self, index: usize) -> Result<Option<&str>, TavolaError> {
        let cell = self
            .cells
            .get(index)
            .ok_or_else(|| TavolaError::column_not_found(format!("#{index}")))?;
        Ok(cell.as_deref().filter(|raw| !raw.is_empty()))
    }

    fn column_name(&self, index: usize) -> String {
        self.header
            .names()
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{index}"))
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.header, &other.header) || self.header == other.header)
            && self.cells == other.cells
    }
}

impl Eq for Row {}
