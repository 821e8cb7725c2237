use std::collections::HashMap;

use crate::TavolaError;

/// Ordered, duplicate-free mapping from column name to zero-based index.
///
/// Index assignment follows insertion order. A header is created once per
/// table and never mutated; many [`Row`](crate::table::Row)s share a single
/// instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDefinition {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeaderDefinition {
    /// Build a header from column names in order.
    ///
    /// # Errors
    /// Returns [`TavolaError::Shape`] when a name occurs more than once.
    pub fn from_names<I, S>(names: I) -> Result<Self, TavolaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self {
            names: Vec::new(),
            index: HashMap::new(),
        };
        for name in names {
            let name = name.into();
            if out.index.contains_key(&name) {
                return Err(TavolaError::shape(format!(
                    "duplicate column name {name:?}"
                )));
            }
            out.index.insert(name.clone(), out.names.len());
            out.names.push(name);
        }
        Ok(out)
    }

    /// Zero-based index of `name`.
    ///
    /// # Errors
    /// Returns [`TavolaError::ColumnNotFound`] for an unknown name.
    pub fn column_index(&self, name: &str) -> Result<usize, TavolaError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| TavolaError::column_not_found(name))
    }

    /// Whether `name` is a defined column.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Column names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header defines no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
