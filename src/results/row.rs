use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// A single row from a query result.
///
/// Column names and the name→index map are shared across all rows of a
/// result set, so a row is just its values plus two `Arc` pointers.
#[derive(Debug, Clone)]
pub struct DbRow {
    /// The column names for this row (shared across the result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<RowValues>,
    pub(crate) column_lookup: Arc<HashMap<String, usize>>,
}

impl DbRow {
    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_lookup.get(column_name) {
            return Some(idx);
        }
        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value by column name, or `None` if the column does not exist.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column index, or `None` if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }
}
