use std::collections::HashMap;
use std::sync::Arc;

use super::row::DbRow;
use crate::types::RowValues;

/// Materialized rows returned by a query.
///
/// This is the result handle handed to callers: rows are fully extracted
/// into [`RowValues`] before the backend statement is released, so the
/// result set has no lifetime tie to the connection.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<DbRow>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names shared by all rows of this result set.
    ///
    /// Builds the name→index map once; every appended row reuses it.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let index = column_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        self.column_index = Some(Arc::new(index));
        self.column_names = Some(column_names);
    }

    /// Column names for this result set, if any rows have been described.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row of values. Ignored if column names were never set.
    pub fn add_row_values(&mut self, values: Vec<RowValues>) {
        if let (Some(column_names), Some(column_index)) =
            (&self.column_names, &self.column_index)
        {
            self.rows.push(DbRow {
                column_names: column_names.clone(),
                values,
                column_lookup: column_index.clone(),
            });
        }
    }

    /// Number of rows in the result set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
