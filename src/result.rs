//! Materialized query results

use std::sync::Arc;

use crate::column::ColumnMetadata;
use crate::cursor::RowCursor;

/// Rows of raw cells, header first.
///
/// Row 0 holds the column names; their order maps a name to a cell index in
/// every data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Vec<String>>,
}

impl ResultSet {
    /// Create a result set from a header and data rows
    pub fn new(header: Vec<String>, data: Vec<Vec<String>>) -> Self {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(header);
        rows.extend(data);
        Self { rows }
    }

    /// Create a result set whose first row is the header
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Column names (empty when the server sent nothing)
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row by absolute index; 0 is the header
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Check if there are no data rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one `execute` call produced
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Header and data rows
    pub result_set: ResultSet,
    /// Types and descriptions of the queried table's columns
    pub metadata: ColumnMetadata,
}

impl QueryResult {
    /// Create a query result
    pub fn new(result_set: ResultSet, metadata: ColumnMetadata) -> Self {
        Self {
            result_set,
            metadata,
        }
    }

    /// Column names
    pub fn headers(&self) -> &[String] {
        self.result_set.header()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.result_set.len()
    }

    /// Wrap the result in a typed cursor
    pub fn into_cursor(self) -> RowCursor {
        RowCursor::new(Arc::new(self.result_set), Arc::new(self.metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_result_set_layout() {
        let set = ResultSet::new(strings(&["a", "b"]), vec![strings(&["1", "2"])]);
        assert_eq!(set.header(), strings(&["a", "b"]).as_slice());
        assert_eq!(set.len(), 1);
        assert_eq!(set.row(1), Some(strings(&["1", "2"]).as_slice()));
        assert_eq!(set.rows().len(), 1);
    }

    #[test]
    fn test_empty_result_set() {
        let set = ResultSet::default();
        assert!(set.header().is_empty());
        assert!(set.is_empty());
        assert!(set.rows().is_empty());

        let set = ResultSet::from_rows(vec![strings(&["a"])]);
        assert!(set.is_empty());
        assert_eq!(set.header().len(), 1);
    }
}
