//! Typed row cursor
//!
//! [`RowCursor`] walks a materialized [`ResultSet`] and coerces cells by
//! column name on demand.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use livestatus_rs::{ColumnInfo, ColumnMetadata, ResultSet, RowCursor, Value};
//!
//! # fn example() -> livestatus_rs::Result<()> {
//! let set = ResultSet::new(
//!     vec!["name".into(), "state".into()],
//!     vec![vec!["web01".into(), "0".into()]],
//! );
//! let metadata: ColumnMetadata = vec![ColumnInfo::new("state", "int", "")].into_iter().collect();
//!
//! let mut cursor = RowCursor::new(Arc::new(set), Arc::new(metadata));
//! while cursor.advance() {
//!     assert_eq!(cursor.value("state")?, Value::Integer(0));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::column::ColumnMetadata;
use crate::error::{Error, Result};
use crate::result::ResultSet;
use crate::row::Value;

/// Position of the header row; also the position before the first data row
const BEFORE_FIRST: usize = 0;

/// A header-aware, rewindable cursor over a result set.
///
/// The data is shared and never mutated; only the position belongs to the
/// cursor. Clone the cursor to give another consumer its own position.
#[derive(Debug, Clone)]
pub struct RowCursor {
    result_set: Arc<ResultSet>,
    metadata: Arc<ColumnMetadata>,
    headers: Vec<String>,
    position: usize,
}

impl RowCursor {
    /// Create a cursor positioned before the first data row
    pub fn new(result_set: Arc<ResultSet>, metadata: Arc<ColumnMetadata>) -> Self {
        let headers = result_set.header().to_vec();
        Self {
            result_set,
            metadata,
            headers,
            position: BEFORE_FIRST,
        }
    }

    /// Column names in result order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Declared type tag, or `""` if the column is unknown
    pub fn field_type(&self, name: &str) -> &str {
        self.metadata.type_tag(name)
    }

    /// Column description, or `""` if the column is unknown
    pub fn field_description(&self, name: &str) -> &str {
        self.metadata.description(name)
    }

    /// Move to the next data row; `false` once past the last one
    pub fn advance(&mut self) -> bool {
        if self.position <= self.result_set.len() {
            self.position += 1;
        }
        self.position <= self.result_set.len()
    }

    /// Go back to before the first data row
    pub fn rewind(&mut self) {
        self.position = BEFORE_FIRST;
    }

    /// Current data row, 1-based; 0 before the first `advance`
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.result_set.len()
    }

    /// Typed value of `name` in the current row
    pub fn value(&self, name: &str) -> Result<Value> {
        if self.position == BEFORE_FIRST || self.position > self.result_set.len() {
            return Err(Error::InvalidCursor(format!(
                "not positioned on a data row (position {} of {})",
                self.position,
                self.result_set.len()
            )));
        }
        self.value_in_row(self.position, name)
    }

    /// Typed value of `name` in data row `row` (0-based), ignoring the position
    pub fn value_at(&self, row: usize, name: &str) -> Result<Value> {
        if row >= self.result_set.len() {
            return Err(Error::InvalidCursor(format!(
                "row {} out of range ({} rows)",
                row,
                self.result_set.len()
            )));
        }
        self.value_in_row(row + 1, name)
    }

    fn value_in_row(&self, index: usize, name: &str) -> Result<Value> {
        let column = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;

        let raw = self
            .result_set
            .row(index)
            .and_then(|cells| cells.get(column))
            .ok_or_else(|| Error::UnknownField(name.to_string()))?;

        Value::decode(name, raw, self.metadata.column_type(name))
    }
}
