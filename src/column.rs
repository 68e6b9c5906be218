//! Column metadata
//!
//! Livestatus describes every column of every table through the `columns`
//! pseudo-table. Each row there yields one [`ColumnInfo`].

use indexmap::IndexMap;

use crate::constants::{type_tag, STATS_PREFIX};

/// How a column's cells are coerced when read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnType {
    /// Signed integer
    Int,
    /// Floating point
    Float,
    /// Separator-delimited list of strings
    List,
    /// Raw text (also used for every tag not listed above)
    #[default]
    String,
}

impl ColumnType {
    /// Map a server type tag to a column type
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            type_tag::INT => ColumnType::Int,
            type_tag::FLOAT => ColumnType::Float,
            type_tag::LIST => ColumnType::List,
            _ => ColumnType::String,
        }
    }

    /// Canonical tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => type_tag::INT,
            ColumnType::Float => type_tag::FLOAT,
            ColumnType::List => type_tag::LIST,
            ColumnType::String => type_tag::STRING,
        }
    }
}

/// Check if a column is an aggregate produced by a `Stats:` header
pub fn is_stats_column(name: &str) -> bool {
    name.starts_with(STATS_PREFIX)
}

/// Metadata for one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Type tag as declared by the server (or `float` for stats columns)
    pub type_tag: String,
    /// Coercion applied to cells of this column
    pub column_type: ColumnType,
    /// Free-text description
    pub description: String,
}

impl ColumnInfo {
    /// Create column metadata from a server-declared type tag.
    ///
    /// Stats columns are forced to `float` whatever the server reports.
    pub fn new(name: impl Into<String>, tag: &str, description: impl Into<String>) -> Self {
        let name = name.into();
        let tag = if is_stats_column(&name) {
            type_tag::FLOAT
        } else {
            tag
        };
        Self {
            column_type: ColumnType::from_tag(tag),
            type_tag: tag.to_string(),
            name,
            description: description.into(),
        }
    }
}

/// Name to type/description lookup for one query
#[derive(Debug, Clone, Default)]
pub struct ColumnMetadata {
    columns: IndexMap<String, ColumnInfo>,
}

impl ColumnMetadata {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column
    pub fn insert(&mut self, info: ColumnInfo) {
        self.columns.insert(info.name.clone(), info);
    }

    /// Look up a column
    pub fn get(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.get(name)
    }

    /// Coercion for a column; unknown columns are read as strings
    pub fn column_type(&self, name: &str) -> ColumnType {
        self.get(name).map(|c| c.column_type).unwrap_or_default()
    }

    /// Declared type tag, or `""` for unknown columns
    pub fn type_tag(&self, name: &str) -> &str {
        self.get(name).map(|c| c.type_tag.as_str()).unwrap_or("")
    }

    /// Description, or `""` for unknown columns
    pub fn description(&self, name: &str) -> &str {
        self.get(name).map(|c| c.description.as_str()).unwrap_or("")
    }

    /// Number of known columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no columns are known
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate in the order the server listed the columns
    pub fn iter(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.values()
    }
}

impl FromIterator<ColumnInfo> for ColumnMetadata {
    fn from_iter<I: IntoIterator<Item = ColumnInfo>>(iter: I) -> Self {
        let mut metadata = ColumnMetadata::new();
        for info in iter {
            metadata.insert(info);
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_from_tag() {
        assert_eq!(ColumnType::from_tag("int"), ColumnType::Int);
        assert_eq!(ColumnType::from_tag("float"), ColumnType::Float);
        assert_eq!(ColumnType::from_tag("list"), ColumnType::List);
        assert_eq!(ColumnType::from_tag("time"), ColumnType::String);
        assert_eq!(ColumnType::from_tag(""), ColumnType::String);
    }

    #[test]
    fn test_stats_columns_are_float() {
        let info = ColumnInfo::new("stats_state_sum", "int", "");
        assert_eq!(info.column_type, ColumnType::Float);
        assert_eq!(info.type_tag, "float");

        let info = ColumnInfo::new("state", "int", "The current state");
        assert_eq!(info.column_type, ColumnType::Int);
        assert_eq!(info.type_tag, "int");
    }

    #[test]
    fn test_lookup_of_unknown_column() {
        let metadata: ColumnMetadata =
            vec![ColumnInfo::new("name", "string", "Host name")].into_iter().collect();
        assert_eq!(metadata.description("name"), "Host name");
        assert_eq!(metadata.type_tag("name"), "string");
        assert_eq!(metadata.description("nope"), "");
        assert_eq!(metadata.type_tag("nope"), "");
        assert_eq!(metadata.column_type("nope"), ColumnType::String);
    }

    #[test]
    fn test_unknown_tag_is_kept_verbatim() {
        let info = ColumnInfo::new("last_check", "time", "");
        assert_eq!(info.type_tag, "time");
        assert_eq!(info.column_type, ColumnType::String);
    }
}
