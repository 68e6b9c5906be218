//! Integration tests for the typed row cursor
//!
//! These build result sets directly and need no server.

use std::sync::Arc;

use livestatus_rs::{ColumnInfo, ColumnMetadata, Error, QueryResult, ResultSet, RowCursor, Value};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn metadata(columns: &[(&str, &str)]) -> ColumnMetadata {
    columns
        .iter()
        .map(|(name, tag)| ColumnInfo::new(*name, tag, ""))
        .collect()
}

#[test]
fn test_int_and_float_round_trip() {
    let set = ResultSet::new(row(&["a", "b"]), vec![row(&["1", "2.5"]), row(&["3", "4.5"])]);
    let mut cursor = RowCursor::new(Arc::new(set), Arc::new(metadata(&[("a", "int"), ("b", "float")])));

    assert_eq!(cursor.value_at(0, "a").unwrap(), Value::Integer(1));
    assert_eq!(cursor.value_at(0, "b").unwrap(), Value::Float(2.5));

    assert!(cursor.advance());
    assert!(cursor.advance());
    assert!(!cursor.advance());
}

#[test]
fn test_list_cells() {
    let set = ResultSet::new(row(&["members"]), vec![row(&["x|y|z"]), row(&[""])]);
    let mut cursor = RowCursor::new(Arc::new(set), Arc::new(metadata(&[("members", "list")])));

    assert!(cursor.advance());
    assert_eq!(
        cursor.value("members").unwrap(),
        Value::List(vec!["x".into(), "y".into(), "z".into()])
    );
    assert!(cursor.advance());
    assert_eq!(cursor.value("members").unwrap(), Value::List(vec![String::new()]));
}

#[test]
fn test_untyped_columns_are_strings() {
    let set = ResultSet::new(row(&["name", "last_check"]), vec![row(&["web01", "1700000000"])]);
    let cursor = RowCursor::new(Arc::new(set), Arc::new(metadata(&[("last_check", "time")])));

    assert_eq!(cursor.value_at(0, "name").unwrap(), Value::String("web01".into()));
    assert_eq!(cursor.value_at(0, "last_check").unwrap(), Value::String("1700000000".into()));
    assert_eq!(cursor.field_type("last_check"), "time");
    assert_eq!(cursor.field_type("name"), "");
}

#[test]
fn test_bad_number_propagates() {
    let set = ResultSet::new(row(&["state"]), vec![row(&["UP"])]);
    let cursor = RowCursor::new(Arc::new(set), Arc::new(metadata(&[("state", "int")])));

    let err = cursor.value_at(0, "state").unwrap_err();
    assert!(matches!(err, Error::Conversion { target: "integer", .. }));
}

#[test]
fn test_unknown_field_is_lazy() {
    let set = ResultSet::new(row(&["a"]), vec![row(&["1"])]);
    let mut cursor = RowCursor::new(Arc::new(set), Arc::new(ColumnMetadata::new()));

    assert_eq!(cursor.field_description("b"), "");
    assert!(cursor.advance());
    assert!(matches!(cursor.value("b"), Err(Error::UnknownField(name)) if name == "b"));
}

#[test]
fn test_rewind_yields_identical_pass() {
    let set = ResultSet::new(
        row(&["name", "state"]),
        vec![row(&["a", "0"]), row(&["b", "1"]), row(&["c", "2"])],
    );
    let result = QueryResult::new(set, metadata(&[("state", "int")]));
    let mut cursor = result.into_cursor();

    let collect = |cursor: &mut RowCursor| {
        let mut seen = Vec::new();
        while cursor.advance() {
            seen.push((cursor.value("name").unwrap(), cursor.value("state").unwrap()));
        }
        seen
    };

    let first = collect(&mut cursor);
    cursor.rewind();
    let second = collect(&mut cursor);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[test]
fn test_shared_data_separate_positions() {
    let set = Arc::new(ResultSet::new(row(&["a"]), vec![row(&["1"]), row(&["2"])]));
    let meta = Arc::new(metadata(&[("a", "int")]));

    let mut first = RowCursor::new(Arc::clone(&set), Arc::clone(&meta));
    let mut second = RowCursor::new(set, meta);

    assert!(first.advance());
    assert!(first.advance());
    assert!(second.advance());
    assert_eq!(first.value("a").unwrap(), Value::Integer(2));
    assert_eq!(second.value("a").unwrap(), Value::Integer(1));
}
