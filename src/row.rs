//! Typed cell values
//!
//! Cells travel as text. A [`Value`] is produced on demand by coercing that
//! text according to the column's [`ColumnType`].

use crate::column::ColumnType;
use crate::constants::separator;
use crate::error::{Error, Result};

/// A typed cell value.
///
/// # Example
///
/// ```rust
/// use livestatus_rs::Value;
///
/// fn describe(value: &Value) -> String {
///     match value {
///         Value::Integer(i) => format!("int {}", i),
///         Value::Float(f) => format!("float {}", f),
///         Value::List(items) => format!("{} items", items.len()),
///         Value::String(s) => s.clone(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `int` column
    Integer(i64),
    /// `float` column, and every stats column
    Float(f64),
    /// `list` column
    List(Vec<String>),
    /// Any other column
    String(String),
}

impl Value {
    /// Coerce raw cell text. Malformed numbers are an error.
    pub fn decode(column: &str, raw: &str, column_type: ColumnType) -> Result<Value> {
        match column_type {
            ColumnType::Int => raw
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| conversion(column, raw, "integer")),
            ColumnType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| conversion(column, raw, "float")),
            ColumnType::List => Ok(Value::List(
                raw.split(separator::LIST as char).map(str::to_string).collect(),
            )),
            ColumnType::String => Ok(Value::String(raw.to_string())),
        }
    }

    /// Try to get as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a float (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Type of column this value came from
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::List(_) => ColumnType::List,
            Value::String(_) => ColumnType::String,
        }
    }
}

fn conversion(column: &str, raw: &str, target: &'static str) -> Error {
    Error::Conversion {
        column: column.to_string(),
        value: raw.to_string(),
        target,
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::List(items) => {
                let sep = (separator::LIST as char).to_string();
                write!(f, "{}", items.join(sep.as_str()))
            }
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::List(v)
    }
}

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| conversion("<value>", &value.to_string(), "integer"))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| conversion("<value>", &value.to_string(), "float"))
    }
}

impl TryFrom<&Value> for String {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numbers() {
        assert_eq!(Value::decode("a", "1", ColumnType::Int).unwrap(), Value::Integer(1));
        assert_eq!(Value::decode("a", "-42", ColumnType::Int).unwrap(), Value::Integer(-42));
        assert_eq!(Value::decode("b", "2.5", ColumnType::Float).unwrap(), Value::Float(2.5));
        assert_eq!(Value::decode("b", "3", ColumnType::Float).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_decode_malformed_number_fails() {
        let err = Value::decode("state", "OK", ColumnType::Int).unwrap_err();
        assert!(matches!(err, Error::Conversion { ref column, target: "integer", .. } if column == "state"));
        assert!(Value::decode("x", "", ColumnType::Float).is_err());
    }

    #[test]
    fn test_decode_list() {
        assert_eq!(
            Value::decode("c", "x|y|z", ColumnType::List).unwrap(),
            Value::List(vec!["x".into(), "y".into(), "z".into()])
        );
        assert_eq!(
            Value::decode("c", "", ColumnType::List).unwrap(),
            Value::List(vec![String::new()])
        );
        assert_eq!(
            Value::decode("c", "a||", ColumnType::List).unwrap(),
            Value::List(vec!["a".into(), String::new(), String::new()])
        );
    }

    #[test]
    fn test_decode_string_is_verbatim() {
        assert_eq!(
            Value::decode("d", " spaced | text ", ColumnType::String).unwrap(),
            Value::String(" spaced | text ".into())
        );
    }

    #[test]
    fn test_conversions() {
        let value = Value::Integer(7);
        let i: i64 = (&value).try_into().unwrap();
        let f: f64 = (&value).try_into().unwrap();
        assert_eq!(i, 7);
        assert_eq!(f, 7.0);
        assert!(i64::try_from(&Value::from("seven")).is_err());
        assert_eq!(Value::from(vec!["a".to_string(), "b".to_string()]).to_string(), "a|b");
    }
}
