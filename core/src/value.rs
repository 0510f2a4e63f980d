//! Typed cell values.
//!
//! Cells keep their storage class from the engine all the way to the
//! display boundary. [`Value::render`] produces the uniform plain-text form
//! used by grids; everything else (write conditions in particular) works on
//! the typed value so integer and blob keys bind with their original type.

use std::fmt;

use serde::{Serialize, Serializer};

/// A single cell value, mirroring SQLite's five storage classes.
///
/// # Examples
///
/// ```
/// use sqint_core::Value;
///
/// assert_eq!(Value::Integer(42).render(), "42");
/// assert_eq!(Value::Real(1.0).render(), "1.0");
/// assert_eq!(Value::Null.render(), "NULL");
/// assert_eq!(Value::Blob(vec![0xde, 0xad]).render(), "x'dead'");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// IEEE double.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Renders the value as display text.
    ///
    /// Reals always carry a fractional part or exponent so they never read
    /// as integers. Blobs render as a SQL hex literal.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => format!("{f:?}"),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => {
                let mut out = String::with_capacity(b.len() * 2 + 3);
                out.push_str("x'");
                for byte in b {
                    out.push_str(&format!("{byte:02x}"));
                }
                out.push('\'');
                out
            }
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the storage class, as SQLite's `typeof()` reports it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Blob(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// JSON has no blob type, so blobs serialize as their rendered hex literal.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(_) => serializer.serialize_str(&self.render()),
        }
    }
}
