//! Conversion between [`Value`] and rusqlite's value types.

use rusqlite::types::{Value as SqlValue, ValueRef};
use sqint_core::Value;

/// Copies a borrowed cell out of a row.
pub(crate) fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Converts a value into a bindable parameter.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

/// Converts a sequence of values into bindable parameters, in order.
pub(crate) fn to_sql_params<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<SqlValue> {
    values.into_iter().map(to_sql).collect()
}
