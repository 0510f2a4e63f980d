//! Row locator.
//!
//! Turns a displayed row back into the condition set that re-selects it.
//! The values come from the same grid the caller rendered, so what the
//! user saw is exactly what the write will match on.

use thiserror::Error;

use crate::types::{ConditionSet, ResultSet};
use crate::value::Value;

/// Failure to derive a condition set from a grid row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// A key column is not part of the displayed columns.
    #[error("key column '{0}' is not present in the result columns")]
    MissingKeyColumn(String),

    /// The row has fewer cells than the header.
    #[error("row has {len} cells but column '{column}' is at position {index}")]
    RowTooShort {
        column: String,
        index: usize,
        len: usize,
    },

    /// The row index is outside the grid.
    #[error("row {index} is out of range ({rows} rows)")]
    RowOutOfRange { index: usize, rows: usize },

    /// The column is not part of the displayed columns.
    #[error("column '{0}' is not present in the result columns")]
    UnknownColumn(String),
}

/// Builds the condition set for `row` from its key columns.
///
/// Every key column is required. Values keep their type.
///
/// # Examples
///
/// ```
/// use sqint_core::{locate, Value};
///
/// let columns = vec!["id".to_string(), "name".to_string()];
/// let row = vec![Value::Integer(1), Value::from("Ada")];
/// let cond = locate(&columns, &row, &["id".to_string()]).unwrap();
/// assert_eq!(cond.get("id"), Some(&Value::Integer(1)));
/// assert_eq!(cond.len(), 1);
/// ```
pub fn locate(
    columns: &[String],
    row: &[Value],
    keys: &[String],
) -> Result<ConditionSet, LocateError> {
    let mut conditions = ConditionSet::new();
    for key in keys {
        let index = columns
            .iter()
            .position(|c| c == key)
            .ok_or_else(|| LocateError::MissingKeyColumn(key.clone()))?;
        let value = row.get(index).ok_or_else(|| LocateError::RowTooShort {
            column: key.clone(),
            index,
            len: row.len(),
        })?;
        conditions.set(key.clone(), value.clone());
    }
    Ok(conditions)
}

/// [`locate`] against row `index` of a result set.
pub fn locate_in(
    result: &ResultSet,
    index: usize,
    keys: &[String],
) -> Result<ConditionSet, LocateError> {
    let row = result.rows.get(index).ok_or(LocateError::RowOutOfRange {
        index,
        rows: result.rows.len(),
    })?;
    locate(&result.columns, row, keys)
}
