//! Data model shared between the engine layer and its callers.
//!
//! These types carry no connection state and can be built by hand in
//! tests. Values stay typed ([`Value`]) inside every container; callers
//! stringify with [`ResultSet::rendered`] when they draw.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::value::Value;

/// Column label used for inline query errors.
pub const ERROR_COLUMN: &str = "Error";

/// Column names plus a rectangular grid of typed cells.
///
/// # Examples
///
/// ```
/// use sqint_core::{ResultSet, Value};
///
/// let rs = ResultSet::new(
///     vec!["id".into(), "name".into()],
///     vec![vec![Value::Integer(1), Value::from("Ada")]],
/// );
/// assert_eq!(rs.rendered(), vec![vec!["1".to_string(), "Ada".to_string()]]);
///
/// let err = ResultSet::error("no such table: nope");
/// assert!(err.is_error());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultSet {
    /// Column labels, in result order.
    pub columns: Vec<String>,
    /// Rows, each as long as `columns`.
    pub rows: Vec<Vec<Value>>,
    /// Set only by [`ResultSet::error`].
    #[serde(rename = "error", skip_serializing_if = "std::ops::Not::not")]
    failed: bool,
}

impl ResultSet {
    /// Creates a result set from columns and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            failed: false,
        }
    }

    /// No columns and a single empty row.
    ///
    /// Returned for statements that produce no result columns and for
    /// internal reads that failed.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: vec![Vec::new()],
            failed: false,
        }
    }

    /// A one-column, one-row result whose only cell is `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            columns: vec![ERROR_COLUMN.to_string()],
            rows: vec![vec![Value::Text(message.into())]],
            failed: true,
        }
    }

    /// Whether this is an inline error produced by [`ResultSet::error`].
    ///
    /// A query result that happens to have a single `Error` column is not.
    pub fn is_error(&self) -> bool {
        self.failed
    }

    /// The error text when [`is_error`](Self::is_error) holds.
    pub fn error_message(&self) -> Option<&str> {
        if !self.failed {
            return None;
        }
        match self.rows.first().map(Vec::as_slice) {
            Some([Value::Text(msg)]) => Some(msg),
            _ => None,
        }
    }

    /// Position of `column` in the header.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value at `(row, column)` by column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Number of rows that hold at least one cell.
    pub fn row_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_empty()).count()
    }

    /// The grid as display strings.
    pub fn rendered(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::render).collect())
            .collect()
    }
}

/// One column of a table, as reported by `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    /// Ordinal position (0-based).
    pub cid: i64,
    /// Column name.
    pub name: String,
    /// Declared type, possibly empty.
    pub decl_type: String,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
    /// Default expression text, if any.
    pub default_value: Option<String>,
    /// 1-based position within the primary key, 0 if not part of it.
    pub pk: i64,
}

impl ColumnInfo {
    /// Whether the column belongs to the declared primary key.
    pub fn is_primary_key(&self) -> bool {
        self.pk > 0
    }
}

/// Kind of a catalog object that can be browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// An ordinary table.
    Table,
    /// A view. Views have no row identifier and are never editable.
    View,
}

impl ObjectKind {
    /// Whether rows of this object can be updated or inserted.
    pub fn is_editable(self) -> bool {
        matches!(self, ObjectKind::Table)
    }
}

/// Tables and views captured when a database was opened.
///
/// Not refreshed automatically when DDL runs through the query executor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaSnapshot {
    /// Display label, the file name of the database path.
    pub name: String,
    /// Ordinary tables.
    pub tables: BTreeSet<String>,
    /// Views.
    pub views: BTreeSet<String>,
}

impl SchemaSnapshot {
    /// Kind of `name`, or `None` if the snapshot does not know it.
    ///
    /// Names match case-insensitively (ASCII), as SQLite resolves them.
    pub fn kind_of(&self, name: &str) -> Option<ObjectKind> {
        if self.tables.contains(name) {
            return Some(ObjectKind::Table);
        }
        if self.views.contains(name) {
            return Some(ObjectKind::View);
        }
        let matches = |set: &BTreeSet<String>| set.iter().any(|n| n.eq_ignore_ascii_case(name));
        if matches(&self.tables) {
            Some(ObjectKind::Table)
        } else if matches(&self.views) {
            Some(ObjectKind::View)
        } else {
            None
        }
    }
}

/// An insertion-ordered mapping from column name to value.
///
/// Used both for insert requests (the columns a caller chose to supply)
/// and, as [`ConditionSet`], for the key that re-selects a displayed row.
/// Setting an existing column replaces its value in place.
///
/// # Examples
///
/// ```
/// use sqint_core::{ColumnValues, Value};
///
/// let values = ColumnValues::new().with("name", "Alan").with("age", 41);
/// assert_eq!(values.len(), 2);
/// assert_eq!(values.get("age"), Some(&Value::Integer(41)));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ColumnValues {
    entries: Vec<(String, Value)>,
}

/// The column→value mapping that re-selects one row for a write.
pub type ConditionSet = ColumnValues;

impl ColumnValues {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets `column` to `value`, keeping its original position if present.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Value for `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// `(column, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ColumnValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = ColumnValues::new();
        for (k, v) in iter {
            values.set(k, v);
        }
        values
    }
}

/// A single-cell edit, ready to be applied to the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellEdit {
    /// Table that holds the row.
    pub table: String,
    /// Column being changed.
    pub column: String,
    /// New value for the cell.
    pub value: Value,
    /// Key that re-selects the row.
    pub conditions: ConditionSet,
}
