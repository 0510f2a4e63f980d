//! Point writes: single-cell update and row insert.
//!
//! Each call is one autocommitted statement. Names are interpolated only
//! through [`Ident`]; values are always bound. Nothing is retried.

use rusqlite::params_from_iter;
use sqint_core::{CellEdit, ColumnValues, ConditionSet, Ident, Value, join_idents};
use tracing::{debug, warn};

use crate::catalog::Database;
use crate::convert;
use crate::error::{Result, SqliteError};

impl Database {
    /// Sets `column` to `value` in the row matched by `conditions`.
    ///
    /// `value` is bound first, then each condition value in mapping order.
    /// An empty condition set produces an `UPDATE` without `WHERE`, which
    /// changes every row; browsed tables carry a key or a rowid alias, so a
    /// well-behaved caller never sends one.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// - [`SqliteError::NotEditable`] if `table` is a view.
    /// - [`SqliteError::NoMatchingRow`] if a non-empty condition set matched
    ///   nothing (the row was changed or removed since it was displayed).
    /// - [`SqliteError::Database`] for constraint, type or lock errors.
    pub fn update_field(
        &self,
        table: &str,
        column: &str,
        value: impl Into<Value>,
        conditions: &ConditionSet,
    ) -> Result<usize> {
        self.ensure_editable(table)?;

        let keys: Vec<Ident> = conditions.columns().map(Ident::new).collect();
        let sql = update_sql(&Ident::new(table), &Ident::new(column), &keys);

        let value = value.into();
        let mut args = Vec::with_capacity(conditions.len() + 1);
        args.push(convert::to_sql(&value));
        args.extend(conditions.values().map(convert::to_sql));

        if conditions.is_empty() {
            warn!(table, column, "update without conditions changes every row");
        }
        debug!(%sql, "updating field");

        let changed = self.conn.execute(&sql, params_from_iter(args.iter()))?;
        if changed == 0 && !conditions.is_empty() {
            return Err(SqliteError::NoMatchingRow {
                table: table.to_string(),
            });
        }
        Ok(changed)
    }

    /// Applies an edit built from a [`TableGrid`](sqint_core::TableGrid).
    pub fn apply(&self, edit: &CellEdit) -> Result<usize> {
        self.update_field(
            &edit.table,
            &edit.column,
            edit.value.clone(),
            &edit.conditions,
        )
    }

    /// Inserts a row from the supplied columns only.
    ///
    /// Columns not present in `values` are left out of the statement and
    /// take their schema default. An empty mapping inserts `DEFAULT VALUES`.
    ///
    /// Returns the rowid of the new row, or `None` for a `WITHOUT ROWID`
    /// table.
    ///
    /// # Errors
    ///
    /// - [`SqliteError::NotEditable`] if `table` is a view.
    /// - [`SqliteError::Database`] for constraint, type or lock errors.
    pub fn insert_row(&self, table: &str, values: &ColumnValues) -> Result<Option<i64>> {
        self.ensure_editable(table)?;
        let has_rowid = self.has_rowid(table)?;

        let columns: Vec<Ident> = values.columns().map(Ident::new).collect();
        let sql = insert_sql(&Ident::new(table), &columns);
        let args = convert::to_sql_params(values.values());

        debug!(%sql, "inserting row");
        self.conn.execute(&sql, params_from_iter(args.iter()))?;
        Ok(has_rowid.then(|| self.conn.last_insert_rowid()))
    }

    fn ensure_editable(&self, table: &str) -> Result<()> {
        if self.is_view(table)? {
            return Err(SqliteError::NotEditable(table.to_string()));
        }
        Ok(())
    }
}

/// `UPDATE t SET c = ? [WHERE k1 = ? AND k2 = ? ...]`
pub(crate) fn update_sql(table: &Ident, column: &Ident, keys: &[Ident]) -> String {
    let mut sql = format!("UPDATE {table} SET {column} = ?");
    if !keys.is_empty() {
        let clauses: Vec<String> = keys.iter().map(|k| format!("{k} = ?")).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql
}

/// `INSERT INTO t (c1, c2, ...) VALUES (?, ?, ...)`, or `DEFAULT VALUES`
/// when no columns are given.
pub(crate) fn insert_sql(table: &Ident, columns: &[Ident]) -> String {
    if columns.is_empty() {
        return format!("INSERT INTO {table} DEFAULT VALUES");
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        join_idents(columns)
    )
}
