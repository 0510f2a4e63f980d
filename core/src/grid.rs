//! A browsed table together with the metadata needed to edit it.

use serde::Serialize;

use crate::locate::{LocateError, locate_in};
use crate::types::{CellEdit, ConditionSet, ObjectKind, ResultSet};
use crate::value::Value;

/// Contents of one table or view plus its row-identifying columns.
///
/// The key columns and the displayed rows come from the same read, so a
/// condition set built from a row matches what was shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrid {
    /// Table or view name.
    pub table: String,
    /// Whether this is a table or a view.
    pub kind: ObjectKind,
    /// Columns that identify a row: the primary key, or the first rowid
    /// alias no column shadows. Empty for views and for tables where every
    /// alias is shadowed.
    pub keys: Vec<String>,
    /// Displayed data.
    pub data: ResultSet,
}

impl TableGrid {
    /// Whether rows of this grid can be edited.
    pub fn is_editable(&self) -> bool {
        self.kind.is_editable() && !self.keys.is_empty()
    }

    /// Condition set for row `index`.
    ///
    /// Returns `Ok(None)` when the grid has no row identity.
    pub fn conditions_for(&self, index: usize) -> Result<Option<ConditionSet>, LocateError> {
        if !self.is_editable() {
            return Ok(None);
        }
        locate_in(&self.data, index, &self.keys).map(Some)
    }

    /// Translates a grid selection into an edit request.
    ///
    /// Returns `Ok(None)` when the grid is not editable.
    pub fn edit(
        &self,
        row: usize,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<Option<CellEdit>, LocateError> {
        if self.data.column_index(column).is_none() {
            return Err(LocateError::UnknownColumn(column.to_string()));
        }
        let Some(conditions) = self.conditions_for(row)? else {
            return Ok(None);
        };
        Ok(Some(CellEdit {
            table: self.table.clone(),
            column: column.to_string(),
            value: value.into(),
            conditions,
        }))
    }
}
