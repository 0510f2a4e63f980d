//! Query execution.
//!
//! Three entry points share one runner:
//!
//! - [`Database::execute`] propagates engine errors.
//! - [`Database::query`] is the ad-hoc path for user-entered SQL. Engine
//!   errors come back inline as a one-cell `Error` result.
//! - `Database::read` is for the layer's own trusted statements. A failure
//!   there means the connection is unusable and is reported as no data.
//!
//! Literal values are always bound parameters.
//!
//! # Example
//!
//! ```no_run
//! use sqint_sqlite::Database;
//! use sqint_core::Value;
//!
//! let db = Database::open("people.db").unwrap();
//!
//! let rs = db.query("SELECT name FROM People WHERE id = ?1", &[Value::Integer(1)]);
//! if let Some(err) = rs.error_message() {
//!     eprintln!("query failed: {err}");
//! }
//!
//! let grid = db.browse("People").unwrap();
//! println!("{} rows keyed by {:?}", grid.data.row_count(), grid.keys);
//! ```

use rusqlite::params_from_iter;
use sqint_core::{Ident, ResultSet, TableGrid, Value};
use tracing::{debug, warn};

use crate::catalog::Database;
use crate::convert;
use crate::error::Result;

impl Database {
    /// Runs `sql` with `args` bound in order.
    ///
    /// A statement without result columns is executed for its effect and
    /// yields [`ResultSet::empty`].
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Database`](crate::SqliteError::Database) for
    /// any engine error.
    pub fn execute(&self, sql: &str, args: &[Value]) -> Result<ResultSet> {
        Ok(self.run(sql, args)?)
    }

    /// Runs user-entered SQL. Never fails.
    ///
    /// Engine errors are returned as [`ResultSet::error`] carrying SQLite's
    /// message, so callers can show them in the result grid.
    pub fn query(&self, sql: &str, args: &[Value]) -> ResultSet {
        match self.run(sql, args) {
            Ok(result) => result,
            Err(err) => {
                debug!(%err, "ad-hoc query failed");
                ResultSet::error(err.to_string())
            }
        }
    }

    /// Runs a trusted internal statement. Failures become an empty result.
    pub(crate) fn read(&self, sql: &str, args: &[Value]) -> ResultSet {
        match self.run(sql, args) {
            Ok(result) => result,
            Err(err) => {
                warn!(%err, sql, "internal read failed");
                ResultSet::empty()
            }
        }
    }

    /// Contents of `table`.
    ///
    /// Ordinary tables without a declared primary key get a rowid alias as
    /// their first column so rows stay addressable. Views never do.
    /// Failures yield an empty result.
    pub fn table_data(&self, table: &str) -> ResultSet {
        match self.browse(table) {
            Ok(grid) => grid.data,
            Err(err) => {
                warn!(%err, table, "failed to read table data");
                ResultSet::empty()
            }
        }
    }

    /// Contents of `table` with the columns that identify each row.
    ///
    /// The key columns and the data are read together, so condition sets
    /// built from [`TableGrid::conditions_for`] match the displayed values.
    pub fn browse(&self, table: &str) -> Result<TableGrid> {
        let kind = self.kind_of(table)?;
        let key = self.row_key(table)?;
        let rowid = key.implicit.map(Ident::new);
        let sql = select_all_sql(&Ident::new(table), rowid.as_ref());
        let data = self.execute(&sql, &[])?;
        Ok(TableGrid {
            table: table.to_string(),
            kind,
            keys: key.keys,
            data,
        })
    }

    fn run(&self, sql: &str, args: &[Value]) -> rusqlite::Result<ResultSet> {
        debug!(sql, args = args.len(), "executing");
        let mut stmt = self.conn.prepare(sql)?;
        let params = convert::to_sql_params(args);

        if stmt.column_count() == 0 {
            let changed = stmt.execute(params_from_iter(params.iter()))?;
            debug!(changed, "statement returned no columns");
            return Ok(ResultSet::empty());
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut grid = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(convert::from_value_ref(row.get_ref(i)?));
            }
            grid.push(cells);
        }

        Ok(ResultSet::new(columns, grid))
    }
}

/// `SELECT * FROM t`, prefixed with the rowid alias when one is given.
///
/// The alias is repeated as the column label because SQLite names every
/// rowid alias `rowid` in result headers.
pub(crate) fn select_all_sql(table: &Ident, rowid: Option<&Ident>) -> String {
    match rowid {
        Some(alias) => format!("SELECT {alias} AS {alias}, * FROM {table}"),
        None => format!("SELECT * FROM {table}"),
    }
}
