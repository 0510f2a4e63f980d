//! Database handle and schema introspection.
//!
//! [`Database`] owns one connection to one file. It only exists after a
//! successful open, and it captures a [`SchemaSnapshot`] of the catalog at
//! that point. Per-table metadata ([`columns_of`](Database::columns_of),
//! [`primary_keys_of`](Database::primary_keys_of)) is read on demand.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use sqint_core::{ColumnInfo, Ident, ObjectKind, ResultSet, SchemaSnapshot, Value, rowid_alias};
use tracing::{debug, info, warn};

use crate::config::OpenOptions;
use crate::convert;
use crate::error::{Result, SqliteError};

/// Label used for databases without a backing file.
const MEMORY_NAME: &str = ":memory:";

/// How the rows of one table are addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowKey {
    /// Key columns as they appear in browsed data.
    pub(crate) keys: Vec<String>,
    /// The rowid alias selected ahead of the table's own columns, when the
    /// table has no declared primary key.
    pub(crate) implicit: Option<&'static str>,
}

/// An open SQLite database.
///
/// # Examples
///
/// ```no_run
/// use sqint_sqlite::Database;
///
/// let db = Database::open("people.db").unwrap();
/// for table in db.tables() {
///     println!("{table}: keyed by {:?}", db.primary_keys_of(table).unwrap());
/// }
/// ```
#[derive(Debug)]
pub struct Database {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
    schema: SchemaSnapshot,
}

impl Database {
    /// Opens an existing database file with default options.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::OpenFailed`] if the file does not exist, cannot
    /// be opened, or is not a SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &OpenOptions::default())
    }

    /// Opens an existing database file.
    ///
    /// The file is never created. Reading the catalog is part of opening,
    /// so a file that is not a database fails here rather than on first use.
    pub fn open_with(path: impl AsRef<Path>, options: &OpenOptions) -> Result<Self> {
        let path = path.as_ref();
        let fail = |source: rusqlite::Error| SqliteError::OpenFailed {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open_with_flags(path, options.flags()).map_err(fail)?;
        options.apply(&conn).map_err(fail)?;
        let schema = load_schema(&conn, display_name(path)).map_err(fail)?;

        info!(
            path = %path.display(),
            tables = schema.tables.len(),
            views = schema.views.len(),
            read_only = options.read_only,
            "opened database"
        );

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            schema,
        })
    }

    /// Adopts an already open connection and reads its catalog.
    pub fn from_connection(conn: Connection, name: impl Into<String>) -> Result<Self> {
        let schema = load_schema(&conn, name.into())?;
        Ok(Self {
            conn,
            path: None,
            schema,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, MEMORY_NAME)
    }

    /// Closes the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        info!(name = %self.schema.name, "closing database");
        self.conn.close().map_err(|(_, err)| SqliteError::Database(err))
    }

    /// Re-reads the table and view lists.
    pub fn reload_schema(&mut self) -> Result<()> {
        self.schema = load_schema(&self.conn, self.schema.name.clone())?;
        info!(
            tables = self.schema.tables.len(),
            views = self.schema.views.len(),
            "reloaded schema"
        );
        Ok(())
    }

    /// Display label: the file name of the path.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Backing file, `None` for adopted or in-memory connections.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The catalog snapshot taken at open (or last reload).
    pub fn schema(&self) -> &SchemaSnapshot {
        &self.schema
    }

    pub fn tables(&self) -> &BTreeSet<String> {
        &self.schema.tables
    }

    pub fn views(&self) -> &BTreeSet<String> {
        &self.schema.views
    }

    pub fn is_view(&self, name: &str) -> Result<bool> {
        Ok(self.kind_of(name)? == ObjectKind::View)
    }

    /// Whether `name` is a table or a view.
    ///
    /// Names match case-insensitively. Objects missing from the snapshot
    /// (created after open) are looked up in the live catalog; unknown
    /// names count as tables.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Database`] if the live catalog cannot be read.
    pub fn kind_of(&self, name: &str) -> Result<ObjectKind> {
        if let Some(kind) = self.schema.kind_of(name) {
            return Ok(kind);
        }
        let live: Option<String> = self
            .conn
            .query_row(
                "SELECT type FROM sqlite_schema \
                 WHERE name = ?1 COLLATE NOCASE AND type IN ('table', 'view')",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(match live.as_deref() {
            Some("view") => ObjectKind::View,
            _ => ObjectKind::Table,
        })
    }

    /// Whether `table` stores an implicit rowid.
    ///
    /// `false` only for `WITHOUT ROWID` tables. Views and unknown names
    /// report `true`.
    pub fn has_rowid(&self, table: &str) -> Result<bool> {
        let without: Option<bool> = self
            .conn
            .query_row(
                "SELECT wr FROM pragma_table_list WHERE name = ?1 COLLATE NOCASE",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(!without.unwrap_or(false))
    }

    /// Column metadata for `table`, ordered by position.
    ///
    /// An unknown table yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::Database`] if the catalog cannot be read.
    pub fn columns_of(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT cid, name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1) ORDER BY cid",
        )?;

        let columns = stmt
            .query_map(params![table], |row| {
                let default_value = match convert::from_value_ref(row.get_ref(4)?) {
                    Value::Null => None,
                    other => Some(other.render()),
                };
                Ok(ColumnInfo {
                    cid: row.get(0)?,
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: row.get::<_, i64>(3)? != 0,
                    default_value,
                    pk: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    /// Columns that identify a row of `table`, in key order.
    ///
    /// Falls back to a rowid alias for tables without a declared primary
    /// key: `rowid`, or `_rowid_` / `oid` when a column shadows it. Views
    /// have no row identity and yield an empty list, as does a table whose
    /// columns shadow every alias.
    pub fn primary_keys_of(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.row_key(table)?.keys)
    }

    pub(crate) fn row_key(&self, table: &str) -> Result<RowKey> {
        if self.is_view(table)? {
            return Ok(RowKey {
                keys: Vec::new(),
                implicit: None,
            });
        }

        let columns = self.columns_of(table)?;
        let mut keys: Vec<&ColumnInfo> = columns.iter().filter(|c| c.is_primary_key()).collect();
        keys.sort_by_key(|c| c.pk);
        if !keys.is_empty() {
            return Ok(RowKey {
                keys: keys.into_iter().map(|c| c.name.clone()).collect(),
                implicit: None,
            });
        }

        let implicit = rowid_alias(columns.iter().map(|c| c.name.as_str()));
        match implicit {
            Some(alias) => debug!(table, alias, "no declared primary key, using rowid"),
            None => warn!(table, "every rowid alias is shadowed, rows are not addressable"),
        }
        Ok(RowKey {
            keys: implicit.map(String::from).into_iter().collect(),
            implicit,
        })
    }

    /// `PRAGMA table_info` as a display grid.
    pub fn table_info(&self, table: &str) -> ResultSet {
        let sql = format!("PRAGMA table_info({})", Ident::new(table));
        self.read(&sql, &[])
    }
}

/// Reads the table and view names from the catalog.
fn load_schema(conn: &Connection, name: String) -> rusqlite::Result<SchemaSnapshot> {
    Ok(SchemaSnapshot {
        name,
        tables: names_of_type(conn, "table")?,
        views: names_of_type(conn, "view")?,
    })
}

fn names_of_type(conn: &Connection, kind: &str) -> rusqlite::Result<BTreeSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_schema WHERE type = ?1")?;
    let names: rusqlite::Result<BTreeSet<String>> = stmt
        .query_map(params![kind], |row| row.get::<_, String>(0))?
        .collect();
    names
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
