//! Caller-side lifecycle around a [`Database`].
//!
//! A [`Session`] holds at most one open database. Opening another file
//! replaces it; a failed open leaves the current one in place.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::Database;
use crate::config::OpenOptions;
use crate::error::{Result, SqliteError};

/// Holds the currently open database, if any.
///
/// # Examples
///
/// ```no_run
/// use sqint_sqlite::Session;
///
/// let mut session = Session::default();
/// if !session.open("people.db") {
///     eprintln!("Not a database");
/// }
/// let db = session.database().unwrap();
/// println!("{} tables", db.tables().len());
/// ```
#[derive(Debug, Default)]
pub struct Session {
    options: OpenOptions,
    db: Option<Database>,
}

impl Session {
    /// Creates an empty session that opens files with `options`.
    pub fn new(options: OpenOptions) -> Self {
        Self { options, db: None }
    }

    /// Opens `path`, replacing any open database. Returns `false` on failure.
    pub fn open(&mut self, path: impl AsRef<Path>) -> bool {
        match self.try_open(path) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "open failed");
                false
            }
        }
    }

    /// Like [`open`](Self::open), but reports why opening failed.
    pub fn try_open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let db = Database::open_with(path, &self.options)?;
        if let Some(previous) = self.db.replace(db) {
            info!(name = previous.name(), "replaced open database");
        }
        Ok(())
    }

    /// Drops the open database, if any.
    pub fn close(&mut self) {
        if let Some(db) = self.db.take() {
            if let Err(err) = db.close() {
                warn!(%err, "error while closing database");
            }
        }
    }

    /// Re-reads the catalog of the open database.
    pub fn reload(&mut self) -> Result<()> {
        self.db.as_mut().ok_or(SqliteError::NotOpen)?.reload_schema()
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// The open database.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::NotOpen`] if nothing has been opened.
    pub fn database(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(SqliteError::NotOpen)
    }

    pub fn options(&self) -> &OpenOptions {
        &self.options
    }
}
