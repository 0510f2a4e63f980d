//! Connection options.
//!
//! The database path is the only required input; everything else has a
//! default. Options can be loaded from YAML.
//!
//! # Example YAML
//!
//! ```yaml
//! read_only: false
//! busy_timeout_ms: 2000
//! foreign_keys: true
//! ```

use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a database file is opened.
///
/// # Examples
///
/// ```
/// use sqint_sqlite::OpenOptions;
///
/// let options = OpenOptions::default();
/// assert!(!options.read_only);
/// assert_eq!(options.busy_timeout_ms, 5000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenOptions {
    /// Open without write access. Writes then fail with a database error.
    pub read_only: bool,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Enforce foreign key constraints on writes.
    pub foreign_keys: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            busy_timeout_ms: 5000,
            foreign_keys: true,
        }
    }
}

impl OpenOptions {
    /// Loads options from a YAML file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::SqliteError::Io) if the file cannot be read, or
    /// [`Config`](crate::SqliteError::Config) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let options = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(options)
    }

    /// Open flags. Never includes `CREATE`: a missing path is an open
    /// failure, not a new empty database.
    pub(crate) fn flags(&self) -> OpenFlags {
        let access = if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };
        access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }

    /// Applies per-connection settings after open.
    pub(crate) fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        let fk = if self.foreign_keys { "ON" } else { "OFF" };
        conn.execute_batch(&format!("PRAGMA foreign_keys = {fk};"))?;
        Ok(())
    }
}
