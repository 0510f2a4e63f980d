//! Error types for database access.
//!
//! Provides a unified error type covering open failures, engine errors,
//! write outcomes and configuration loading.

use std::path::PathBuf;

use sqint_core::LocateError;
use thiserror::Error;

/// Errors that can occur while opening, reading or writing a database.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The file is missing, unreadable, or not a SQLite database.
    #[error("cannot open database '{}': {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// An operation was requested before a database was opened.
    #[error("no database is open")]
    NotOpen,

    /// SQLite rejected a statement (syntax, constraint, type, lock).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A write's condition set matched no row.
    #[error("no row in '{table}' matches the selected key")]
    NoMatchingRow { table: String },

    /// The object has no row identity and cannot be written to.
    #[error("'{0}' is a view and cannot be edited")]
    NotEditable(String),

    /// A grid selection could not be turned into a condition set.
    #[error("cannot locate row: {0}")]
    Locate(#[from] LocateError),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
