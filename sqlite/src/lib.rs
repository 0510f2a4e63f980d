//! SQLite data access for a terminal database browser.
//!
//! This crate opens a database file, introspects its catalog, runs queries
//! and performs point writes that target exactly the displayed row, using
//! the table's primary key or the implicit `rowid`.
//!
//! # Architecture
//!
//! The crate is organized into six modules:
//!
//! - **`catalog`**: [`Database`] handle, table/view snapshot, column and
//!   primary-key metadata
//! - **`query`**: statement execution, table contents, [`TableGrid`]
//!   browsing
//! - **`write`**: single-cell `UPDATE` and row `INSERT`
//! - **`session`**: [`Session`] open/close lifecycle
//! - **`config`**: [`OpenOptions`]
//! - **`convert`**: [`Value`] ↔ rusqlite value mapping
//!
//! # Quick start
//!
//! ```no_run
//! use sqint_sqlite::Database;
//! use sqint_core::ColumnValues;
//!
//! let db = Database::open("people.db").unwrap();
//!
//! let grid = db.browse("People").unwrap();
//! if let Some(edit) = grid.edit(0, "name", "Grace").unwrap() {
//!     db.apply(&edit).unwrap();
//! }
//!
//! db.insert_row("People", &ColumnValues::new().with("name", "Alan")).unwrap();
//! ```
//!
//! # Identifiers
//!
//! Table and column names reach SQL text only through
//! [`Ident`](sqint_core::Ident), which quotes them and doubles embedded
//! quotes. Values are always bound parameters.
//!
//! [`TableGrid`]: sqint_core::TableGrid
//! [`Value`]: sqint_core::Value

mod catalog;
mod config;
mod convert;
mod error;
mod query;
mod session;
mod write;

pub use catalog::Database;
pub use config::OpenOptions;
pub use error::{Result, SqliteError};
pub use session::Session;
