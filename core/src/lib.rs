//! Engine-independent types for browsing and editing a relational
//! database.
//!
//! This crate holds everything that does not need a connection:
//!
//! - [`Value`]: a typed cell, rendered to text only at the display
//!   boundary.
//! - [`ResultSet`]: column names plus a rectangular grid of values.
//! - [`SchemaSnapshot`], [`ColumnInfo`], [`ObjectKind`]: catalog metadata.
//! - [`Ident`]: an escaped identifier, the only way a name reaches SQL
//!   text.
//! - [`locate`] and [`TableGrid`]: the row locator that turns a displayed
//!   row into a [`ConditionSet`] for a write.
//!
//! # Example
//!
//! ```
//! use sqint_core::*;
//!
//! let grid = TableGrid {
//!     table: "People".into(),
//!     kind: ObjectKind::Table,
//!     keys: vec!["id".into()],
//!     data: ResultSet::new(
//!         vec!["id".into(), "name".into()],
//!         vec![vec![Value::Integer(1), Value::from("Ada")]],
//!     ),
//! };
//!
//! let edit = grid.edit(0, "name", "Grace").unwrap().unwrap();
//! assert_eq!(edit.conditions.get("id"), Some(&Value::Integer(1)));
//! assert_eq!(Ident::new(&edit.table).as_sql(), "\"People\"");
//! ```

mod grid;
mod ident;
mod locate;
mod types;
mod value;

pub use grid::TableGrid;
pub use ident::{Ident, ROWID, ROWID_ALIASES, escape_identifier, join_idents, rowid_alias};
pub use locate::{LocateError, locate, locate_in};
pub use types::*;
pub use value::Value;
