//! SQL identifier escaping.
//!
//! SQLite binds literal values as parameters but table and column names
//! must appear in the statement text. [`Ident`] is the only path from a
//! name to SQL text: it quotes the name and doubles any embedded quote, so
//! a name can never leave the identifier position.

use std::fmt;

/// Name of SQLite's implicit row identifier.
pub const ROWID: &str = "rowid";

/// Names that address the implicit row identifier, in preference order.
///
/// A declared column with one of these names shadows that alias.
pub const ROWID_ALIASES: [&str; 3] = [ROWID, "_rowid_", "oid"];

/// A table or column name escaped for interpolation into SQL text.
///
/// Statement builders accept `&Ident`, never `&str`, so an unescaped name
/// cannot be formatted into generated SQL by accident.
///
/// # Examples
///
/// ```
/// use sqint_core::Ident;
///
/// let ident = Ident::new(r#"a"b"#);
/// assert_eq!(ident.as_sql(), r#""a""b""#);
/// assert_eq!(ident.name(), r#"a"b"#);
/// assert_eq!(format!("SELECT * FROM {ident}"), r#"SELECT * FROM "a""b""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    name: String,
    quoted: String,
}

impl Ident {
    /// Escapes `name` as a double-quoted identifier.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let quoted = escape_identifier(&name);
        Self { name, quoted }
    }

    /// The original, unescaped name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The quoted form, ready for SQL text.
    pub fn as_sql(&self) -> &str {
        &self.quoted
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted)
    }
}

/// Wraps `name` in double quotes, doubling embedded double quotes.
pub fn escape_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// First row identifier alias not shadowed by a column in `columns`.
///
/// SQLite compares names case-insensitively, so a column `ROWID` shadows
/// `rowid`. Returns `None` when every alias is taken.
pub fn rowid_alias<'a>(columns: impl IntoIterator<Item = &'a str>) -> Option<&'static str> {
    let columns: Vec<&str> = columns.into_iter().collect();
    ROWID_ALIASES
        .into_iter()
        .find(|alias| !columns.iter().any(|c| c.eq_ignore_ascii_case(alias)))
}

/// Joins identifiers with `", "` for column lists.
pub fn join_idents<'a>(idents: impl IntoIterator<Item = &'a Ident>) -> String {
    idents
        .into_iter()
        .map(Ident::as_sql)
        .collect::<Vec<_>>()
        .join(", ")
}
