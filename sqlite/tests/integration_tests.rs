//! Integration tests for the sqint-sqlite crate, on real database files.

use std::path::PathBuf;

use rusqlite::Connection;
use sqint_core::{ColumnValues, ConditionSet, ROWID, Value};
use sqint_sqlite::{Database, OpenOptions, Session, SqliteError};
use tempfile::TempDir;

/// Creates a database file in `dir` from a SQL script.
fn create_db(dir: &TempDir, file: &str, sql: &str) -> PathBuf {
    let path = dir.path().join(file);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(sql).unwrap();
    conn.close().unwrap();
    path
}

fn people_db(dir: &TempDir) -> PathBuf {
    create_db(
        dir,
        "people.db",
        r#"
        CREATE TABLE People (id INTEGER PRIMARY KEY, name TEXT);
        INSERT INTO People VALUES (1, 'Ada');
        "#,
    )
}

// ---------------------------------------------------------------------------
// Open / catalog
// ---------------------------------------------------------------------------

#[test]
fn open_reads_catalog_and_name() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "shop.sqlite",
        r#"
        CREATE TABLE items (sku TEXT PRIMARY KEY, price REAL);
        CREATE TABLE log (msg TEXT);
        CREATE VIEW cheap AS SELECT * FROM items WHERE price < 1;
        "#,
    );

    let db = Database::open(&path).unwrap();
    assert_eq!(db.name(), "shop.sqlite");
    assert_eq!(db.path(), Some(path.as_path()));
    assert!(db.tables().contains("items"));
    assert!(db.tables().contains("log"));
    assert!(db.views().contains("cheap"));
    assert!(!db.tables().contains("cheap"));
}

#[test]
fn open_missing_file_fails_without_creating_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.db");

    let err = Database::open(&path).unwrap_err();
    assert!(matches!(err, SqliteError::OpenFailed { .. }));
    assert!(!path.exists(), "open must not create the file");
}

#[test]
fn open_non_database_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "this is not a sqlite database\n".repeat(64)).unwrap();

    assert!(matches!(
        Database::open(&path),
        Err(SqliteError::OpenFailed { .. })
    ));

    let mut session = Session::default();
    assert!(!session.open(&path));
    assert!(!session.is_open());
}

#[test]
fn failed_open_keeps_previous_database() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);

    let mut session = Session::default();
    assert!(session.open(&path));
    assert!(!session.open(dir.path().join("missing.db")));
    assert_eq!(session.database().unwrap().name(), "people.db");

    session.close();
    assert!(matches!(session.database(), Err(SqliteError::NotOpen)));
}

#[test]
fn session_reload_sees_new_tables() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);
    let mut session = Session::default();
    assert!(session.open(&path));

    let db = session.database().unwrap();
    db.query("CREATE TABLE Pets (name TEXT)", &[]);
    assert!(!db.tables().contains("Pets"));

    session.reload().unwrap();
    assert!(session.database().unwrap().tables().contains("Pets"));
}

#[test]
fn read_only_rejects_writes() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);
    let options = OpenOptions {
        read_only: true,
        ..OpenOptions::default()
    };

    let db = Database::open_with(&path, &options).unwrap();
    let err = db
        .update_field("People", "name", "Grace", &ConditionSet::new().with("id", 1))
        .unwrap_err();
    assert!(matches!(err, SqliteError::Database(_)));
    assert_eq!(db.table_data("People").rendered(), vec![vec!["1", "Ada"]]);
}

#[test]
fn options_load_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sqint.yaml");
    std::fs::write(&path, "busy_timeout_ms: 250\nforeign_keys: false\n").unwrap();

    let options = OpenOptions::load(&path).unwrap();
    assert_eq!(options.busy_timeout_ms, 250);
    assert!(!options.foreign_keys);
    assert!(!options.read_only);
}

#[test]
fn options_reject_malformed_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "busy_timeout_ms: [not, a, number]\n").unwrap();

    assert!(matches!(
        OpenOptions::load(&path),
        Err(SqliteError::Config(_))
    ));
}

// ---------------------------------------------------------------------------
// The People scenario
// ---------------------------------------------------------------------------

#[test]
fn people_update_then_insert() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(people_db(&dir)).unwrap();

    let rs = db.table_data("People");
    assert_eq!(rs.columns, vec!["id", "name"]);
    assert_eq!(rs.rendered(), vec![vec!["1", "Ada"]]);

    let cond = ConditionSet::new().with("id", "1");
    db.update_field("People", "name", "Grace", &cond).unwrap();
    assert_eq!(db.table_data("People").rendered(), vec![vec!["1", "Grace"]]);

    let new_id = db
        .insert_row("People", &ColumnValues::new().with("name", "Alan"))
        .unwrap()
        .expect("People has a rowid");
    let rs = db.table_data("People");
    assert_eq!(rs.rows.len(), 2);
    assert_eq!(rs.rows[1][0], Value::Integer(new_id));
    assert_ne!(new_id, 1);
    assert_eq!(rs.rows[1][1], Value::from("Alan"));
}

#[test]
fn writes_are_durable_across_handles() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);

    let db = Database::open(&path).unwrap();
    db.update_field("People", "name", "Grace", &ConditionSet::new().with("id", 1))
        .unwrap();
    db.close().unwrap();

    let reopened = Database::open(&path).unwrap();
    assert_eq!(reopened.table_data("People").rendered(), vec![vec!["1", "Grace"]]);
}

// ---------------------------------------------------------------------------
// Row identity
// ---------------------------------------------------------------------------

#[test]
fn table_without_primary_key_uses_rowid() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "log.db",
        r#"
        CREATE TABLE log (msg TEXT);
        INSERT INTO log VALUES ('boot'), ('boot'), ('halt');
        "#,
    );
    let db = Database::open(&path).unwrap();

    assert_eq!(db.primary_keys_of("log").unwrap(), vec![ROWID]);
    let grid = db.browse("log").unwrap();
    assert_eq!(grid.data.columns, vec!["rowid", "msg"]);

    // Two identical rows: only the selected one changes.
    let edit = grid.edit(1, "msg", "reboot").unwrap().unwrap();
    assert_eq!(edit.conditions.get("rowid"), Some(&Value::Integer(2)));
    db.apply(&edit).unwrap();

    let rs = db.table_data("log");
    assert_eq!(
        rs.rendered(),
        vec![vec!["1", "boot"], vec!["2", "reboot"], vec!["3", "halt"]]
    );
}

#[test]
fn column_named_rowid_does_not_hide_row_identity() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "shadow.db",
        r#"
        CREATE TABLE r (rowid TEXT, v TEXT);
        INSERT INTO r VALUES ('dup', 'a'), ('dup', 'b');
        "#,
    );
    let db = Database::open(&path).unwrap();

    assert_eq!(db.primary_keys_of("r").unwrap(), vec!["_rowid_"]);
    let grid = db.browse("r").unwrap();
    assert_eq!(grid.data.columns, vec!["_rowid_", "rowid", "v"]);

    let edit = grid.edit(0, "v", "z").unwrap().unwrap();
    assert_eq!(edit.conditions.get("_rowid_"), Some(&Value::Integer(1)));
    assert_eq!(db.apply(&edit).unwrap(), 1);

    assert_eq!(
        db.table_data("r").rendered(),
        vec![vec!["1", "dup", "z"], vec!["2", "dup", "b"]]
    );
}

#[test]
fn view_name_in_other_case_is_still_a_view() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE VIEW names AS SELECT name FROM People;")
        .unwrap();
    drop(conn);

    let db = Database::open(&path).unwrap();
    assert!(db.primary_keys_of("NAMES").unwrap().is_empty());
    assert_eq!(db.table_data("NAMES").rendered(), vec![vec!["Ada"]]);
    assert!(matches!(
        db.update_field("Names", "name", "x", &ConditionSet::new().with("name", "Ada")),
        Err(SqliteError::NotEditable(_))
    ));
}

#[test]
fn insert_into_without_rowid_table_has_no_rowid() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "wr.db",
        r#"
        CREATE TABLE o (x);
        INSERT INTO o VALUES (1), (2), (3);
        CREATE TABLE w (k TEXT PRIMARY KEY, v) WITHOUT ROWID;
        "#,
    );
    let db = Database::open(&path).unwrap();

    let inserted = db.insert_row("w", &ColumnValues::new().with("k", "a")).unwrap();
    assert_eq!(inserted, None);
    assert_eq!(db.primary_keys_of("w").unwrap(), vec!["k"]);
}

#[test]
fn composite_key_requires_every_column() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "orders.db",
        r#"
        CREATE TABLE lines (order_id INTEGER, line INTEGER, qty INTEGER,
                            PRIMARY KEY (order_id, line));
        INSERT INTO lines VALUES (1, 1, 5), (1, 2, 6), (2, 1, 7);
        "#,
    );
    let db = Database::open(&path).unwrap();

    let grid = db.browse("lines").unwrap();
    assert_eq!(grid.keys, vec!["order_id", "line"]);
    let edit = grid.edit(1, "qty", 60).unwrap().unwrap();
    assert_eq!(edit.conditions.len(), 2);
    assert_eq!(db.apply(&edit).unwrap(), 1);

    let rs = db.query("SELECT qty FROM lines ORDER BY order_id, line", &[]);
    assert_eq!(rs.rendered(), vec![vec!["5"], vec!["60"], vec!["7"]]);
}

#[test]
fn stale_selection_reports_no_matching_row() {
    let dir = TempDir::new().unwrap();
    let path = people_db(&dir);
    let db = Database::open(&path).unwrap();
    let grid = db.browse("People").unwrap();

    // Another writer removes the row after it was displayed.
    let other = Connection::open(&path).unwrap();
    other.execute("DELETE FROM People WHERE id = 1", []).unwrap();
    drop(other);

    let edit = grid.edit(0, "name", "Grace").unwrap().unwrap();
    assert!(matches!(
        db.apply(&edit),
        Err(SqliteError::NoMatchingRow { .. })
    ));
}

#[test]
fn views_are_browsable_but_not_editable() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "v.db",
        r#"
        CREATE TABLE t (x INTEGER);
        INSERT INTO t VALUES (1), (2);
        CREATE VIEW big AS SELECT x FROM t WHERE x > 1;
        "#,
    );
    let db = Database::open(&path).unwrap();

    let grid = db.browse("big").unwrap();
    assert_eq!(grid.data.columns, vec!["x"]);
    assert_eq!(grid.data.rendered(), vec![vec!["2"]]);
    assert!(!grid.is_editable());
    assert_eq!(grid.edit(0, "x", 3).unwrap(), None);
    assert!(db.primary_keys_of("big").unwrap().is_empty());
}

#[test]
fn blob_and_real_keys_bind_with_their_type() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "typed.db",
        r#"
        CREATE TABLE blobs (k BLOB PRIMARY KEY, v TEXT);
        INSERT INTO blobs VALUES (x'0001', 'a'), (x'0002', 'b');
        CREATE TABLE reals (k REAL PRIMARY KEY, v TEXT);
        INSERT INTO reals VALUES (0.5, 'half'), (1.0, 'one');
        "#,
    );
    let db = Database::open(&path).unwrap();

    let grid = db.browse("blobs").unwrap();
    assert_eq!(grid.data.rendered()[1], vec!["x'0002'", "b"]);
    db.apply(&grid.edit(1, "v", "bee").unwrap().unwrap()).unwrap();

    let grid = db.browse("reals").unwrap();
    db.apply(&grid.edit(1, "v", "uno").unwrap().unwrap()).unwrap();

    let rs = db.query(
        "SELECT (SELECT v FROM blobs WHERE k = x'0002'), (SELECT v FROM reals WHERE k = 1.0)",
        &[],
    );
    assert_eq!(rs.rendered(), vec![vec!["bee", "uno"]]);
}

// ---------------------------------------------------------------------------
// Identifiers and injection
// ---------------------------------------------------------------------------

#[test]
fn quoted_identifiers_address_exact_objects() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "quotes.db",
        r#"
        CREATE TABLE "a""b" ("a""b" TEXT, "x y" INTEGER);
        INSERT INTO "a""b" VALUES ('one', 1);
        CREATE TABLE "a" (b TEXT);
        "#,
    );
    let db = Database::open(&path).unwrap();
    let table = r#"a"b"#;

    assert!(db.tables().contains(table));
    let grid = db.browse(table).unwrap();
    assert_eq!(grid.data.columns, vec!["rowid", r#"a"b"#, "x y"]);

    let edit = grid.edit(0, r#"a"b"#, "uno").unwrap().unwrap();
    db.apply(&edit).unwrap();
    db.insert_row(table, &ColumnValues::new().with("x y", 2).with(r#"a"b"#, "dos"))
        .unwrap();

    let rs = db.table_data(table);
    assert_eq!(rs.rendered(), vec![vec!["1", "uno", "1"], vec!["2", "dos", "2"]]);
    // The table named `a` is untouched.
    assert_eq!(db.table_data("a").rows.len(), 0);
}

#[test]
fn hostile_names_and_values_stay_inert() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(people_db(&dir)).unwrap();

    let hostile = r#"People" SET name = 'pwned'; --"#;
    assert!(db
        .update_field(hostile, "name", "x", &ConditionSet::new().with("id", 1))
        .is_err());

    db.update_field(
        "People",
        "name",
        "'); DROP TABLE People; --",
        &ConditionSet::new().with("id", 1),
    )
    .unwrap();

    let rs = db.table_data("People");
    assert_eq!(rs.rendered(), vec![vec!["1", "'); DROP TABLE People; --"]]);
}

// ---------------------------------------------------------------------------
// Inserts and defaults
// ---------------------------------------------------------------------------

#[test]
fn insert_leaves_defaulted_column_at_default() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "defaults.db",
        "CREATE TABLE d (colA INTEGER, colB TEXT DEFAULT 'fallback');",
    );
    let db = Database::open(&path).unwrap();

    db.insert_row("d", &ColumnValues::new().with("colA", "5"))
        .unwrap();
    let rs = db.query("SELECT colA, colB, typeof(colA) FROM d", &[]);
    assert_eq!(rs.rows[0][0], Value::Integer(5));
    assert_eq!(rs.rows[0][1], Value::from("fallback"));
    assert_eq!(rs.rows[0][2], Value::from("integer"));
}

#[test]
fn insert_not_null_violation_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = create_db(&dir, "nn.db", "CREATE TABLE nn (a TEXT NOT NULL, b TEXT);");
    let db = Database::open(&path).unwrap();

    let err = db
        .insert_row("nn", &ColumnValues::new().with("b", "only b"))
        .unwrap_err();
    assert!(matches!(err, SqliteError::Database(_)));
    assert_eq!(db.table_data("nn").rows.len(), 0);
}

#[test]
fn foreign_keys_are_enforced_by_default() {
    let dir = TempDir::new().unwrap();
    let path = create_db(
        &dir,
        "fk.db",
        r#"
        CREATE TABLE owner (id INTEGER PRIMARY KEY);
        CREATE TABLE pet (id INTEGER PRIMARY KEY, owner_id INTEGER REFERENCES owner(id));
        "#,
    );
    let db = Database::open(&path).unwrap();
    assert!(db
        .insert_row("pet", &ColumnValues::new().with("owner_id", 9))
        .is_err());
}

// ---------------------------------------------------------------------------
// Ad-hoc queries
// ---------------------------------------------------------------------------

#[test]
fn invalid_query_is_rendered_inline() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(people_db(&dir)).unwrap();

    let rs = db.query("SELEC * FROM People", &[]);
    assert_eq!(rs.columns, vec!["Error"]);
    assert_eq!(rs.rows.len(), 1);
    let message = rs.error_message().unwrap();
    assert!(message.contains("syntax error"), "unexpected message: {message}");
}

#[test]
fn query_with_bound_arguments() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(people_db(&dir)).unwrap();

    let rs = db.query("SELECT name FROM People WHERE id = ?1", &[Value::from("1")]);
    assert_eq!(rs.rendered(), vec![vec!["Ada"]]);
}

#[test]
fn table_info_is_a_display_grid() {
    let dir = TempDir::new().unwrap();
    let db = Database::open(people_db(&dir)).unwrap();

    let info = db.table_info("People");
    assert_eq!(info.columns[1], "name");
    assert_eq!(info.rendered()[1][1], "name");
    assert_eq!(info.rendered()[0][5], "1");
}
