#![forbid(unsafe_code)]

use de_core::{Mode, RecordKind, Step};
use de_storage::{RecordStore, SqliteStore, StoreError};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(dir.path().join("database.db")).expect("open store");
    (dir, store)
}

#[test]
fn schema_is_created_once() {
    let (_dir, store) = open_store();
    assert!(!store.create_schema_if_absent().expect("second schema check"));

    let reopened = SqliteStore::open(store.db_path()).expect("reopen store");
    assert!(!reopened.create_schema_if_absent().expect("schema check"));
}

#[test]
fn partial_schema_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("partial.db");
    let conn = rusqlite::Connection::open(&path).expect("open raw connection");
    conn.execute_batch("CREATE TABLE Modes (ID INTEGER PRIMARY KEY);")
        .expect("create partial schema");
    drop(conn);

    let err = SqliteStore::open(&path).expect_err("partial schema must fail");
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn empty_tables_have_no_max_identifier() {
    let (_dir, store) = open_store();
    assert_eq!(store.max_identifier::<Mode>().expect("max mode id"), None);
    assert_eq!(store.max_identifier::<Step>().expect("max step id"), None);
    assert!(store.load_all::<Mode>().expect("load modes").is_empty());
}

#[test]
fn insert_update_delete_round_trip() {
    let (_dir, store) = open_store();

    store.insert(&Mode::new(3, "Rinse", 10, 2)).expect("insert mode");
    store.insert(&Mode::new(8, "Fill", 4, 1)).expect("insert mode");
    assert_eq!(store.max_identifier::<Mode>().expect("max id"), Some(8));

    let mut step = Step::new(1, 3, 30, "rack", 5, "fill", 250);
    store.insert(&step).expect("insert step");

    step.volume = 125;
    step.destination = "waste".to_string();
    store.update(&step).expect("update step");

    let steps = store.load_all::<Step>().expect("load steps");
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].volume, 125);
    assert_eq!(steps[0].destination, "waste");
    assert_eq!(steps[0].mode_id, 3);

    store.delete::<Step>(1).expect("delete step");
    assert!(store.load_all::<Step>().expect("load steps").is_empty());

    let modes = store.load_all::<Mode>().expect("load modes");
    assert_eq!(
        modes,
        vec![Mode::new(3, "Rinse", 10, 2), Mode::new(8, "Fill", 4, 1)]
    );
}

#[test]
fn missing_rows_are_unknown_ids() {
    let (_dir, store) = open_store();

    let err = store
        .update(&Mode::new(42, "ghost", 0, 0))
        .expect_err("update of a missing row");
    assert!(matches!(
        err,
        StoreError::UnknownId {
            kind: RecordKind::Mode,
            id: 42
        }
    ));

    let err = store.delete::<Step>(7).expect_err("delete of a missing row");
    assert!(matches!(err, StoreError::UnknownId { id: 7, .. }));
}

#[test]
fn foreign_key_violations_surface_as_constraint_errors() {
    let (_dir, store) = open_store();

    let err = store
        .insert(&Step::blank(1, 99))
        .expect_err("step without mode");
    assert!(matches!(err, StoreError::Constraint(_)));

    store.insert(&Mode::blank(1)).expect("insert mode");
    store.insert(&Step::blank(1, 1)).expect("insert step");
    let err = store.delete::<Mode>(1).expect_err("referenced mode");
    assert!(matches!(err, StoreError::Constraint(_)));

    let err = store
        .insert(&Mode::blank(1))
        .expect_err("duplicate identifier");
    assert!(matches!(err, StoreError::Constraint(_)));
}
