#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;
use std::collections::BTreeSet;

const TABLES: [&str; 3] = ["Modes", "Steps", "Users"];

const SQL: &str = r#"
        CREATE TABLE IF NOT EXISTS Modes (
          ID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT,
          MaxBottleNumber INTEGER,
          MaxUsedTips INTEGER
        );

        CREATE TABLE IF NOT EXISTS Steps (
          ID INTEGER PRIMARY KEY AUTOINCREMENT,
          ModeId INTEGER,
          Timer INTEGER,
          Destination TEXT,
          Speed INTEGER,
          Type TEXT,
          Volume INTEGER,
          FOREIGN KEY (ModeId) REFERENCES Modes(ID)
        );

        -- Name is unique by convention: create_user checks before inserting.
        CREATE TABLE IF NOT EXISTS Users (
          ID INTEGER PRIMARY KEY AUTOINCREMENT,
          Name TEXT NOT NULL,
          Password TEXT NOT NULL
        );
"#;

pub(super) fn create_if_absent(conn: &Connection) -> Result<bool, StoreError> {
    let existing = existing_tables(conn)?;
    let present = TABLES
        .iter()
        .filter(|table| existing.contains(**table))
        .count();

    if present == TABLES.len() {
        return Ok(false);
    }
    if present > 0 {
        return Err(StoreError::InvalidInput(
            "database holds a partial schema (Modes, Steps and Users are required)",
        ));
    }

    conn.execute_batch(SQL)?;
    Ok(true)
}

fn existing_tables(conn: &Connection) -> Result<BTreeSet<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }
    Ok(tables)
}
