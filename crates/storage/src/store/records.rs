#![forbid(unsafe_code)]

use super::{RecordStore, SqliteStore, StoreError, map_write_error};
use de_core::{Mode, RecordId, RecordKind, Step};
use rusqlite::types::ToSql;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

/// Table mapping for a record kind. Column order of `COLUMNS` matches
/// `field_values` and the decoder in `from_row` (which also reads `ID` first).
pub trait StoredRecord: Sized {
    const KIND: RecordKind;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> RecordId;
    fn field_values(&self) -> Vec<&dyn ToSql>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl StoredRecord for Mode {
    const KIND: RecordKind = RecordKind::Mode;
    const COLUMNS: &'static [&'static str] = &["Name", "MaxBottleNumber", "MaxUsedTips"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field_values(&self) -> Vec<&dyn ToSql> {
        vec![&self.name, &self.max_bottle_number, &self.max_used_tips]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Mode::new(
            row.get(0)?,
            row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            row.get::<_, Option<i32>>(2)?.unwrap_or_default(),
            row.get::<_, Option<i32>>(3)?.unwrap_or_default(),
        ))
    }
}

impl StoredRecord for Step {
    const KIND: RecordKind = RecordKind::Step;
    const COLUMNS: &'static [&'static str] =
        &["ModeId", "Timer", "Destination", "Speed", "Type", "Volume"];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field_values(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.mode_id,
            &self.timer,
            &self.destination,
            &self.speed,
            &self.step_type,
            &self.volume,
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Step::new(
            row.get(0)?,
            row.get::<_, Option<RecordId>>(1)?.unwrap_or_default(),
            row.get::<_, Option<i32>>(2)?.unwrap_or_default(),
            row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            row.get::<_, Option<i32>>(4)?.unwrap_or_default(),
            row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            row.get::<_, Option<i32>>(6)?.unwrap_or_default(),
        ))
    }
}

impl RecordStore for SqliteStore {
    fn load_all<R: StoredRecord>(&self) -> Result<Vec<R>, StoreError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT ID, {} FROM {} ORDER BY ID",
            R::COLUMNS.join(", "),
            R::KIND.table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(R::from_row(row)?);
        }
        tracing::debug!(kind = %R::KIND, count = out.len(), "loaded records");
        Ok(out)
    }

    fn max_identifier<R: StoredRecord>(&self) -> Result<Option<RecordId>, StoreError> {
        let conn = self.connect()?;
        let sql = format!("SELECT MAX(ID) FROM {}", R::KIND.table());
        Ok(conn
            .query_row(&sql, [], |row| row.get::<_, Option<RecordId>>(0))
            .optional()?
            .flatten())
    }

    fn insert<R: StoredRecord>(&self, record: &R) -> Result<(), StoreError> {
        let placeholders = (1..=R::COLUMNS.len() + 1)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} (ID, {}) VALUES ({placeholders})",
            R::KIND.table(),
            R::COLUMNS.join(", ")
        );

        let id = record.id();
        let mut values: Vec<&dyn ToSql> = vec![&id];
        values.extend(record.field_values());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(&sql, params_from_iter(values))
            .map_err(map_write_error)?;
        tx.commit()?;
        tracing::debug!(kind = %R::KIND, id, "inserted record");
        Ok(())
    }

    fn update<R: StoredRecord>(&self, record: &R) -> Result<(), StoreError> {
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE ID = ?1",
            R::KIND.table()
        );

        let id = record.id();
        let mut values: Vec<&dyn ToSql> = vec![&id];
        values.extend(record.field_values());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let updated = tx
            .execute(&sql, params_from_iter(values))
            .map_err(map_write_error)?;
        if updated == 0 {
            return Err(StoreError::UnknownId { kind: R::KIND, id });
        }
        tx.commit()?;
        tracing::debug!(kind = %R::KIND, id, "updated record");
        Ok(())
    }

    fn delete<R: StoredRecord>(&self, id: RecordId) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE ID = ?1", R::KIND.table());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute(&sql, params![id]).map_err(map_write_error)?;
        if deleted == 0 {
            return Err(StoreError::UnknownId { kind: R::KIND, id });
        }
        tx.commit()?;
        tracing::debug!(kind = %R::KIND, id, "deleted record");
        Ok(())
    }
}
