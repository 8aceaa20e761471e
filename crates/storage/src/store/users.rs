#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, map_write_error};
use de_core::auth::{Authenticator, LoginOutcome};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

impl Authenticator for SqliteStore {
    type Error = StoreError;

    fn validate(&self, name: &str, password: &str) -> Result<LoginOutcome, StoreError> {
        if name.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::InvalidInput);
        }

        let conn = self.connect()?;
        let stored = conn
            .query_row(
                "SELECT Password FROM Users WHERE Name = ?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(match stored {
            None => LoginOutcome::NoUser,
            Some(stored) if stored == hash_password(password) => LoginOutcome::Ok,
            Some(_) => LoginOutcome::WrongPassword,
        })
    }

    fn create_user(&self, name: &str, password: &str) -> Result<bool, StoreError> {
        if name.is_empty() || password.is_empty() {
            return Err(StoreError::InvalidInput("name and password are required"));
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let taken = tx.query_row(
            "SELECT COUNT(*) FROM Users WHERE Name = ?1",
            params![name],
            |row| row.get::<_, i64>(0),
        )?;
        if taken > 0 {
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO Users (Name, Password) VALUES (?1, ?2)",
            params![name, hash_password(password)],
        )
        .map_err(map_write_error)?;
        tx.commit()?;
        tracing::info!(user = name, "created user");
        Ok(true)
    }
}

fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::hash_password;

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
