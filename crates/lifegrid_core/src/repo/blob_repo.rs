//! Key-value blob repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store opaque text payloads under fixed keys.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A write replaces the whole payload for its key in one statement.
//! - Repositories only accept connections with migrations fully applied.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for blob reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value storage for serialized payloads.
pub trait BlobRepository {
    /// Returns the payload stored under `key`, if any.
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or overwrites the payload under `key`.
    fn write_blob(&self, key: &str, payload: &str) -> RepoResult<()>;
    /// Removes `key`; returns whether a payload existed.
    fn delete_blob(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed blob repository over the `kv_store` table.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_store WHERE storage_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_blob(&self, key: &str, payload: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_store (storage_key, payload)
             VALUES (?1, ?2)
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, payload],
        )?;
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE storage_key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::{BlobRepository, RepoError, SqliteBlobRepository};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn write_overwrites_and_delete_reports_presence() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteBlobRepository::try_new(&conn).unwrap();

        repo.write_blob("state", "one").unwrap();
        repo.write_blob("state", "two").unwrap();
        assert_eq!(repo.read_blob("state").unwrap().as_deref(), Some("two"));

        assert!(repo.delete_blob("state").unwrap());
        assert!(!repo.delete_blob("state").unwrap());
        assert_eq!(repo.read_blob("state").unwrap(), None);
    }

    #[test]
    fn rejects_unmigrated_connection_and_blank_key() {
        let raw = Connection::open_in_memory().unwrap();
        assert!(matches!(
            SqliteBlobRepository::try_new(&raw),
            Err(RepoError::UninitializedConnection { .. })
        ));

        let conn = open_db_in_memory().unwrap();
        let repo = SqliteBlobRepository::try_new(&conn).unwrap();
        assert!(matches!(
            repo.write_blob("  ", "x"),
            Err(RepoError::InvalidKey(_))
        ));
    }
}
