//! History repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable append/list/delete APIs over the `flips` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `FlipRecord::validate()` before SQL mutations.
//! - `list()` ordering is total: `flipped_at DESC, uuid ASC`, so positional
//!   bulk delete resolves against a stable view.
//! - Deleting an absent record is a successful no-op, not an error.

use crate::db::DbError;
use crate::model::record::{FlipRecord, Outcome, RecordId, RecordValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const FLIP_SELECT_SQL: &str = "SELECT uuid, result, flipped_at FROM flips";
const REQUIRED_COLUMNS: &[&str] = &["uuid", "result", "flipped_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for flip history persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted flip data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not migrated to {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` does not exist")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` does not exist")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
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

/// Repository interface for the append-only flip history.
pub trait HistoryRepository {
    /// Appends one record. Always succeeds for a structurally valid record.
    fn insert(&self, record: &FlipRecord) -> RepoResult<RecordId>;

    /// Returns all records, most recent first.
    fn list(&self) -> RepoResult<Vec<FlipRecord>>;

    /// Deletes one record by identity. Returns `false` when it was already
    /// absent.
    fn delete(&self, id: RecordId) -> RepoResult<bool>;

    /// Deletes records by position in the current sorted view, atomically
    /// over one snapshot. Out-of-range positions are ignored. Returns the
    /// identities actually removed.
    fn delete_at(&self, positions: &BTreeSet<usize>) -> RepoResult<Vec<RecordId>>;

    /// Deletes every record. Returns the identities removed.
    fn clear(&self) -> RepoResult<Vec<RecordId>>;

    /// Returns the number of stored records.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed flip history repository.
pub struct SqliteHistoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHistoryRepository<'conn> {
    /// Wraps a connection after verifying it carries the migrated schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations never ran.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'flips'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable("flips"));
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('flips');")?;
        let mut rows = stmt.query([])?;
        let mut present = BTreeSet::new();
        while let Some(row) = rows.next()? {
            present.insert(row.get::<_, String>(0)?);
        }
        for column in REQUIRED_COLUMNS {
            if !present.contains(*column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "flips",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl HistoryRepository for SqliteHistoryRepository<'_> {
    fn insert(&self, record: &FlipRecord) -> RepoResult<RecordId> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO flips (uuid, result, flipped_at) VALUES (?1, ?2, ?3);",
            params![
                record.uuid.to_string(),
                record.result.label(),
                record.flipped_at_ms,
            ],
        )?;

        Ok(record.uuid)
    }

    fn list(&self) -> RepoResult<Vec<FlipRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FLIP_SELECT_SQL} ORDER BY flipped_at DESC, uuid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_flip_row(row)?);
        }

        Ok(records)
    }

    fn delete(&self, id: RecordId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM flips WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn delete_at(&self, positions: &BTreeSet<usize>) -> RepoResult<Vec<RecordId>> {
        // Snapshot and delete inside one transaction so positions cannot
        // drift against the view they were taken from.
        let tx = self.conn.unchecked_transaction()?;

        let snapshot = self.list()?;
        let targets: Vec<RecordId> = positions
            .iter()
            .filter_map(|&position| snapshot.get(position))
            .map(|record| record.uuid)
            .collect();

        if !targets.is_empty() {
            let placeholders = vec!["?"; targets.len()].join(", ");
            let bind: Vec<Value> = targets
                .iter()
                .map(|id| Value::Text(id.to_string()))
                .collect();
            tx.execute(
                &format!("DELETE FROM flips WHERE uuid IN ({placeholders});"),
                params_from_iter(bind),
            )?;
        }

        tx.commit()?;
        Ok(targets)
    }

    fn clear(&self) -> RepoResult<Vec<RecordId>> {
        let tx = self.conn.unchecked_transaction()?;
        let removed: Vec<RecordId> = self.list()?.into_iter().map(|record| record.uuid).collect();
        tx.execute("DELETE FROM flips;", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM flips;", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn parse_flip_row(row: &Row<'_>) -> RepoResult<FlipRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in flips.uuid"))
    })?;

    let result_text: String = row.get("result")?;
    let result = Outcome::parse(&result_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid outcome `{result_text}` in flips.result"))
    })?;

    let record = FlipRecord {
        uuid,
        result,
        flipped_at_ms: row.get("flipped_at")?,
    };
    record.validate()?;
    Ok(record)
}
