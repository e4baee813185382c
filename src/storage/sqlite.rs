//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PersistenceError, Storage, StorageResult, UpsertOutcome};
use crate::storage::{FileType, PageRecord, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Opens (or creates) the database file and applies the schema. Failure
    /// here is fatal to a crawl.
    pub fn new(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Failed),
        pages_visited: row.get::<_, i64>(5)? as u64,
        records_written: row.get::<_, i64>(6)? as u64,
    })
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
    let file_type: String = row.get(4)?;
    Ok(PageRecord {
        url: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        section_title: row.get(2)?,
        content: row.get(3)?,
        file_type: FileType::from_db_string(&file_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown file_type '{}'", file_type).into(),
            )
        })?,
    })
}

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, pages_visited, records_written";

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        pages_visited: u64,
        records_written: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_visited = ?3, records_written = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                pages_visited as i64,
                records_written as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(PersistenceError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(PersistenceError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Page Records =====

    fn upsert_page(&mut self, record: &PageRecord) -> StorageResult<UpsertOutcome> {
        if record.content.trim().is_empty() {
            return Err(PersistenceError::InvalidRecord {
                url: record.url.clone(),
                reason: "content is empty".to_string(),
            });
        }

        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT INTO pages (url, title, section_title, content, file_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(url, section_title) DO NOTHING",
            params![
                record.url,
                record.title,
                record.section_title,
                record.content,
                record.file_type.to_db_string(),
                now
            ],
        )?;

        Ok(if inserted == 0 {
            UpsertOutcome::AlreadyPresent
        } else {
            UpsertOutcome::Inserted
        })
    }

    fn indexable_records(&self) -> StorageResult<Vec<PageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, title, section_title, content, file_type
             FROM pages WHERE content IS NOT NULL ORDER BY id ASC",
        )?;

        let records = stmt
            .query_map([], page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn find_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, title, section_title, content, file_type
                 FROM pages WHERE url = ?1 AND content IS NOT NULL ORDER BY id ASC LIMIT 1",
                params![url],
                page_from_row,
            )
            .optional()?;
        Ok(record)
    }

    // ===== Statistics =====

    fn count_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_file_type(&self) -> StorageResult<HashMap<FileType, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT file_type, COUNT(*) FROM pages GROUP BY file_type")?;

        let mut counts = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        for row in rows {
            let (file_type, count) = row?;
            if let Some(file_type) = FileType::from_db_string(&file_type) {
                counts.insert(file_type, count as u64);
            }
        }

        Ok(counts)
    }

    fn count_distinct_urls(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT url) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
