//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{FileType, PageRecord, RunRecord, RunStatus};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Invalid record for {url}: {reason}")]
    InvalidRecord { url: String, reason: String },

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, PersistenceError>;

/// Acknowledgement of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was written
    Inserted,
    /// A row with the same `(url, section_title)` already existed; nothing changed
    AlreadyPresent,
}

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the crawler and by
/// the downstream index/retrieval hand-off.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Closes a run with its final status and counters
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        pages_visited: u64,
        records_written: u64,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Page Records =====

    /// Writes a record unless its `(url, section_title)` already exists
    ///
    /// Repeating an identical write leaves the store unchanged.
    fn upsert_page(&mut self, record: &PageRecord) -> StorageResult<UpsertOutcome>;

    /// All records with content, in insertion order
    fn indexable_records(&self) -> StorageResult<Vec<PageRecord>>;

    /// First record stored for a URL
    fn find_by_url(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    // ===== Statistics =====

    /// Gets total record count
    fn count_records(&self) -> StorageResult<u64>;

    /// Counts records per file type
    fn count_by_file_type(&self) -> StorageResult<HashMap<FileType, u64>>;

    /// Counts distinct source URLs
    fn count_distinct_urls(&self) -> StorageResult<u64>;
}
