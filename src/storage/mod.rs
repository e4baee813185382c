//! Storage module for persisting extracted records
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Idempotent writes of page records
//! - Run tracking
//! - Read access for the index-building and retrieval collaborators

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{PersistenceError, Storage, StorageResult, UpsertOutcome};

use std::fmt;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, PersistenceError> {
    SqliteStorage::new(path)
}

/// Kind of source a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// One section of an HTML page
    Html,
    /// Text of a PDF document
    Pdf,
    /// Source URL of a PDF document
    PdfUrl,
    /// Text of a DOCX document
    Docx,
    /// Source URL of a DOCX document
    DocxUrl,
}

impl FileType {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
            Self::PdfUrl => "pdf_url",
            Self::Docx => "docx",
            Self::DocxUrl => "docx_url",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "html" => Some(Self::Html),
            "pdf" => Some(Self::Pdf),
            "pdf_url" => Some(Self::PdfUrl),
            "docx" => Some(Self::Docx),
            "docx_url" => Some(Self::DocxUrl),
            _ => None,
        }
    }

    pub fn all() -> [Self; 5] {
        [Self::Html, Self::Pdf, Self::PdfUrl, Self::Docx, Self::DocxUrl]
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// One semantically coherent unit of extracted content
///
/// `(url, section_title)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub section_title: String,
    pub content: String,
    pub file_type: FileType,
}

impl PageRecord {
    /// Record for one HTML section
    pub fn html_section(url: &str, title: &str, section_title: &str, content: &str) -> Self {
        Self {
            url: url.to_string(),
            title: title.to_string(),
            section_title: section_title.to_string(),
            content: content.to_string(),
            file_type: FileType::Html,
        }
    }
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub pages_visited: u64,
    pub records_written: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
