//! Document extractors
//!
//! This module turns fetched bodies into text:
//! - HTML pages into titled sections plus discovered links
//! - PDF documents into page-by-page text
//! - DOCX documents into paragraph-by-paragraph text
//!
//! PDF and DOCX bodies are parsed from a scoped temporary file on the
//! blocking thread pool.

mod docx;
mod html;
mod pdf;
mod temp;
mod tree;

pub use docx::extract_docx_text;
pub use html::{ExtractedPage, HtmlExtractor};
pub use pdf::extract_pdf_text;
pub use temp::ScopedDocument;
pub use tree::{collect_until, joined_text};

use crate::storage::{FileType, PageRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a fetched body into text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Malformed PDF: {0}")]
    Pdf(String),

    #[error("Malformed DOCX: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// A titled span of HTML content bounded by headings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    /// Returns true if the body has more than `min_length` characters
    pub fn passes_threshold(&self, min_length: usize) -> bool {
        self.body.chars().count() > min_length
    }
}

/// Binary document formats handled by the crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the document kind from a URL path (case-insensitive suffix)
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.to_ascii_lowercase();
        if path.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if path.ends_with(".docx") {
            Some(Self::Docx)
        } else {
            None
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
        }
    }

    /// `title` stored on both records of a document
    pub fn record_title(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF Document",
            Self::Docx => "DOCX Document",
        }
    }

    /// `section_title` of the content record
    pub fn content_section(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF Content",
            Self::Docx => "DOCX Content",
        }
    }

    pub fn content_file_type(&self) -> FileType {
        match self {
            Self::Pdf => FileType::Pdf,
            Self::Docx => FileType::Docx,
        }
    }

    pub fn url_file_type(&self) -> FileType {
        match self {
            Self::Pdf => FileType::PdfUrl,
            Self::Docx => FileType::DocxUrl,
        }
    }

    /// Builds the content record and the source-URL record for a document
    pub fn records(&self, url: &str, text: &str) -> [PageRecord; 2] {
        [
            PageRecord {
                url: url.to_string(),
                title: self.record_title().to_string(),
                section_title: self.content_section().to_string(),
                content: text.to_string(),
                file_type: self.content_file_type(),
            },
            PageRecord {
                url: url.to_string(),
                title: self.record_title().to_string(),
                section_title: "Source URL".to_string(),
                content: url.to_string(),
                file_type: self.url_file_type(),
            },
        ]
    }
}

/// Returns true if document text is long enough to keep
pub fn passes_document_threshold(text: &str, min_length: usize) -> bool {
    text.chars().count() > min_length
}

/// Extracts the text of a downloaded PDF or DOCX body
///
/// The body is written to a scoped temporary file under `download_dir` and
/// parsed on the blocking pool. The file is removed whether parsing succeeds
/// or fails.
///
/// # Arguments
///
/// * `kind` - Document format
/// * `bytes` - The downloaded body
/// * `download_dir` - Directory for the temporary file (OS temp dir if `None`)
pub async fn extract_document(
    kind: DocumentKind,
    bytes: Vec<u8>,
    download_dir: Option<PathBuf>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || {
        let document = ScopedDocument::write(download_dir.as_deref(), kind.suffix(), &bytes)?;
        match kind {
            DocumentKind::Pdf => extract_pdf_text(document.path()),
            DocumentKind::Docx => extract_docx_text(document.path()),
        }
    })
    .await
    .map_err(|e| ExtractionError::Task(e.to_string()))?
}
