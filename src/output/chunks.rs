//! Chunk export for the index-building job
//!
//! Every record with content becomes `section_title + "\n" + content`, cut
//! into overlapping fixed-size windows. Each kept window gets an ordinal that
//! the similarity index uses to map hits back to a URL.

use crate::storage::{PageRecord, Storage};
use crate::IngestError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Window size in characters
pub const CHUNK_SIZE: usize = 700;

/// Characters shared by consecutive windows
pub const CHUNK_OVERLAP: usize = 150;

/// Windows whose trimmed length is at most this are dropped
pub const MIN_CHUNK_LENGTH: usize = 50;

/// One window of record text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position in the export; index entries are keyed by it
    pub ordinal: usize,
    pub url: String,
    pub text: String,
}

/// Splits text into windows of `size` characters overlapping by `overlap`
///
/// The last window may be shorter. Windows are not filtered here.
///
/// # Arguments
///
/// * `text` - Text to split
/// * `size` - Window length in characters (must exceed `overlap`)
/// * `overlap` - Characters repeated at the start of the next window
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = size.saturating_sub(overlap).max(1);

    let mut windows = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        windows.push(chars[start..end].iter().collect());
        start += step;
    }
    windows
}

/// Builds the chunk list for a set of records, in record order
pub fn build_chunks(records: &[PageRecord]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for record in records {
        let full_text = format!("{}\n{}", record.section_title, record.content);
        for text in chunk_text(&full_text, CHUNK_SIZE, CHUNK_OVERLAP) {
            if text.trim().chars().count() > MIN_CHUNK_LENGTH {
                chunks.push(Chunk {
                    ordinal: chunks.len(),
                    url: record.url.clone(),
                    text,
                });
            }
        }
    }
    chunks
}

/// Writes the chunks of every indexable record to `path` as JSON Lines
///
/// # Returns
///
/// The number of chunks written
pub fn export_chunks(storage: &dyn Storage, path: &Path) -> Result<usize, IngestError> {
    let records = storage.indexable_records()?;
    let chunks = build_chunks(&records);

    let mut writer = BufWriter::new(File::create(path)?);
    for chunk in &chunks {
        serde_json::to_writer(&mut writer, chunk)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    tracing::info!(
        records = records.len(),
        chunks = chunks.len(),
        path = %path.display(),
        "Exported chunks"
    );

    Ok(chunks.len())
}
