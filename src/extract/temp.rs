//! Scoped temporary files for document parsing
//!
//! Parsers read documents from disk. A `ScopedDocument` owns the file and
//! removes it when dropped, so every exit path cleans up.

use crate::extract::ExtractionError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A document body materialized on disk for the lifetime of the value
#[derive(Debug)]
pub struct ScopedDocument {
    file: NamedTempFile,
}

impl ScopedDocument {
    /// Writes `bytes` to a new temporary file
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory to create the file in (created if missing);
    ///   the OS temp directory when `None`
    /// * `suffix` - File name suffix, e.g. `.pdf`
    /// * `bytes` - The document body
    pub fn write(dir: Option<&Path>, suffix: &str, bytes: &[u8]) -> Result<Self, ExtractionError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("site-ingest-").suffix(suffix);

        let mut file = match dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };

        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
