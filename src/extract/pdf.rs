//! PDF text extraction (lopdf)

use crate::extract::ExtractionError;
use lopdf::Document;
use std::path::Path;

/// Extracts the text of a PDF file page by page
///
/// Pages are read in page-number order; pages without text are skipped and
/// the rest are joined with newlines.
///
/// # Arguments
///
/// * `path` - Path to the PDF file
///
/// # Returns
///
/// * `Ok(String)` - The trimmed document text (may be empty)
/// * `Err(ExtractionError::Pdf)` - The file is not a readable PDF
pub fn extract_pdf_text(path: &Path) -> Result<String, ExtractionError> {
    let document = Document::load(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        let text = document
            .extract_text(&[*page_number])
            .map_err(|e| ExtractionError::Pdf(format!("page {}: {}", page_number, e)))?;

        let text = text.trim();
        if !text.is_empty() {
            pages.push(text.to_string());
        }
    }

    Ok(pages.join("\n").trim().to_string())
}
