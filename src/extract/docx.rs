//! DOCX text extraction (zip + quick-xml)
//!
//! Reads `word/document.xml` out of the archive and collects the text of
//! top-level paragraphs. Paragraphs inside tables and text boxes are skipped.

use crate::extract::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts the paragraph text of a DOCX file
///
/// # Arguments
///
/// * `path` - Path to the DOCX file
///
/// # Returns
///
/// * `Ok(String)` - Paragraphs joined with newlines, trimmed (may be empty)
/// * `Err(ExtractionError::Docx)` - Not a zip archive, missing document part,
///   or malformed XML
pub fn extract_docx_text(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)?;

    paragraphs_from_xml(&xml)
        .map(|paragraphs| paragraphs.join("\n").trim().to_string())
}

/// Collects the text of each top-level `w:p` element
///
/// Tables and text boxes are skipped. A paragraph nested inside another one
/// does not split it.
fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut skip_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::Docx(format!("position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skip_depth += 1,
                b"w:p" if skip_depth == 0 => {
                    if paragraph_depth == 0 {
                        current = Some(String::new());
                    }
                    paragraph_depth += 1;
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if skip_depth == 0 => match e.name().as_ref() {
                b"w:p" if paragraph_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push('\t');
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(paragraph) = current.as_mut() {
                        paragraph.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text && skip_depth == 0 => {
                if let Some(paragraph) = current.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                    paragraph.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skip_depth = skip_depth.saturating_sub(1),
                b"w:p" if skip_depth == 0 => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
