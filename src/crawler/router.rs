//! Content routing
//!
//! Picks the extractor for a URL: by suffix for PDF/DOCX, by the fetched
//! `Content-Type` for HTML.

use crate::extract::DocumentKind;
use crate::url::NormalizedUrl;

/// Extractor selected for a fetched URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    Html,
    Pdf,
    Docx,
    /// No extractor; the page yields no records and no links
    Unsupported,
}

impl ExtractorKind {
    /// The binary document format, if this is a document extractor
    pub fn document_kind(&self) -> Option<DocumentKind> {
        match self {
            Self::Pdf => Some(DocumentKind::Pdf),
            Self::Docx => Some(DocumentKind::Docx),
            Self::Html | Self::Unsupported => None,
        }
    }
}

/// Routes a URL to an extractor
///
/// # Arguments
///
/// * `url` - The page URL; a `.pdf`/`.docx` suffix wins over any header
/// * `content_type` - The `Content-Type` header of the fetched body, if known
///
/// # Example
///
/// ```
/// use site_ingest::crawler::{route, ExtractorKind};
/// use site_ingest::url::NormalizedUrl;
///
/// let url = NormalizedUrl::parse("https://site.tld/files/Report.PDF").unwrap();
/// assert_eq!(route(&url, None), ExtractorKind::Pdf);
///
/// let url = NormalizedUrl::parse("https://site.tld/about").unwrap();
/// assert_eq!(route(&url, Some("text/html; charset=utf-8")), ExtractorKind::Html);
/// assert_eq!(route(&url, Some("application/json")), ExtractorKind::Unsupported);
/// ```
pub fn route(url: &NormalizedUrl, content_type: Option<&str>) -> ExtractorKind {
    match DocumentKind::from_path(url.path()) {
        Some(DocumentKind::Pdf) => return ExtractorKind::Pdf,
        Some(DocumentKind::Docx) => return ExtractorKind::Docx,
        None => {}
    }

    match content_type {
        Some(value) if value.to_ascii_lowercase().contains("text/html") => ExtractorKind::Html,
        _ => ExtractorKind::Unsupported,
    }
}
