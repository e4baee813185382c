//! HTML section extractor
//!
//! Turns one HTML page into its title, its titled sections and the links it
//! points at. Sections are bounded by h1/h2/h3 headings, all three treated as
//! equal-priority boundaries.

use crate::extract::tree::{collect_until, joined_text};
use crate::extract::Section;
use crate::url::NormalizedUrl;
use scraper::{ElementRef, Html, Selector};

/// Elements removed before any text is read
const NOISE_ELEMENTS: &str = "script, style, nav, footer, header";

/// Headings that open a section
const SECTION_HEADINGS: [&str; 3] = ["h1", "h2", "h3"];

/// Everything extracted from one HTML page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// Trimmed `<title>` text, empty if absent
    pub title: String,

    /// Sections whose body passed the length threshold, in document order
    pub sections: Vec<Section>,

    /// Absolute http(s) links with fragments stripped, in document order
    pub links: Vec<NormalizedUrl>,
}

#[derive(Clone)]
struct PageSelectors {
    title: Selector,
    anchors: Selector,
    noise: Selector,
    headings: Selector,
}

impl PageSelectors {
    fn new() -> Self {
        Self {
            title: Selector::parse("title").expect("title selector"),
            anchors: Selector::parse("a[href]").expect("anchor selector"),
            noise: Selector::parse(NOISE_ELEMENTS).expect("noise selector"),
            headings: Selector::parse("h1, h2, h3").expect("heading selector"),
        }
    }
}

/// Structure-aware extractor for HTML pages
#[derive(Clone)]
pub struct HtmlExtractor {
    min_section_length: usize,
    selectors: PageSelectors,
}

impl HtmlExtractor {
    /// Creates an extractor that drops sections whose body has at most
    /// `min_section_length` characters
    pub fn new(min_section_length: usize) -> Self {
        Self {
            min_section_length,
            selectors: PageSelectors::new(),
        }
    }

    /// Extracts title, sections and links from an HTML page
    ///
    /// # Arguments
    ///
    /// * `html` - The page body
    /// * `page_url` - The URL the page was fetched from, used to resolve links
    ///
    /// # Example
    ///
    /// ```
    /// use site_ingest::extract::HtmlExtractor;
    /// use site_ingest::url::NormalizedUrl;
    ///
    /// let page_url = NormalizedUrl::parse("https://site.tld/").unwrap();
    /// let body = "x".repeat(120);
    /// let html = format!("<title> Home </title><h2>Fees</h2><p>{}</p>", body);
    ///
    /// let page = HtmlExtractor::new(100).extract(&html, &page_url);
    /// assert_eq!(page.title, "Home");
    /// assert_eq!(page.sections[0].title, "Fees");
    /// ```
    pub fn extract(&self, html: &str, page_url: &NormalizedUrl) -> ExtractedPage {
        let mut document = Html::parse_document(html);
        self.strip_noise(&mut document);

        // Html::select also visits detached nodes; walk from the root instead
        let root = document.root_element();

        ExtractedPage {
            title: self.extract_title(root),
            sections: self.extract_sections(root),
            links: self.extract_links(root, page_url),
        }
    }

    fn extract_title(&self, root: ElementRef<'_>) -> String {
        root.select(&self.selectors.title)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn extract_links(&self, root: ElementRef<'_>, page_url: &NormalizedUrl) -> Vec<NormalizedUrl> {
        root.select(&self.selectors.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_link(href, page_url))
            .collect()
    }

    fn strip_noise(&self, document: &mut Html) {
        let ids: Vec<_> = document
            .select(&self.selectors.noise)
            .map(|element| element.id())
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn extract_sections(&self, root: ElementRef<'_>) -> Vec<Section> {
        root.select(&self.selectors.headings)
            .filter_map(|heading| {
                let title = joined_text(&heading, "");
                let body = collect_until(heading, is_section_heading)
                    .iter()
                    .map(|sibling| joined_text(sibling, " "))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");

                let section = Section { title, body };
                section
                    .passes_threshold(self.min_section_length)
                    .then_some(section)
            })
            .collect()
    }
}

fn is_section_heading(element: &ElementRef<'_>) -> bool {
    SECTION_HEADINGS.contains(&element.value().name())
}

/// Resolves an href against the page URL
///
/// Returns None for empty hrefs, same-page anchors and anything that does
/// not resolve to an http(s) URL (`mailto:`, `javascript:`, ...).
fn resolve_link(href: &str, page_url: &NormalizedUrl) -> Option<NormalizedUrl> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    page_url.join(href).ok()
}
