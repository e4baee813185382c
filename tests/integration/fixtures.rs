//! Shared helpers: configs, HTML pages, PDF and DOCX bodies, mocks

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use site_ingest::config::{Config, CrawlerConfig, ExtractConfig, FetchConfig, OutputConfig};
use site_ingest::storage::SqliteStorage;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Temporary database and download directory for one test
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("pages.db")
    }

    pub fn download_dir(&self) -> PathBuf {
        self.dir.path().join("temp_files")
    }

    pub fn storage(&self) -> SqliteStorage {
        SqliteStorage::new(&self.db_path()).expect("Failed to open database")
    }

    /// Config crawling `base_url` with no politeness delay
    pub fn config(&self, base_url: &str) -> Config {
        Config {
            crawler: CrawlerConfig {
                base_url: base_url.to_string(),
                root_domain: None,
                excluded_paths: vec![],
                politeness_delay: 0,
                workers: 1,
            },
            fetch: FetchConfig::default(),
            extract: ExtractConfig {
                download_dir: Some(self.download_dir().to_string_lossy().to_string()),
                ..ExtractConfig::default()
            },
            output: OutputConfig {
                database_path: self.db_path().to_string_lossy().to_string(),
            },
        }
    }
}

/// A paragraph comfortably over the section threshold
pub fn long_paragraph(seed: &str) -> String {
    format!(
        "{} {}",
        seed,
        "The department offers courses, labs and advising for students. ".repeat(3)
    )
}

/// Builds an HTML page with a title, `(heading, paragraph)` sections and links
///
/// The links sit in the page body. The nav and footer each carry one more
/// link that must never be followed.
pub fn html_page<S: AsRef<str>>(title: &str, sections: &[(&str, S)], links: &[&str]) -> String {
    let sections: String = sections
        .iter()
        .map(|(heading, body)| format!("<h2>{}</h2><p>{}</p>", heading, body.as_ref()))
        .collect();
    let links: String = links
        .iter()
        .map(|href| format!("<li><a href=\"{}\">{}</a></li>", href, href))
        .collect();

    format!(
        "<html><head><title>{}</title></head><body>\
         <nav><ul><li><a href=\"/nav-only\">Menu</a></li></ul></nav>\
         <main>{}</main>\
         <div class=\"related\"><ul>{}</ul></div>\
         <footer><p><a href=\"/footer-only\">Contact us</a></p></footer>\
         </body></html>",
        title, sections, links
    )
}

/// Mounts an HTML page at `route`
pub async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

/// Mounts a page at `route` that must be fetched exactly `times` times
pub async fn mount_html_expect(server: &MockServer, route: &str, html: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a GET that must never be sent
pub async fn mount_never_fetched(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Builds a PDF with one text line per entry on a single page
pub fn pdf_bytes(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![50.into(), 800.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("Failed to encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to save PDF");
    bytes
}

/// Builds a DOCX with one paragraph per entry
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::FileOptions::default())
        .expect("Failed to start zip entry");
    writer
        .write_all(document.as_bytes())
        .expect("Failed to write zip entry");
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Lines of document text well over the document threshold
pub fn document_lines() -> Vec<&'static str> {
    vec![
        "Admissions handbook for the upcoming academic year.",
        "Applications open in March and close at the end of June.",
        "Entrance examination scores are required for all programmes.",
        "Hostel allotment follows the merit list published in July.",
        "Fee concessions are available for eligible students on request.",
    ]
}

/// Number of files left in `dir` (0 if it does not exist)
pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
