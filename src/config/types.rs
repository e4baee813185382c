use serde::Deserialize;

/// Main configuration structure for Site-Ingest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; the crawl starts here
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Domain whose host and subdomains are in scope.
    /// Defaults to the base URL's host without a leading `www.`
    #[serde(rename = "root-domain", default)]
    pub root_domain: Option<String>,

    /// Path substrings that are never crawled
    #[serde(rename = "excluded-paths", default)]
    pub excluded_paths: Vec<String>,

    /// Pause after each HTML page (milliseconds)
    #[serde(rename = "politeness-delay", default = "default_politeness_delay")]
    pub politeness_delay: u64,

    /// Number of pages processed concurrently
    #[serde(default = "default_workers")]
    pub workers: u32,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// HEAD request timeout (seconds)
    #[serde(rename = "head-timeout", default = "default_head_timeout")]
    pub head_timeout: u64,

    /// GET timeout for HTML pages (seconds)
    #[serde(rename = "page-timeout", default = "default_page_timeout")]
    pub page_timeout: u64,

    /// GET timeout for PDF/DOCX documents (seconds)
    #[serde(rename = "document-timeout", default = "default_document_timeout")]
    pub document_timeout: u64,

    /// Largest document body that will be downloaded (bytes)
    #[serde(rename = "max-document-size", default = "default_max_document_size")]
    pub max_document_size: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            head_timeout: default_head_timeout(),
            page_timeout: default_page_timeout(),
            document_timeout: default_document_timeout(),
            max_document_size: default_max_document_size(),
        }
    }
}

/// Extraction thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Sections whose body is at most this many characters are dropped
    #[serde(rename = "min-section-length", default = "default_min_section_length")]
    pub min_section_length: usize,

    /// Documents whose text is at most this many characters are dropped
    #[serde(rename = "min-document-length", default = "default_min_document_length")]
    pub min_document_length: usize,

    /// Directory for temporary document files (OS temp dir when unset)
    #[serde(rename = "download-dir", default)]
    pub download_dir: Option<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_section_length: default_min_section_length(),
            min_document_length: default_min_document_length(),
            download_dir: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_politeness_delay() -> u64 {
    1000
}

fn default_workers() -> u32 {
    1
}

fn default_user_agent() -> String {
    format!("site-ingest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_head_timeout() -> u64 {
    5
}

fn default_page_timeout() -> u64 {
    10
}

fn default_document_timeout() -> u64 {
    20
}

fn default_max_document_size() -> u64 {
    10_000_000
}

fn default_min_section_length() -> usize {
    100
}

fn default_min_document_length() -> usize {
    200
}
