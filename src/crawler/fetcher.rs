//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - HEAD requests to read document sizes before downloading
//! - GET requests for pages and documents with per-request timeouts
//! - Error classification into `FetchError`

use crate::config::FetchConfig;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Failures while fetching a URL
///
/// None of these are fatal to a crawl; the page is abandoned for this run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is {size} bytes, over the {limit} byte limit")]
    Oversized { url: String, size: u64, limit: u64 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a reqwest error for `url`
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// A fetched page, decoded to text
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw `Content-Type` header value
    pub content_type: Option<String>,

    /// Body decoded with the charset named in `Content-Type` (UTF-8 if none)
    pub text: String,
}


/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(config.head_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Timeout-bounded HEAD/GET with a document size cap
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    head_timeout: Duration,
    page_timeout: Duration,
    document_timeout: Duration,
    max_document_size: u64,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            head_timeout: Duration::from_secs(config.head_timeout),
            page_timeout: Duration::from_secs(config.page_timeout),
            document_timeout: Duration::from_secs(config.document_timeout),
            max_document_size: config.max_document_size,
        })
    }

    pub fn max_document_size(&self) -> u64 {
        self.max_document_size
    }

    /// Sends a HEAD request and returns the response headers
    pub async fn head(&self, url: &str) -> Result<HeaderMap, FetchError> {
        let response = self
            .client
            .head(url)
            .timeout(self.head_timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let response = check_status(url, response)?;
        Ok(response.headers().clone())
    }

    /// Fetches an HTML page candidate
    ///
    /// The body is returned whatever its content type; routing decides what
    /// to do with it.
    pub async fn get_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.send_get(url, self.page_timeout).await?;
        let content_type = header_content_type(&response);

        let text = response
            .text()
            .await
            .map_err(|e| body_error(url, e))?;

        Ok(FetchedPage { content_type, text })
    }

    /// Fetches a PDF/DOCX document
    ///
    /// # Request Flow
    ///
    /// 1. HEAD to read `Content-Length`
    ///    - Over the cap → `Oversized`, no GET is sent
    ///    - HEAD failed or no length → continue, size unknown
    /// 2. GET with the document timeout
    /// 3. Body rejected as `Oversized` once it grows past the cap
    pub async fn get_document(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let limit = self.max_document_size;

        match self.head(url).await {
            Ok(headers) => {
                if let Some(size) = content_length(&headers) {
                    if size > limit {
                        return Err(FetchError::Oversized {
                            url: url.to_string(),
                            size,
                            limit,
                        });
                    }
                }
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "HEAD failed, downloading without size check");
            }
        }

        let mut response = self.send_get(url, self.document_timeout).await?;

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| body_error(url, e))? {
            body.extend_from_slice(&chunk);

            if body.len() as u64 > limit {
                return Err(FetchError::Oversized {
                    url: url.to_string(),
                    size: body.len() as u64,
                    limit,
                });
            }
        }

        Ok(body)
    }

    async fn send_get(&self, url: &str, timeout: Duration) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        check_status(url, response)
    }
}

fn header_content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn body_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Body {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn check_status(url: &str, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Reads `Content-Length` from the headers
///
/// Read directly from the header map; the response's own length is the
/// length of the (empty) HEAD body.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
