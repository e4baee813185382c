//! URL handling module for Site-Ingest
//!
//! This module provides URL normalization, crawl-scope checks and the URL
//! classifier that decides whether a URL is followed or skipped.

mod domain;
mod media;
mod normalize;

use crate::config::CrawlerConfig;
use crate::UrlError;
use std::fmt;
use url::Url;

// Re-export main functions
pub use domain::{is_within_domain, root_domain_of};
pub use media::{media_extension, MEDIA_EXTENSIONS};
pub use normalize::NormalizedUrl;

/// Why a URL is not crawled
///
/// A skip is a routing decision, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL could not be parsed
    Unparseable(String),
    /// Scheme other than http/https, or no host
    UnsupportedScheme(String),
    /// The path contains a configured excluded substring
    ExcludedPath(String),
    /// The path ends with a media/archive/executable extension
    MediaExtension(&'static str),
    /// The host is outside the crawl's root domain
    ExternalDomain(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparseable(e) => write!(f, "unparseable url: {}", e),
            Self::UnsupportedScheme(e) => write!(f, "unsupported url: {}", e),
            Self::ExcludedPath(p) => write!(f, "excluded path '{}'", p),
            Self::MediaExtension(ext) => write!(f, "media extension '{}'", ext),
            Self::ExternalDomain(host) => write!(f, "external domain '{}'", host),
        }
    }
}

/// Outcome of classifying a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Follow(NormalizedUrl),
    Skip(SkipReason),
}

impl Classification {
    pub fn is_follow(&self) -> bool {
        matches!(self, Self::Follow(_))
    }
}

/// Decides which URLs belong to the crawl
///
/// Classification is pure: it depends only on the URL and the classifier's
/// fixed settings.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    root_domain: String,
    excluded_paths: Vec<String>,
}

impl UrlClassifier {
    /// Creates a classifier for `root_domain` (matched with its subdomains)
    pub fn new(root_domain: impl Into<String>, excluded_paths: Vec<String>) -> Self {
        Self {
            root_domain: root_domain.into().to_lowercase(),
            excluded_paths,
        }
    }

    /// Builds the classifier from crawler settings
    ///
    /// The root domain defaults to the base URL's host without `www.`.
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, UrlError> {
        let root = match &config.root_domain {
            Some(root) => root.clone(),
            None => {
                let base =
                    Url::parse(&config.base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
                root_domain_of(&base).ok_or(UrlError::MissingDomain)?
            }
        };
        Ok(Self::new(root, config.excluded_paths.clone()))
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Classifies a raw URL string
    ///
    /// # Check Order
    ///
    /// 1. Parse and strip the fragment
    /// 2. Excluded path substrings
    /// 3. Media extensions (case-insensitive suffix)
    /// 4. Root domain or subdomain
    ///
    /// # Examples
    ///
    /// ```
    /// use site_ingest::url::{Classification, SkipReason, UrlClassifier};
    ///
    /// let classifier = UrlClassifier::new("site.tld", vec!["/gallery".to_string()]);
    /// assert!(classifier.classify("https://site.tld/about#team").is_follow());
    /// assert!(matches!(
    ///     classifier.classify("https://other.tld/"),
    ///     Classification::Skip(SkipReason::ExternalDomain(_))
    /// ));
    /// ```
    pub fn classify(&self, raw: &str) -> Classification {
        match NormalizedUrl::parse(raw) {
            Ok(url) => self.classify_normalized(url),
            Err(UrlError::Parse(e)) => Classification::Skip(SkipReason::Unparseable(e)),
            Err(e) => Classification::Skip(SkipReason::UnsupportedScheme(e.to_string())),
        }
    }

    /// Classifies an already normalized URL
    pub fn classify_normalized(&self, url: NormalizedUrl) -> Classification {
        let path = url.path();

        if let Some(excluded) = self
            .excluded_paths
            .iter()
            .find(|p| path.contains(p.as_str()))
        {
            return Classification::Skip(SkipReason::ExcludedPath(excluded.clone()));
        }

        if let Some(ext) = media_extension(path) {
            return Classification::Skip(SkipReason::MediaExtension(ext));
        }

        if !self.is_in_domain(&url) {
            return Classification::Skip(SkipReason::ExternalDomain(url.host().to_string()));
        }

        Classification::Follow(url)
    }

    /// Returns true if the URL's host is the root domain or a subdomain of it
    pub fn is_in_domain(&self, url: &NormalizedUrl) -> bool {
        is_within_domain(&self.root_domain, url.host())
    }
}
