use crate::UrlError;
use std::fmt;
use url::Url;

/// A URL usable as a deduplication key
///
/// Normalization rules:
///
/// 1. Parse the URL; reject if malformed
/// 2. Only `http` and `https` schemes are accepted
/// 3. A host is required (the parser lowercases it)
/// 4. The fragment is removed
///
/// Two URLs differing only by fragment normalize to the same value. Query
/// strings and paths are kept verbatim; they are part of the page identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Parses and normalizes a URL string
    ///
    /// # Examples
    ///
    /// ```
    /// use site_ingest::url::NormalizedUrl;
    ///
    /// let url = NormalizedUrl::parse("https://EXAMPLE.com/page#intro").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/page");
    /// ```
    pub fn parse(url_str: &str) -> Result<Self, UrlError> {
        let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Normalizes an already parsed URL
    pub fn from_url(mut url: Url) -> Result<Self, UrlError> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                url.scheme()
            )));
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(UrlError::MissingDomain),
        }

        url.set_fragment(None);
        Ok(Self(url))
    }

    /// Resolves `href` against this URL and normalizes the result
    pub fn join(&self, href: &str) -> Result<Self, UrlError> {
        let joined = self
            .0
            .join(href.trim())
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(joined)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lowercase host of the URL
    pub fn host(&self) -> &str {
        // from_url guarantees a host
        self.0.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
