use url::Url;

/// Checks whether `host` is the root domain or one of its subdomains
///
/// Both arguments are expected to be lowercase.
///
/// # Examples
///
/// ```
/// use site_ingest::url::is_within_domain;
///
/// assert!(is_within_domain("example.edu", "example.edu"));
/// assert!(is_within_domain("example.edu", "library.example.edu"));
/// assert!(!is_within_domain("example.edu", "notexample.edu"));
/// ```
pub fn is_within_domain(root: &str, host: &str) -> bool {
    if root.is_empty() {
        return false;
    }
    host == root
        || host
            .strip_suffix(root)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Derives the crawl's root domain from the seed URL
///
/// The host is lowercased and a leading `www.` is dropped so that sibling
/// subdomains of the site stay in scope.
pub fn root_domain_of(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let root = host.strip_prefix("www.").unwrap_or(&host);
    if root.is_empty() {
        None
    } else {
        Some(root.to_string())
    }
}
