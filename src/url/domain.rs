use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use qa_harvest::url::extract_domain;
///
/// let url = Url::parse("https://WWW.BoatUS.com/expert-advice/").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.boatus.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the leading label of a domain identifier
///
/// Used to derive a short site tag, e.g. "marineins" from "marineins.com".
pub fn site_label(domain: &str) -> &str {
    domain.split('.').next().unwrap_or(domain)
}
