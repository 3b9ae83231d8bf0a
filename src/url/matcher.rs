/// Checks if a host belongs to the site named by a domain filter
///
/// A host matches when it is the filter itself or any subdomain of it:
/// "boatus.com" matches "boatus.com", "www.boatus.com" and
/// "shop.eu.boatus.com", but not "notboatus.com" or "boatus.com.evil.net".
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use qa_harvest::url::matches_domain;
///
/// assert!(matches_domain("www.marineins.com", "marineins.com"));
/// assert!(!matches_domain("marineins.com.example.org", "marineins.com"));
/// ```
pub fn matches_domain(host: &str, filter: &str) -> bool {
    if filter.is_empty() {
        return false;
    }

    host == filter
        || host
            .strip_suffix(filter)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
