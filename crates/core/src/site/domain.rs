//! URL and host helpers shared by the classifier and the registry.

use url::Url;

/// Whether the input is an http(s) URL rather than an id or path.
pub fn is_url(input: &str) -> bool {
    let lower = input.get(..8).unwrap_or(input).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Lowercase host of a URL, `None` if it has none.
pub fn url_domain(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(host.trim_end_matches('.').to_ascii_lowercase())
}

/// Hosts to try when matching: the host itself, then without its first label.
pub(crate) fn host_candidates(host: &str) -> Vec<&str> {
    let mut candidates = vec![host];
    if let Some((_, parent)) = host.split_once('.') {
        if parent.contains('.') {
            candidates.push(parent);
        }
    }
    candidates
}

/// Normalize a configured domain or URL to a bare lowercase host.
pub(crate) fn normalize_domain(value: &str) -> Option<String> {
    let host = if is_url(value) {
        url_domain(value)?
    } else {
        value.trim().trim_end_matches('.').to_ascii_lowercase()
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
