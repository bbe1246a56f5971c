//! Identifier classification.
//!
//! Splits a raw batch entry into the kind of source it names, an optional
//! site hint and the locator used to fetch it.

use serde::{Deserialize, Serialize};

use crate::site::{is_url, url_domain};

use super::IngestError;

/// How an input identifies its torrent and site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    /// `site.id`, or a bare id under the default site.
    ExplicitSite,
    /// Site URL; the site is guessed from its domain.
    UrlByDomain { domain: String },
    /// Plain torrent URL; the site is guessed from the torrent's trackers.
    UrlByTrackers,
    /// Local path or stdin; the site is guessed from the torrent's trackers.
    LocalFile,
}

/// A classified batch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    /// Site name, `None` until resolved.
    pub site: Option<String>,
    /// Site-local id, URL or path.
    pub locator: String,
}

impl ResolvedSource {
    /// Whether the site comes from the decoded tracker list.
    pub fn resolves_by_trackers(&self) -> bool {
        matches!(self.kind, SourceKind::UrlByTrackers | SourceKind::LocalFile)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Classify a remote-mode input (site id or site URL).
///
/// A `.` with at least one character after it splits the input into an
/// explicit site name and a site-local id, overriding `default_site`.
pub fn classify(raw: &str, default_site: &str) -> Result<ResolvedSource, IngestError> {
    if is_url(raw) {
        let domain = url_domain(raw).ok_or(IngestError::DomainParse)?;
        return Ok(ResolvedSource {
            kind: SourceKind::UrlByDomain { domain },
            site: None,
            locator: raw.to_string(),
        });
    }

    match raw.find('.') {
        Some(i) if i < raw.len() - 1 => Ok(ResolvedSource {
            kind: SourceKind::ExplicitSite,
            site: non_empty(&raw[..i]),
            locator: raw[i + 1..].to_string(),
        }),
        _ => Ok(ResolvedSource {
            kind: SourceKind::ExplicitSite,
            site: non_empty(default_site),
            locator: raw.to_string(),
        }),
    }
}

/// Classify a local-mode input (path, `-` for stdin, or plain URL).
pub fn classify_local(raw: &str) -> ResolvedSource {
    let kind = if is_url(raw) {
        SourceKind::UrlByTrackers
    } else {
        SourceKind::LocalFile
    };
    ResolvedSource {
        kind,
        site: None,
        locator: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_site_id() {
        let src = classify("alpha.12345", "").unwrap();
        assert_eq!(src.kind, SourceKind::ExplicitSite);
        assert_eq!(src.site.as_deref(), Some("alpha"));
        assert_eq!(src.locator, "12345");
    }

    #[test]
    fn test_explicit_site_overrides_default() {
        let src = classify("alpha.12345", "beta").unwrap();
        assert_eq!(src.site.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_only_first_dot_splits() {
        let src = classify("alpha.a.b", "").unwrap();
        assert_eq!(src.site.as_deref(), Some("alpha"));
        assert_eq!(src.locator, "a.b");
    }

    #[test]
    fn test_bare_id_uses_default_site() {
        let src = classify("12345", "beta").unwrap();
        assert_eq!(src.kind, SourceKind::ExplicitSite);
        assert_eq!(src.site.as_deref(), Some("beta"));
        assert_eq!(src.locator, "12345");

        let src = classify("12345", "").unwrap();
        assert_eq!(src.site, None);
    }

    #[test]
    fn test_trailing_dot_is_not_a_split() {
        let src = classify("12345.", "beta").unwrap();
        assert_eq!(src.site.as_deref(), Some("beta"));
        assert_eq!(src.locator, "12345.");
    }

    #[test]
    fn test_leading_dot_gives_empty_site() {
        let src = classify(".12345", "beta").unwrap();
        assert_eq!(src.site, None);
        assert_eq!(src.locator, "12345");
    }

    #[test]
    fn test_url_by_domain() {
        let src = classify("https://kp.alpha.example/details.php?id=1", "beta").unwrap();
        assert_eq!(
            src.kind,
            SourceKind::UrlByDomain {
                domain: "kp.alpha.example".to_string()
            }
        );
        assert_eq!(src.site, None);
        assert_eq!(src.locator, "https://kp.alpha.example/details.php?id=1");
    }

    #[test]
    fn test_url_without_domain_fails() {
        assert_eq!(classify("http://", ""), Err(IngestError::DomainParse));
        assert_eq!(classify("https://", "alpha"), Err(IngestError::DomainParse));
    }

    #[test]
    fn test_classify_local() {
        let file = classify_local("./a.torrent");
        assert_eq!(file.kind, SourceKind::LocalFile);
        assert!(file.resolves_by_trackers());

        let stdin = classify_local("-");
        assert_eq!(stdin.kind, SourceKind::LocalFile);

        let url = classify_local("https://cdn.example/a.torrent");
        assert_eq!(url.kind, SourceKind::UrlByTrackers);
        assert!(url.resolves_by_trackers());
    }
}
