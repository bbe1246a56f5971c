//! Error types for the ingest pipeline.

use thiserror::Error;

use crate::site::SiteError;

/// Per-item failures. Caught at the item boundary and counted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("failed to parse domain")]
    DomainParse,

    /// Soft: logged, then the default site is used.
    #[error("failed to find match site for {target}: {reason}")]
    SiteResolution { target: String, reason: String },

    #[error("no site found or provided")]
    NoSiteAvailable,

    #[error("failed to get torrent: {0}")]
    Acquire(String),

    #[error("failed to parse torrent: {0}")]
    Decode(String),

    #[error("failed to add torrent to client: {0}")]
    ClientAdd(String),
}

impl IngestError {
    pub fn site_resolution(target: impl Into<String>, err: &SiteError) -> Self {
        IngestError::SiteResolution {
            target: target.into(),
            reason: err.to_string(),
        }
    }
}

/// Failures that abort the whole batch, or summarize it.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Mutually exclusive options, detected before any item runs.
    #[error("{0}")]
    ConfigConflict(String),

    #[error("failed to create site {site}: {source}")]
    SiteSetup {
        site: String,
        #[source]
        source: SiteError,
    },

    #[error("{0} errors")]
    ItemsFailed(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_messages() {
        assert_eq!(
            IngestError::NoSiteAvailable.to_string(),
            "no site found or provided"
        );
        assert_eq!(
            IngestError::Decode("bad bencode".into()).to_string(),
            "failed to parse torrent: bad bencode"
        );
        let soft = IngestError::site_resolution("x.example", &SiteError::NotFound("x.example".into()));
        assert_eq!(
            soft.to_string(),
            "failed to find match site for x.example: no matching site for x.example"
        );
    }

    #[test]
    fn test_batch_error_messages() {
        assert_eq!(BatchError::ItemsFailed(3).to_string(), "3 errors");
        let err = BatchError::SiteSetup {
            site: "alpha".into(),
            source: SiteError::UnknownSite("alpha".into()),
        };
        assert_eq!(
            err.to_string(),
            "failed to create site alpha: site alpha is not configured"
        );
    }
}
