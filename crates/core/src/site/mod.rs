//! Site catalog.
//!
//! Sites are tracker communities configured under `[[sites]]`. The catalog
//! answers two questions for the ingest pipeline: which site a domain or
//! tracker list belongs to, and how to download a torrent from a site.

mod domain;
mod http;
mod registry;
mod types;

pub use domain::{is_url, url_domain};
pub(crate) use domain::host_candidates;
pub use http::HttpSite;
pub use registry::SiteRegistry;
pub use types::*;
