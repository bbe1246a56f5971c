//! Add-option synthesis.

use crate::site::{site_tag, SiteSettings, HNR_TAG};
use crate::torrent_client::AddOption;

use super::IngestOptions;

/// Category used by auto-category when neither a site nor a fixed category exists.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Category for an item resolved to `site` (empty when unresolved).
pub fn category_for(options: &IngestOptions, site: &str) -> String {
    if !options.category_auto {
        return options.category.clone();
    }
    if !site.is_empty() {
        site.to_string()
    } else if !options.category.is_empty() {
        options.category.clone()
    } else {
        FALLBACK_CATEGORY.to_string()
    }
}

/// Tags for an item: site tag, then the HnR marker, then the fixed tags.
pub fn tags_for(options: &IngestOptions, site: &str, settings: Option<SiteSettings>) -> Vec<String> {
    let mut tags = Vec::with_capacity(options.tags.len() + 2);
    if !site.is_empty() {
        tags.push(site_tag(site));
        if settings.is_some_and(|s| s.global_hnr) {
            tags.push(HNR_TAG.to_string());
        }
    }
    tags.extend(options.tags.iter().cloned());
    tags
}

/// Build the full option record for one item.
pub fn synthesize(options: &IngestOptions, site: &str, settings: Option<SiteSettings>) -> AddOption {
    AddOption {
        pause: options.pause,
        save_path: options.save_path.clone(),
        skip_checking: options.skip_checking,
        sequential_download: options.sequential_download,
        category: category_for(options, site),
        tags: tags_for(options, site, settings),
        rename_to: options.rename_to.clone(),
    }
}
