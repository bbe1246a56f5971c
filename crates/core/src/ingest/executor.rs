//! Batch execution.
//!
//! Items are processed one at a time in input order. Per-item failures are
//! reported and counted; only option conflicts and site setup failures abort
//! the batch.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use crate::site::{is_url, Site, SiteCatalog, SiteSettings};
use crate::torrent::{
    LibrqbitDecoder, TorrentDecoder, TorrentMetadata, TorrentParseError, MAX_META_VERSION,
};
use crate::torrent_client::{AddTorrentRequest, TorrentClient};

use super::acquirer::{
    acquire_local, acquire_remote, acquire_url, is_processed, HttpFetcher, UrlFetcher,
    ADDED_SUFFIX, STDIN_SENTINEL,
};
use super::classifier::{classify, classify_local, ResolvedSource, SourceKind};
use super::report::{BatchOutcome, ItemReport, ItemResult, ItemStage};
use super::resolver::SiteResolverCache;
use super::synthesizer::synthesize;
use super::{BatchError, IngestError, IngestMode, IngestOptions};

/// Called once per finished item, in input order.
pub type ReportCallback = Arc<dyn Fn(&ItemReport) + Send + Sync>;

/// Runs a batch of inputs through classify, resolve, acquire, decode,
/// synthesize and submit.
pub struct BatchExecutor {
    client: Arc<dyn TorrentClient>,
    catalog: Arc<dyn SiteCatalog>,
    decoder: Arc<dyn TorrentDecoder>,
    fetcher: Arc<dyn UrlFetcher>,
    options: IngestOptions,
    on_report: Option<ReportCallback>,
}

/// Failure carried out of one item's pipeline.
struct ItemFailure {
    stage: ItemStage,
    error: IngestError,
    content_path: Option<String>,
}

impl ItemFailure {
    fn at(stage: ItemStage, error: IngestError) -> Self {
        Self {
            stage,
            error,
            content_path: None,
        }
    }

    fn with_content_path(mut self, path: &str) -> Self {
        self.content_path = Some(path.to_string());
        self
    }
}

/// Successful item: report fields plus the size to account.
struct ItemAdded {
    info_hash: String,
    content_path: String,
    size: u64,
}

fn decode_error(e: TorrentParseError) -> IngestError {
    match e {
        TorrentParseError::ParseError(msg) => IngestError::Decode(msg),
        other => IngestError::Decode(other.to_string()),
    }
}

fn non_empty(site: String) -> Option<String> {
    if site.is_empty() {
        None
    } else {
        Some(site)
    }
}

impl BatchExecutor {
    pub fn new(
        client: Arc<dyn TorrentClient>,
        catalog: Arc<dyn SiteCatalog>,
        options: IngestOptions,
    ) -> Self {
        Self {
            client,
            catalog,
            decoder: Arc::new(LibrqbitDecoder),
            fetcher: Arc::new(HttpFetcher::default()),
            options,
            on_report: None,
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn TorrentDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn UrlFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_report_callback(mut self, callback: ReportCallback) -> Self {
        self.on_report = Some(callback);
        self
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    fn emit(&self, report: &ItemReport) {
        if report.is_success() {
            debug!(locator = %report.locator, site = ?report.site, "Item added");
        } else {
            debug!(locator = %report.locator, site = ?report.site, result = ?report.result, "Item failed");
        }
        if let Some(callback) = &self.on_report {
            callback(report);
        }
    }

    /// Ingest site ids (`site.id` or bare ids) and site URLs.
    pub async fn run_remote(&self, inputs: &[String]) -> Result<BatchOutcome, BatchError> {
        self.options.validate(IngestMode::Remote, inputs.len())?;
        info!(
            client = self.client.name(),
            items = inputs.len(),
            "Starting remote ingest"
        );

        let mut resolver = SiteResolverCache::new();
        let mut sites: HashMap<String, Arc<dyn Site>> = HashMap::new();
        let mut outcome = BatchOutcome::default();

        for raw in inputs {
            let mut source = None;
            let result = self
                .remote_item(raw, &mut resolver, &mut sites, &mut source)
                .await?;
            let (report, size) = self.finish(None, source, raw, result);
            outcome.record(&report, size);
            self.emit(&report);
        }

        info!(
            added = outcome.items_added,
            failed = outcome.items_failed,
            domains = resolver.len(),
            "Remote ingest finished"
        );
        Ok(outcome)
    }

    /// One remote item. `Err` only for batch-fatal failures.
    ///
    /// `slot` receives the classified source, with its site filled in once
    /// resolved; it stays `None` when classification fails.
    async fn remote_item(
        &self,
        raw: &str,
        resolver: &mut SiteResolverCache,
        sites: &mut HashMap<String, Arc<dyn Site>>,
        slot: &mut Option<ResolvedSource>,
    ) -> Result<Result<ItemAdded, ItemFailure>, BatchError> {
        let default_site = self.options.default_site.as_str();

        let source = match classify(raw, default_site) {
            Ok(source) => slot.insert(source),
            Err(e) => return Ok(Err(ItemFailure::at(ItemStage::Pending, e))),
        };

        let site = match &source.kind {
            SourceKind::UrlByDomain { domain } => {
                let guessed = resolver.resolve(self.catalog.as_ref(), domain, default_site);
                if guessed.is_empty() {
                    warn!(
                        url = %source.locator,
                        "url does not match any site, will use provided default site"
                    );
                    default_site.to_string()
                } else {
                    guessed
                }
            }
            _ => source.site.clone().unwrap_or_default(),
        };
        source.site = non_empty(site.clone());
        if site.is_empty() {
            return Ok(Err(ItemFailure::at(
                ItemStage::Classified,
                IngestError::NoSiteAvailable,
            )));
        }

        let instance = match sites.get(&site) {
            Some(instance) => Arc::clone(instance),
            None => {
                let instance = self
                    .catalog
                    .create_site(&site)
                    .map_err(|source| BatchError::SiteSetup {
                        site: site.clone(),
                        source,
                    })?;
                sites.insert(site.clone(), Arc::clone(&instance));
                instance
            }
        };

        let bytes = match acquire_remote(instance.as_ref(), &source.locator).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Err(ItemFailure::at(ItemStage::SiteResolved, e))),
        };

        Ok(self
            .decode_and_submit(bytes, None, &site, Some(instance.settings()))
            .await)
    }

    /// Ingest local files, `-` for stdin, and plain torrent URLs.
    pub async fn run_local(&self, inputs: &[String]) -> Result<BatchOutcome, BatchError> {
        self.options.validate(IngestMode::Local, inputs.len())?;
        info!(
            client = self.client.name(),
            items = inputs.len(),
            "Starting local ingest"
        );

        let total = inputs.len();
        let mut outcome = BatchOutcome::default();

        for (i, raw) in inputs.iter().enumerate() {
            if is_processed(raw) {
                trace!(file = %raw, "Skipping already processed file");
                outcome.record_skipped();
                continue;
            }

            let mut source = classify_local(raw);
            let result = self.local_item(&mut source).await;
            let added = result.is_ok();
            let (report, size) = self.finish(Some((i + 1, total)), Some(source), raw, result);
            outcome.record(&report, size);
            self.emit(&report);

            if added && raw != STDIN_SENTINEL && !is_url(raw) {
                self.after_added(raw).await;
            }
        }

        info!(
            added = outcome.items_added,
            failed = outcome.items_failed,
            skipped = outcome.items_skipped,
            "Local ingest finished"
        );
        Ok(outcome)
    }

    /// One local item. The site resolved from the trackers is stored in
    /// `source.site`.
    async fn local_item(&self, source: &mut ResolvedSource) -> Result<ItemAdded, ItemFailure> {
        let locator = source.locator.clone();
        let bytes = match source.kind {
            SourceKind::UrlByTrackers => acquire_url(self.fetcher.as_ref(), &locator).await,
            _ => acquire_local(&locator).await,
        }
        .map_err(|e| ItemFailure::at(ItemStage::Classified, e))?;

        let metadata = self
            .decoder
            .decode(&bytes, MAX_META_VERSION)
            .map_err(|e| ItemFailure::at(ItemStage::Acquired, decode_error(e)))?;

        let default_site = self.options.default_site.as_str();
        let mut site = SiteResolverCache::resolve_by_trackers(
            self.catalog.as_ref(),
            &locator,
            &metadata.trackers,
            default_site,
        );
        if site.is_empty() {
            site = default_site.to_string();
        }
        source.site = non_empty(site.clone());

        let settings = if site.is_empty() {
            None
        } else {
            self.catalog.site_settings(&site)
        };

        let filename = Path::new(&locator)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|_| source.kind == SourceKind::LocalFile && locator != STDIN_SENTINEL)
            .map(str::to_string);

        self.submit(bytes, filename, metadata, &site, settings).await
    }

    async fn decode_and_submit(
        &self,
        bytes: Vec<u8>,
        filename: Option<String>,
        site: &str,
        settings: Option<SiteSettings>,
    ) -> Result<ItemAdded, ItemFailure> {
        let metadata = self
            .decoder
            .decode(&bytes, MAX_META_VERSION)
            .map_err(|e| ItemFailure::at(ItemStage::Acquired, decode_error(e)))?;
        self.submit(bytes, filename, metadata, site, settings).await
    }

    async fn submit(
        &self,
        bytes: Vec<u8>,
        filename: Option<String>,
        metadata: TorrentMetadata,
        site: &str,
        settings: Option<SiteSettings>,
    ) -> Result<ItemAdded, ItemFailure> {
        let options = synthesize(&self.options, site, settings);
        debug!(
            info_hash = %metadata.info_hash,
            category = %options.category,
            tags = ?options.tags,
            "Submitting torrent"
        );

        let mut request = AddTorrentRequest::new(bytes, options);
        if let Some(filename) = filename {
            request = request.with_filename(filename);
        }

        match self.client.add_torrent(request).await {
            Ok(_) => Ok(ItemAdded {
                info_hash: metadata.info_hash,
                content_path: metadata.content_path,
                size: metadata.total_size,
            }),
            Err(e) => Err(ItemFailure::at(
                ItemStage::OptionBuilt,
                IngestError::ClientAdd(e.to_string()),
            )
            .with_content_path(&metadata.content_path)),
        }
    }

    /// Build the report for one item. Without a classified source the raw
    /// input stands in as the locator.
    fn finish(
        &self,
        position: Option<(usize, usize)>,
        source: Option<ResolvedSource>,
        raw: &str,
        result: Result<ItemAdded, ItemFailure>,
    ) -> (ItemReport, u64) {
        let (result, size) = match result {
            Ok(added) => (
                ItemResult::Added {
                    info_hash: added.info_hash,
                    content_path: added.content_path,
                },
                added.size,
            ),
            Err(failure) => (
                ItemResult::Failed {
                    stage: failure.stage,
                    error: failure.error,
                    content_path: failure.content_path,
                },
                0,
            ),
        };
        let (site, locator) = match source {
            Some(source) => (source.site, source.locator),
            None => (None, raw.to_string()),
        };
        let report = ItemReport {
            position,
            site,
            locator,
            result,
        };
        (report, size)
    }

    /// Rename or delete a successfully added local file.
    async fn after_added(&self, path: &str) {
        if self.options.rename_added {
            let target = format!("{}{}", path, ADDED_SUFFIX);
            if let Err(e) = tokio::fs::rename(path, &target).await {
                debug!(file = %path, error = %e, "Failed to rename added torrent file");
            }
        } else if self.options.delete_added {
            if let Err(e) = tokio::fs::remove_file(path).await {
                debug!(file = %path, error = %e, "Failed to delete added torrent file");
            }
        }
    }
}
