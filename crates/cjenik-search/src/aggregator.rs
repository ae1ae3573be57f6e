//! Concurrent search across every configured chain.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use cjenik_catalog::RawTable;
use cjenik_core::{AppConfig, MatchRecord, SearchOutcome, SourceSchema};
use cjenik_source::SourceReader;

use crate::cache::SnapshotCache;
use crate::pipeline::{search_source, BranchOutput};
use crate::query::{Query, QueryKind};

/// Tunables for one [`Aggregator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Upper bound on a single snapshot fetch, retries included.
    pub fetch_timeout: Duration,
    /// How long a parsed snapshot is reused. Zero disables the cache.
    pub cache_ttl: Duration,
    /// Sources processed at once; `0` means all of them.
    pub max_concurrent_sources: usize,
    /// Drop records without an effective price from the ranked output.
    pub require_price: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
            max_concurrent_sources: 0,
            require_price: false,
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            max_concurrent_sources: config.max_concurrent_sources,
            require_price: false,
        }
    }
}

/// Runs queries against a fixed set of chains through one [`SourceReader`].
///
/// Chains are immutable for the aggregator's lifetime; every search resolves
/// headers afresh, so concurrent searches share nothing but the snapshot
/// cache.
pub struct Aggregator<R> {
    reader: R,
    chains: Arc<[SourceSchema]>,
    cache: SnapshotCache<RawTable>,
    settings: SearchSettings,
}

impl<R: SourceReader> Aggregator<R> {
    pub fn new(
        reader: R,
        chains: impl Into<Arc<[SourceSchema]>>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            reader,
            chains: chains.into(),
            cache: SnapshotCache::new(settings.cache_ttl),
            settings,
        }
    }

    #[must_use]
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Forgets every cached snapshot so the next search refetches.
    pub fn invalidate_cache(&self) {
        self.cache.clear();
    }

    /// Searches every chain concurrently and returns the ranked, deduplicated
    /// records plus per-chain diagnostics.
    ///
    /// A failing chain never fails the search. Dropping the returned future
    /// cancels every in-flight branch.
    pub async fn search(&self, query: &Query) -> SearchOutcome {
        let slots = match self.settings.max_concurrent_sources {
            0 => self.chains.len().max(1),
            n => n,
        };
        tracing::debug!(
            chains = self.chains.len(),
            slots,
            barcode = matches!(query.kind(), QueryKind::Barcode(_)),
            "search started"
        );

        let mut branches: Vec<(usize, BranchOutput)> = stream::iter(self.chains.iter().enumerate())
            .map(|(position, chain)| async move {
                let output = search_source(
                    &self.reader,
                    &self.cache,
                    self.settings.fetch_timeout,
                    chain,
                    query,
                )
                .await;
                (position, output)
            })
            .buffer_unordered(slots)
            .collect()
            .await;
        branches.sort_by_key(|(position, _)| *position);

        let mut records = Vec::new();
        let mut diagnostics = Vec::new();
        for (_, branch) in branches {
            records.extend(branch.records);
            diagnostics.extend(branch.diagnostics);
        }

        let hits = records.len();
        let records = rank_records(records, self.settings.require_price);
        tracing::info!(
            hits,
            ranked = records.len(),
            diagnostics = diagnostics.len(),
            "search finished"
        );

        SearchOutcome {
            records,
            diagnostics,
            terms_ignored: query.terms_ignored(),
        }
    }
}

/// Ascending by effective price; unpriced records last.
fn by_price(a: &MatchRecord, b: &MatchRecord) -> Ordering {
    match (a.effective_price, b.effective_price) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Identity of a product within one chain. Rows without a code fall back to
/// their name.
fn dedup_key(record: &MatchRecord) -> (String, bool, String) {
    if record.code.is_empty() {
        (record.chain.clone(), false, record.name.clone())
    } else {
        (record.chain.clone(), true, record.code.clone())
    }
}

/// Stable-sorts `records` by price and keeps the cheapest record per
/// (chain, code).
///
/// With `require_price`, unpriced records are dropped first.
#[must_use]
pub fn rank_records(mut records: Vec<MatchRecord>, require_price: bool) -> Vec<MatchRecord> {
    if require_price {
        records.retain(|r| r.effective_price.is_some());
    }
    records.sort_by(by_price);

    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(dedup_key(r)));
    records
}
