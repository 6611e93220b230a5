//! Memoizing analysis session over one loaded dataset.
//!
//! Snapshots are keyed by the full [`Selection`]; the store never changes
//! for the lifetime of a session, so a cached snapshot is always current.

use std::collections::HashMap;
use std::sync::Arc;

use crisislab_core::domain::Selection;
use crisislab_core::{analyze, AnalysisSnapshot, TimeSeriesStore};

use crate::data_loader::LoadedDataset;

pub struct AnalysisSession {
    store: TimeSeriesStore,
    dataset_hash: String,
    has_synthetic: bool,
    memo: HashMap<Selection, Arc<AnalysisSnapshot>>,
    hits: u64,
    misses: u64,
}

impl AnalysisSession {
    pub fn new(store: TimeSeriesStore, dataset_hash: impl Into<String>) -> Self {
        Self {
            store,
            dataset_hash: dataset_hash.into(),
            has_synthetic: false,
            memo: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_loaded(loaded: LoadedDataset) -> Self {
        let mut session = Self::new(loaded.store, loaded.dataset_hash);
        session.has_synthetic = loaded.has_synthetic;
        session
    }

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    pub fn dataset_hash(&self) -> &str {
        &self.dataset_hash
    }

    pub fn has_synthetic(&self) -> bool {
        self.has_synthetic
    }

    /// Snapshot for `selection`, computed on first request and shared after.
    pub fn snapshot(&mut self, selection: &Selection) -> Arc<AnalysisSnapshot> {
        if let Some(hit) = self.memo.get(selection) {
            self.hits += 1;
            tracing::debug!(benchmark = %selection.benchmark, "snapshot cache hit");
            return Arc::clone(hit);
        }

        self.misses += 1;
        tracing::debug!(
            benchmark = %selection.benchmark,
            ticker = selection.ticker.as_deref().unwrap_or("-"),
            crisis = selection.crisis.as_ref().map_or("all", |c| c.id()),
            "snapshot cache miss"
        );
        let snapshot = Arc::new(analyze(&self.store, selection));
        self.memo.insert(selection.clone(), Arc::clone(&snapshot));
        snapshot
    }

    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    /// (hits, misses) since the session started.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.memo.clear();
    }
}
