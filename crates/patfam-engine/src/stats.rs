//! Cumulative engine counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-lifetime counters, updated by the search service after each
/// request. Relaxed ordering: the counters are independent and only ever
/// read as a snapshot.
#[derive(Debug, Default)]
pub struct EngineStats {
    searches: AtomicU64,
    records_fetched: AtomicU64,
    records_dropped: AtomicU64,
    families_built: AtomicU64,
    orphan_families: AtomicU64,
    source_failures: AtomicU64,
}

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EngineStatsSnapshot {
    pub searches: u64,
    pub records_fetched: u64,
    pub records_dropped: u64,
    pub families_built: u64,
    pub orphan_families: u64,
    pub source_failures: u64,
}

impl EngineStats {
    pub fn record_search(
        &self,
        fetched: u64,
        dropped: u64,
        families: u64,
        orphans: u64,
        failures: u64,
    ) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.records_fetched.fetch_add(fetched, Ordering::Relaxed);
        self.records_dropped.fetch_add(dropped, Ordering::Relaxed);
        self.families_built.fetch_add(families, Ordering::Relaxed);
        self.orphan_families.fetch_add(orphans, Ordering::Relaxed);
        self.source_failures.fetch_add(failures, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            records_fetched: self.records_fetched.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            families_built: self.families_built.load(Ordering::Relaxed),
            orphan_families: self.orphan_families.load(Ordering::Relaxed),
            source_failures: self.source_failures.load(Ordering::Relaxed),
        }
    }
}
