//! Run counters and log setup

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise quiet mode only lets warnings through.
pub fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Counters for a single purge invocation
#[derive(Debug, Default)]
pub struct RunStats {
    requests_issued: AtomicU64,
    rate_limit_waits: AtomicU64,
    pages_fetched: AtomicU64,
    statuses_deleted: AtomicU64,
    favourites_removed: AtomicU64,
    item_failures: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_issued(&self) {
        self.requests_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rate_limited(&self) {
        self.rate_limit_waits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "rate_limit_waits", "Metric incremented");
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn status_deleted(&self) {
        self.statuses_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn favourite_removed(&self) {
        self.favourites_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn item_failed(&self) {
        self.item_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "item_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_issued: self.requests_issued.load(Ordering::Relaxed),
            rate_limit_waits: self.rate_limit_waits.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            statuses_deleted: self.statuses_deleted.load(Ordering::Relaxed),
            favourites_removed: self.favourites_removed.load(Ordering::Relaxed),
            item_failures: self.item_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub requests_issued: u64,
    pub rate_limit_waits: u64,
    pub pages_fetched: u64,
    pub statuses_deleted: u64,
    pub favourites_removed: u64,
    pub item_failures: u64,
}
