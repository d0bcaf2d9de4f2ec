use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counters shared by all workers of a pool
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    process_failures: AtomicUsize,
    discovered: AtomicUsize,
    admitted: AtomicUsize,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_process_failure(&self) {
        self.process_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one processed page: `discovered` links returned, `admitted` of them new
    pub fn record_links(&self, discovered: usize, admitted: usize) {
        self.discovered.fetch_add(discovered, Ordering::Relaxed);
        self.admitted.fetch_add(admitted, Ordering::Relaxed);
    }

    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> usize {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn process_failures(&self) -> usize {
        self.process_failures.load(Ordering::Relaxed)
    }

    /// Builds the final report once all workers have been joined
    pub fn summarize(&self, pending: usize, cancelled: bool, elapsed: Duration) -> CrawlSummary {
        CrawlSummary {
            fetched: self.fetched(),
            fetch_failures: self.fetch_failures(),
            process_failures: self.process_failures(),
            discovered: self.discovered.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            pending,
            cancelled,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// Pages fetched successfully
    pub fetched: usize,

    pub fetch_failures: usize,

    /// Pages whose content could not be processed (includes contained panics)
    pub process_failures: usize,

    /// Links returned by the processor, duplicates included
    pub discovered: usize,

    /// Discovered links that were new to the frontier
    pub admitted: usize,

    /// URLs left in the frontier when the pool stopped
    pub pending: usize,

    /// Whether the run was stopped by cancellation or the total timeout
    pub cancelled: bool,

    pub elapsed_ms: u64,
}
