use crate::seen::SeenSet;
use crate::worker::WorkerStatus;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the termination decision reads, kept behind a single lock.
#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<String>,
    seen: SeenSet,
    status: Vec<WorkerStatus>,
}

impl FrontierState {
    fn admit(&mut self, url: &str) -> bool {
        if !self.seen.test_and_insert(url) {
            return false;
        }
        self.pending.push_back(url.to_string());
        true
    }

    fn active_count(&self) -> usize {
        self.status
            .iter()
            .filter(|status| **status == WorkerStatus::Active)
            .count()
    }

    fn is_quiescent(&self) -> bool {
        self.pending.is_empty() && self.active_count() == 0
    }
}

/// Outcome of a worker's attempt to take the next URL
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Claim {
    /// The worker now holds this URL and is marked Active
    Url(String),
    /// Nothing pending, but some worker is still Active and may push more
    Wait,
    /// Nothing pending and every worker is Idle
    Quiescent,
}

/// Shared deduplicating FIFO of URLs awaiting a worker.
///
/// Cloning yields another handle onto the same queue. The queue, the seen-set
/// and the worker status table share one mutex so that "nothing to pop" and
/// "nobody is busy" are observed together.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    state: Arc<Mutex<FrontierState>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `url` unless it was admitted before. Returns whether it was queued.
    pub async fn push(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let mut state = self.state.lock().await;
        let admitted = state.admit(&url);
        if admitted {
            ::log::trace!("Admitted {} ({} pending)", url, state.pending.len());
        } else {
            ::log::trace!("Already seen, not queuing: {}", url);
        }
        admitted
    }

    /// Queues every new URL from `urls` under one lock acquisition.
    /// Returns how many were admitted.
    pub async fn push_all<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut state = self.state.lock().await;
        let mut admitted = 0;
        for url in urls {
            if state.admit(&url) {
                admitted += 1;
            }
        }
        admitted
    }

    /// Removes the oldest pending URL without touching any worker status.
    /// Never waits for work to arrive.
    pub async fn pop(&self) -> Option<String> {
        self.state.lock().await.pending.pop_front()
    }

    /// URLs admitted but not yet popped
    pub async fn size(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Whether `url` was ever admitted during this run
    pub async fn has_seen(&self, url: &str) -> bool {
        self.state.lock().await.seen.contains(url)
    }

    /// Total number of distinct URLs ever admitted
    pub async fn seen_count(&self) -> usize {
        self.state.lock().await.seen.len()
    }

    /// Number of registered workers currently holding a URL
    pub async fn active_count(&self) -> usize {
        self.state.lock().await.active_count()
    }

    /// Adds `count` Idle slots to the status table and returns the first slot index.
    pub(crate) async fn register_workers(&self, count: usize) -> usize {
        let mut state = self.state.lock().await;
        let first = state.status.len();
        state
            .status
            .extend(std::iter::repeat_n(WorkerStatus::Idle, count));
        first
    }

    /// Pops on behalf of worker `slot`.
    ///
    /// On success the worker is marked Active before the lock is released. On
    /// failure it is marked Idle and quiescence is decided from the same
    /// snapshot, so a worker that is about to push cannot be missed.
    pub(crate) async fn claim(&self, slot: usize) -> Claim {
        let mut state = self.state.lock().await;
        match state.pending.pop_front() {
            Some(url) => {
                state.status[slot] = WorkerStatus::Active;
                Claim::Url(url)
            }
            None => {
                state.status[slot] = WorkerStatus::Idle;
                if state.is_quiescent() {
                    Claim::Quiescent
                } else {
                    Claim::Wait
                }
            }
        }
    }

    /// Marks worker `slot` Idle without popping (used when a worker leaves early).
    pub(crate) async fn release(&self, slot: usize) {
        self.state.lock().await.status[slot] = WorkerStatus::Idle;
    }
}
