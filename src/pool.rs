use crate::crawlers::{Fetcher, Processor};
use crate::frontier::Frontier;
use crate::results::{CrawlStats, CrawlSummary};
use crate::worker::{ExitReason, Worker, WorkerReport};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long an idle worker waits before polling the frontier again
pub const DEFAULT_POLL_BACKOFF: Duration = Duration::from_millis(100);

/// A fixed set of workers draining one frontier until it goes quiescent.
///
/// A pool runs once: after `await_completion` returns, URLs pushed to the
/// frontier stay there until a new pool is started on it.
pub struct WorkerPool<F, P> {
    frontier: Frontier,
    fetcher: Arc<F>,
    processor: Arc<P>,
    poll_backoff: Duration,
    cancel: CancellationToken,
    stats: Arc<CrawlStats>,
    workers: Vec<JoinHandle<WorkerReport>>,
    started_at: Option<Instant>,
}

impl<F: Fetcher, P: Processor> WorkerPool<F, P> {
    pub fn new(frontier: Frontier, fetcher: Arc<F>, processor: Arc<P>) -> Self {
        Self {
            frontier,
            fetcher,
            processor,
            poll_backoff: DEFAULT_POLL_BACKOFF,
            cancel: CancellationToken::new(),
            stats: Arc::new(CrawlStats::new()),
            workers: Vec::new(),
            started_at: None,
        }
    }

    pub fn with_poll_backoff(mut self, poll_backoff: Duration) -> Self {
        self.poll_backoff = poll_backoff;
        self
    }

    /// Uses an externally owned token; cancelling it stops every worker
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn stats(&self) -> Arc<CrawlStats> {
        Arc::clone(&self.stats)
    }

    /// Spawns `count` workers. A pool that was already started is left untouched.
    pub async fn start(&mut self, count: usize) {
        if self.started_at.is_some() {
            ::log::warn!("Worker pool already started, ignoring start({})", count);
            return;
        }
        self.started_at = Some(Instant::now());

        let first_slot = self.frontier.register_workers(count).await;
        for slot in first_slot..first_slot + count {
            ::log::trace!("Spawning worker {}", slot);
            let worker = Worker::new(
                slot,
                self.frontier.clone(),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.processor),
                self.poll_backoff,
                self.cancel.clone(),
                Arc::clone(&self.stats),
            );
            self.workers.push(tokio::spawn(worker.run()));
        }

        ::log::info!("Started {} workers", count);
    }

    /// Waits for every worker to exit and joins them.
    ///
    /// The summary counts as cancelled only if some worker stopped on
    /// cancellation; a token cancelled after quiescence changes nothing.
    pub async fn await_completion(&mut self) -> CrawlSummary {
        let num_workers = self.workers.len();
        let mut handled = 0;
        let mut cancelled = false;

        for (completed, worker) in self.workers.drain(..).enumerate() {
            match worker.await {
                Ok(report) => {
                    handled += report.handled;
                    cancelled |= report.exit == ExitReason::Cancelled;
                }
                Err(e) => ::log::error!("Worker task failed: {}", e),
            }
            ::log::debug!(
                "Worker completed. {} of {} workers done.",
                completed + 1,
                num_workers
            );
        }

        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        let pending = self.frontier.size().await;

        ::log::info!(
            "All {} workers have completed: {} URLs handled, {} left pending",
            num_workers,
            handled,
            pending
        );

        self.stats.summarize(pending, cancelled, elapsed)
    }

    /// Workers on this pool's frontier currently holding a URL
    pub async fn active_count(&self) -> usize {
        self.frontier.active_count().await
    }
}
