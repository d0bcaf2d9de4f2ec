use crate::crawlers::{Fetcher, Processor};
use crate::frontier::{Claim, Frontier};
use crate::results::CrawlStats;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Busy flag a worker publishes in the frontier's status table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Holds a dequeued URL and may still push discoveries
    Active,
    /// Waiting for work, or done
    Idle,
}

/// Why a worker left its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitReason {
    /// Nothing pending and no worker busy
    Quiescent,
    /// The run's token was cancelled before quiescence was observed
    Cancelled,
}

/// What a worker reports back to its pool once it has exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerReport {
    pub(crate) handled: usize,
    pub(crate) exit: ExitReason,
}

#[derive(Debug, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Fetching(String),
    Exited(ExitReason),
}

/// One crawl loop bound to a slot in the frontier's status table
pub(crate) struct Worker<F, P> {
    slot: usize,
    frontier: Frontier,
    fetcher: Arc<F>,
    processor: Arc<P>,
    poll_backoff: Duration,
    cancel: CancellationToken,
    stats: Arc<CrawlStats>,
}

impl<F: Fetcher, P: Processor> Worker<F, P> {
    pub(crate) fn new(
        slot: usize,
        frontier: Frontier,
        fetcher: Arc<F>,
        processor: Arc<P>,
        poll_backoff: Duration,
        cancel: CancellationToken,
        stats: Arc<CrawlStats>,
    ) -> Self {
        Self {
            slot,
            frontier,
            fetcher,
            processor,
            poll_backoff,
            cancel,
            stats,
        }
    }

    /// Runs until the frontier is quiescent or the run is cancelled
    pub(crate) async fn run(self) -> WorkerReport {
        ::log::debug!("Worker {} starting processing loop", self.slot);

        let mut handled = 0;
        let mut state = WorkerState::Idle;
        let exit = loop {
            state = match state {
                WorkerState::Idle => self.poll().await,
                WorkerState::Fetching(url) => {
                    self.crawl(url).await;
                    handled += 1;
                    // Still Active here: the next claim is what flips the status
                    self.poll().await
                }
                WorkerState::Exited(exit) => break exit,
            };
        };

        ::log::info!(
            "Worker {} exited ({:?}) after {} URLs",
            self.slot,
            exit,
            handled
        );
        WorkerReport { handled, exit }
    }

    /// Tries to take the next URL, deciding between work, backoff and exit
    async fn poll(&self) -> WorkerState {
        if self.cancel.is_cancelled() {
            self.frontier.release(self.slot).await;
            ::log::debug!("Worker {} stopping on cancellation", self.slot);
            return WorkerState::Exited(ExitReason::Cancelled);
        }

        match self.frontier.claim(self.slot).await {
            Claim::Url(url) => {
                ::log::trace!("Worker {} claimed: {}", self.slot, url);
                WorkerState::Fetching(url)
            }
            Claim::Quiescent => {
                ::log::debug!("Worker {} found no pending or in-flight work", self.slot);
                WorkerState::Exited(ExitReason::Quiescent)
            }
            Claim::Wait => {
                ::log::trace!(
                    "Worker {} idle, retrying in {:?}",
                    self.slot,
                    self.poll_backoff
                );
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.poll_backoff) => {}
                }
                WorkerState::Idle
            }
        }
    }

    /// Handles one URL in its own task so a panicking collaborator only costs that URL
    async fn crawl(&self, url: String) {
        let task = tokio::spawn(crawl_url(
            self.slot,
            url.clone(),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.processor),
            self.frontier.clone(),
            self.cancel.clone(),
            Arc::clone(&self.stats),
        ));

        if let Err(e) = task.await {
            ::log::error!("Worker {} crashed while handling {}: {}", self.slot, url, e);
            self.stats.record_process_failure();
        }
    }
}

/// Fetches `url`, extracts its links and queues the new ones
async fn crawl_url<F: Fetcher, P: Processor>(
    slot: usize,
    url: String,
    fetcher: Arc<F>,
    processor: Arc<P>,
    frontier: Frontier,
    cancel: CancellationToken,
    stats: Arc<CrawlStats>,
) {
    let started = Instant::now();
    ::log::debug!("Worker {} fetching: {}", slot, url);

    let fetched = tokio::select! {
        _ = cancel.cancelled() => {
            ::log::debug!("Worker {} abandoned {} on cancellation", slot, url);
            return;
        }
        result = fetcher.fetch(&url) => result,
    };

    let content = match fetched {
        Ok(content) => content,
        Err(e) => {
            ::log::warn!("Worker {} dropping {}: {}", slot, url, e);
            stats.record_fetch_failure();
            return;
        }
    };
    stats.record_fetched();

    let links = match processor.process(&url, &content).await {
        Ok(links) => links,
        Err(e) => {
            ::log::warn!("Worker {} failed to process {}: {}", slot, url, e);
            stats.record_process_failure();
            return;
        }
    };

    let discovered = links.len();
    let admitted = frontier.push_all(links).await;
    stats.record_links(discovered, admitted);

    ::log::debug!(
        "Worker {} processed {} in {:.2} seconds: {} links, {} new",
        slot,
        url,
        started.elapsed().as_secs_f64(),
        discovered,
        admitted
    );
}
