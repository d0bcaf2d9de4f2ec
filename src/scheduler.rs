use crate::config::CrawlConfig;
use crate::crawlers::{Fetcher, Processor};
use crate::error::ConfigError;
use crate::frontier::Frontier;
use crate::pool::WorkerPool;
use crate::results::CrawlSummary;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Seeds a fresh frontier, runs a worker pool over it and waits for it to finish
pub struct Scheduler {
    config: CrawlConfig,
    cancel: CancellationToken,
}

impl Scheduler {
    /// Validates `config`; nothing is started if it is rejected
    pub fn new(config: CrawlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Cancelling `cancel` stops any run of this scheduler
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls from the configured seeds until quiescence, cancellation or timeout
    pub async fn run<F: Fetcher, P: Processor>(&self, fetcher: F, processor: P) -> CrawlSummary {
        let frontier = Frontier::new();
        let mut seeded = 0;
        for url in &self.config.seed_urls {
            if frontier.push(url.as_str()).await {
                seeded += 1;
            }
        }
        ::log::info!(
            "Seeded frontier with {} distinct URLs ({} given)",
            seeded,
            self.config.seed_urls.len()
        );

        // A timeout only ends this run, not the caller's token
        let run_token = self.cancel.child_token();
        let deadline = self
            .config
            .total_timeout()
            .map(|limit| spawn_deadline(limit, run_token.clone()));

        let mut pool = WorkerPool::new(frontier, Arc::new(fetcher), Arc::new(processor))
            .with_poll_backoff(self.config.poll_backoff())
            .with_cancellation(run_token);
        pool.start(self.config.pool_size).await;
        let summary = pool.await_completion().await;

        if let Some(deadline) = deadline {
            deadline.abort();
        }

        ::log::info!(
            "Crawl finished in {:.2} seconds: {} fetched, {} fetch failures, {} process failures",
            Duration::from_millis(summary.elapsed_ms).as_secs_f64(),
            summary.fetched,
            summary.fetch_failures,
            summary.process_failures
        );
        summary
    }
}

/// Cancels `cancel` once `limit` has elapsed
fn spawn_deadline(limit: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(limit) => {
                ::log::info!("Total timeout of {:?} reached, cancelling crawl", limit);
                cancel.cancel();
            }
        }
    })
}
