#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod frontier;
pub mod parsers;
pub mod pool;
pub mod results;
pub mod scheduler;
pub mod seen;
pub mod utils;
pub mod worker;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::CrawlConfig;
pub use crawlers::{Fetcher, Processor, WebDriverFetcher};
pub use error::{ConfigError, FetchError, ProcessError};
pub use frontier::Frontier;
pub use parsers::LinkExtractor;
pub use pool::WorkerPool;
pub use results::CrawlSummary;
pub use scheduler::Scheduler;
pub use seen::SeenSet;
pub use worker::WorkerStatus;

use filter::{UrlFilter, UrlFilterConfig};

/// Validates `config` and crawls it to completion with the given collaborators
pub async fn crawl<F: Fetcher, P: Processor>(
    config: CrawlConfig,
    fetcher: F,
    processor: P,
) -> Result<CrawlSummary, ConfigError> {
    let scheduler = Scheduler::new(config)?;
    Ok(scheduler.run(fetcher, processor).await)
}

/// Browser-backed fetcher and scoped link extractor for a web crawl
pub fn web_collaborators(
    config: &CrawlConfig,
) -> Result<(WebDriverFetcher, LinkExtractor), ConfigError> {
    let filter = UrlFilter::new(UrlFilterConfig::from_crawl_config(config))?;

    // Override the WebDriver URL with an environment variable if provided
    let webdriver_url = match std::env::var("WEBDRIVER_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => config.webdriver_url.clone(),
    };

    Ok((
        WebDriverFetcher::new(webdriver_url),
        LinkExtractor::new(filter),
    ))
}
