use clap::Parser;
use crawl_frontier::CrawlConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "crawl-frontier")]
#[command(about = "Crawls outward from seed URLs with a pool of workers until no work remains")]
#[command(version)]
pub struct Args {
    /// Seed URLs (added to any seeds from --config)
    pub seeds: Vec<String>,

    /// Path to a JSON crawl configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Milliseconds an idle worker waits before polling for work again
    #[arg(long)]
    pub poll_backoff_ms: Option<u64>,

    /// Total timeout in seconds (maximum runtime)
    #[arg(long)]
    pub total_timeout: Option<u64>,

    /// WebDriver server URL
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Follow links to domains other than the seeds'
    #[arg(long)]
    pub allow_external: bool,

    /// Only follow links whose path starts with this prefix
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Applies command-line overrides on top of `base`
    pub fn apply_to(&self, mut base: CrawlConfig) -> CrawlConfig {
        base.seed_urls.extend(self.seeds.iter().cloned());
        if let Some(concurrency) = self.concurrency {
            base.pool_size = concurrency;
        }
        if let Some(poll_backoff_ms) = self.poll_backoff_ms {
            base.poll_backoff_ms = poll_backoff_ms;
        }
        if let Some(total_timeout) = self.total_timeout {
            base.total_timeout_secs = Some(total_timeout);
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            base.webdriver_url = webdriver_url.clone();
        }
        base.allow_external |= self.allow_external;
        if let Some(path_prefix) = &self.path_prefix {
            base.path_prefix = Some(path_prefix.clone());
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let args = Args::parse_from([
            "crawl-frontier",
            "https://example.com/",
            "-c",
            "8",
            "--total-timeout",
            "60",
            "--path-prefix",
            "/blog/",
        ]);
        let config = args.apply_to(CrawlConfig::new(["https://example.org/"]));

        assert_eq!(
            config.seed_urls,
            vec!["https://example.org/", "https://example.com/"]
        );
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.total_timeout_secs, Some(60));
        assert_eq!(config.poll_backoff_ms, 100);
        assert!(!config.allow_external);
        assert_eq!(config.path_prefix.as_deref(), Some("/blog/"));
    }
}
