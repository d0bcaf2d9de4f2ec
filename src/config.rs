use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for one crawl run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URLs pushed onto the frontier before the pool starts
    #[serde(default)]
    pub seed_urls: Vec<String>,

    /// Number of workers
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// How long an idle worker sleeps before polling again, in milliseconds
    #[serde(default = "default_poll_backoff_ms")]
    pub poll_backoff_ms: u64,

    /// Wall-clock limit for the whole run; the crawl is cancelled when it expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_timeout_secs: Option<u64>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to follow links leaving the seeds' domains
    #[serde(default)]
    pub allow_external: bool,

    /// Path every followed link must start with. When unset and external links
    /// are disallowed, the seeds' common directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,

    /// Regex patterns for URLs to include
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Default value for pool_size
fn default_pool_size() -> usize {
    4
}

/// Default value for poll_backoff_ms
fn default_poll_backoff_ms() -> u64 {
    100
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_urls: Vec::new(),
            pool_size: default_pool_size(),
            poll_backoff_ms: default_poll_backoff_ms(),
            total_timeout_secs: None,
            webdriver_url: default_webdriver_url(),
            allow_external: false,
            path_prefix: None,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl CrawlConfig {
    /// Create a configuration with default values for the given seeds
    pub fn new<I, S>(seed_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seed_urls: seed_urls.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn poll_backoff(&self) -> Duration {
        Duration::from_millis(self.poll_backoff_ms)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout_secs.map(Duration::from_secs)
    }

    /// Checks every setting a run depends on, before anything is started
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(self.pool_size));
        }
        if self.poll_backoff_ms == 0 {
            return Err(ConfigError::ZeroPollBackoff);
        }
        for pattern in self.include_patterns.iter().chain(&self.exclude_patterns) {
            if let Err(source) = Regex::new(pattern) {
                return Err(ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                });
            }
        }
        Ok(())
    }
}
