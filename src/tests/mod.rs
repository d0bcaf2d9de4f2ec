//! Whole-pool scenarios driven by in-memory collaborators


use crate::crawlers::{Fetcher, Processor};
use crate::error::{FetchError, ProcessError};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// Upper bound for any crawl in these tests; hitting it means the pool hung
pub(crate) const HANG_LIMIT: Duration = Duration::from_secs(10);

/// Returns the URL itself as content and counts how often each URL is fetched
#[derive(Default)]
pub(crate) struct EchoFetcher {
    calls: Mutex<HashMap<String, usize>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    failing: HashSet<String>,
}

impl EchoFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub(crate) fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub(crate) fn failing_on(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub(crate) fn calls(&self) -> HashMap<String, usize> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl Fetcher for EchoFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        async move {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default() += 1;

            let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            if self.failing.contains(url) {
                return Err(FetchError::Other {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            Ok(url.to_string())
        }
    }
}

/// Looks the content up in a fixed link graph; unknown content has no links
#[derive(Default)]
pub(crate) struct GraphProcessor {
    edges: HashMap<String, Vec<String>>,
    malformed: HashSet<String>,
    panics: HashSet<String>,
}

impl GraphProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_links(mut self, from: &str, to: &[&str]) -> Self {
        self.edges
            .insert(from.to_string(), to.iter().map(|s| s.to_string()).collect());
        self
    }

    pub(crate) fn malformed_on(mut self, content: &str) -> Self {
        self.malformed.insert(content.to_string());
        self
    }

    pub(crate) fn panicking_on(mut self, content: &str) -> Self {
        self.panics.insert(content.to_string());
        self
    }
}

impl Processor for GraphProcessor {
    fn process(
        &self,
        url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send {
        async move {
            if self.panics.contains(content) {
                panic!("processor blew up on {}", content);
            }
            if self.malformed.contains(content) {
                return Err(ProcessError::Malformed {
                    url: url.to_string(),
                    reason: "unterminated tag".to_string(),
                });
            }
            Ok(self.edges.get(content).cloned().unwrap_or_default())
        }
    }
}

/// Every page links to two children, forming a binary tree of `size` nodes
pub(crate) struct TreeProcessor {
    pub(crate) size: usize,
}

impl Processor for TreeProcessor {
    fn process(
        &self,
        url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send {
        let parsed = content.parse::<usize>().map_err(|e| ProcessError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        });
        let size = self.size;
        std::future::ready(parsed.map(|n| {
            [2 * n + 1, 2 * n + 2]
                .into_iter()
                .filter(|child| *child < size)
                .map(|child| child.to_string())
                .collect::<Vec<String>>()
        }))
    }
}

/// Never runs dry: every page links to a fresh one
pub(crate) struct EndlessProcessor;

impl Processor for EndlessProcessor {
    fn process(
        &self,
        _url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send {
        std::future::ready(Ok::<_, ProcessError>(vec![format!("{}/next", content)]))
    }
}
