use std::time::Duration;

/// Failure to retrieve the content behind a URL.
///
/// Always scoped to a single URL: the worker logs it, drops the URL and moves on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No WebDriver session could be obtained
    #[error("no WebDriver session available: {0}")]
    NoSession(String),

    /// The browser failed to load the page or return its source
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("timed out fetching {url} after {elapsed:?}")]
    Timeout { url: String, elapsed: Duration },

    /// Any other collaborator-specific failure
    #[error("fetch of {url} failed: {reason}")]
    Other { url: String, reason: String },
}

/// Failure to extract links from fetched content.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The page URL itself cannot be used to resolve relative links
    #[error("cannot resolve links against {url}: {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("malformed content at {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Invalid run configuration, reported before any worker starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("pool size must be greater than 0, got {0}")]
    InvalidPoolSize(usize),

    #[error("poll backoff must be greater than 0")]
    ZeroPollBackoff,

    #[error("invalid URL pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
