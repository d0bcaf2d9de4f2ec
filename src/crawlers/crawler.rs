use crate::error::{FetchError, ProcessError};
use std::future::Future;
use std::sync::Arc;

/// Retrieves the content behind a URL.
///
/// Shared by every worker of a pool, so implementations take `&self` and
/// handle their own interior state.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Extracts newly discovered URLs from fetched content.
pub trait Processor: Send + Sync + 'static {
    /// `url` is the page the content came from, for resolving relative links.
    /// Returned URLs may contain duplicates; the frontier filters them.
    fn process(
        &self,
        url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send;
}

impl<F: Fetcher> Fetcher for Arc<F> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send {
        F::fetch(self, url)
    }
}

impl<P: Processor> Processor for Arc<P> {
    fn process(
        &self,
        url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send {
        P::process(self, url, content)
    }
}
