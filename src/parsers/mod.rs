pub mod html;

use crate::crawlers::Processor;
use crate::error::ProcessError;
use crate::filter::UrlFilter;
use std::future::Future;
use url::Url;

/// Kind of content a URL is expected to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    Html,
    /// Plain text, source listings, documents and static assets
    Other,
}

impl ParserType {
    /// Determines the parser type based on the URL path
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);

        let linkless_suffixes = [
            ".txt", ".yaml", ".yml", ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".css", ".js",
        ];

        if linkless_suffixes.iter().any(|s| path.ends_with(s)) || path.contains("/_sources/") {
            ParserType::Other
        } else {
            ParserType::Html
        }
    }

    /// Returns if the parser should extract links
    pub fn should_extract_links(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}

/// Processor that pulls anchors out of HTML pages and keeps the in-scope ones
#[derive(Debug)]
pub struct LinkExtractor {
    filter: UrlFilter,
}

impl LinkExtractor {
    pub fn new(filter: UrlFilter) -> Self {
        Self { filter }
    }

    /// Absolute, filtered, fragment-free links found in `content`
    pub fn extract(&self, url: &str, content: &str) -> Result<Vec<String>, ProcessError> {
        let base = Url::parse(url).map_err(|source| ProcessError::InvalidBase {
            url: url.to_string(),
            source,
        })?;

        let parser_type = ParserType::from_url(url);
        if !parser_type.should_extract_links() {
            ::log::debug!("Not extracting links from {:?} content: {}", parser_type, url);
            return Ok(Vec::new());
        }

        let links = html::extract_links(content)
            .iter()
            .filter_map(|href| resolve_link(&base, href))
            .filter(|resolved| {
                let keep = self.filter.should_crawl(resolved);
                if !keep {
                    ::log::trace!("URL filter rejected: {}", resolved);
                }
                keep
            })
            .map(|resolved| self.filter.normalize_url(&resolved).to_string())
            .collect();

        Ok(links)
    }
}

impl Processor for LinkExtractor {
    fn process(
        &self,
        url: &str,
        content: &str,
    ) -> impl Future<Output = Result<Vec<String>, ProcessError>> + Send {
        std::future::ready(self.extract(url, content))
    }
}

/// Resolves a possibly relative link against the page it was found on
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }
    base.join(href).ok()
}
