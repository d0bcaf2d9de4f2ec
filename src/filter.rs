use crate::config::CrawlConfig;
use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Static assets never worth fetching for links
const ASSET_PATTERN: &str = r"\.(jpg|jpeg|png|gif|css|js|ico|woff|woff2|ttf|eot|svg|pdf)$";

/// Rules deciding which discovered links are handed back to the frontier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Domains a link must belong to (empty means any domain)
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Path prefix restriction (if None, all paths are allowed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_path_prefix: Option<String>,

    /// Regex patterns for URLs to include (if empty, all URLs are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl UrlFilterConfig {
    /// Scope derived from a crawl configuration.
    ///
    /// Unless external links are allowed, links must stay on one of the seeds'
    /// domains and under the seeds' common directory. An explicit
    /// `path_prefix` always applies. Static assets are always excluded.
    pub fn from_crawl_config(config: &CrawlConfig) -> Self {
        let seeds: Vec<Url> = config
            .seed_urls
            .iter()
            .filter_map(|seed| Url::parse(seed).ok())
            .collect();

        let (allowed_domains, seed_prefix) = if config.allow_external {
            (Vec::new(), None)
        } else {
            let mut domains: Vec<String> = seeds
                .iter()
                .filter_map(|seed| seed.domain().map(str::to_string))
                .collect();
            domains.sort();
            domains.dedup();
            (domains, common_directory(&seeds))
        };

        let mut exclude_patterns = vec![ASSET_PATTERN.to_string()];
        exclude_patterns.extend(config.exclude_patterns.iter().cloned());

        Self {
            allowed_domains,
            required_path_prefix: config.path_prefix.clone().or(seed_prefix),
            include_patterns: config.include_patterns.clone(),
            exclude_patterns,
        }
    }
}

/// Compiled form of [`UrlFilterConfig`]
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl UrlFilter {
    pub fn new(config: UrlFilterConfig) -> Result<Self, ConfigError> {
        let include_regexes = compile(&config.include_patterns)?;
        let exclude_regexes = compile(&config.exclude_patterns)?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a URL should be crawled based on all filtering rules
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if !self.is_in_domain_scope(url) || !self.is_in_path_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|regex| regex.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        if self.config.allowed_domains.is_empty() {
            return true;
        }
        match url.domain() {
            Some(domain) => self.config.allowed_domains.iter().any(|d| d == domain),
            None => false,
        }
    }

    fn is_in_path_scope(&self, url: &Url) -> bool {
        match &self.config.required_path_prefix {
            Some(prefix) => url.path().starts_with(prefix),
            None => true,
        }
    }

    /// Drops the fragment, so `page#a` and `page#b` are one frontier entry
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

/// Longest directory shared by every seed path; `None` when that is the root
fn common_directory(seeds: &[Url]) -> Option<String> {
    let mut directories = seeds.iter().map(|seed| directory_of(seed.path()));
    let first = directories.next()?;
    let common = directories.fold(first, |common, directory| {
        let shared = common
            .bytes()
            .zip(directory.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        directory_of(&common[..shared])
    });

    (common.len() > 1).then(|| common.to_string())
}

/// `/docs/intro.html` -> `/docs/`
fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(slash) => &path[..=slash],
        None => "",
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_scope_from_seeds() {
        let config = CrawlConfig::new(["https://example.com/docs/", "https://other.org/"]);
        let filter = UrlFilter::new(UrlFilterConfig::from_crawl_config(&config)).unwrap();

        assert!(filter.should_crawl(&url("https://example.com/blog")));
        assert!(filter.should_crawl(&url("https://other.org/page")));
        assert!(!filter.should_crawl(&url("https://elsewhere.net/")));

        // Static assets are excluded by default
        assert!(!filter.should_crawl(&url("https://example.com/logo.png")));
    }

    #[test]
    fn test_path_scope_from_seed_directory() {
        let config = CrawlConfig::new(["https://example.com/docs/guide/intro.html"]);
        let filter = UrlFilter::new(UrlFilterConfig::from_crawl_config(&config)).unwrap();

        assert!(filter.should_crawl(&url("https://example.com/docs/guide/setup.html")));
        assert!(filter.should_crawl(&url("https://example.com/docs/guide/api/index.html")));
        assert!(!filter.should_crawl(&url("https://example.com/docs/other.html")));
        assert!(!filter.should_crawl(&url("https://example.com/about")));
    }

    #[test]
    fn test_path_scope_shared_by_seeds() {
        let config = CrawlConfig::new([
            "https://example.com/docs/v1/",
            "https://example.com/docs/v2/index.html",
        ]);
        let filter_config = UrlFilterConfig::from_crawl_config(&config);
        assert_eq!(filter_config.required_path_prefix.as_deref(), Some("/docs/"));

        // Seeds with nothing but the root in common do not restrict paths
        let config = CrawlConfig::new(["https://example.com/docs/", "https://example.com/blog/"]);
        let filter_config = UrlFilterConfig::from_crawl_config(&config);
        assert_eq!(filter_config.required_path_prefix, None);
    }

    #[test]
    fn test_explicit_path_prefix_wins() {
        let config = CrawlConfig {
            allow_external: true,
            path_prefix: Some("/blog/".to_string()),
            ..CrawlConfig::new(["https://example.com/docs/"])
        };
        let filter = UrlFilter::new(UrlFilterConfig::from_crawl_config(&config)).unwrap();

        assert!(filter.should_crawl(&url("https://elsewhere.net/blog/post")));
        assert!(!filter.should_crawl(&url("https://example.com/docs/page")));
    }

    #[test]
    fn test_allow_external() {
        let config = CrawlConfig {
            allow_external: true,
            ..CrawlConfig::new(["https://example.com/"])
        };
        let filter = UrlFilter::new(UrlFilterConfig::from_crawl_config(&config)).unwrap();
        assert!(filter.should_crawl(&url("https://elsewhere.net/page.html")));
        assert!(!filter.should_crawl(&url("mailto:someone@example.com")));
    }

    #[test]
    fn test_path_restriction() {
        let filter = UrlFilter::new(UrlFilterConfig {
            required_path_prefix: Some("/docs".to_string()),
            ..UrlFilterConfig::default()
        })
        .unwrap();

        assert!(filter.should_crawl(&url("https://example.com/docs/page")));
        assert!(!filter.should_crawl(&url("https://example.com/blog/post")));
    }

    #[test]
    fn test_regex_patterns() {
        let filter = UrlFilter::new(UrlFilterConfig {
            include_patterns: vec![r"/docs/.*\.html$".to_string()],
            exclude_patterns: vec![r"/docs/draft/".to_string()],
            ..UrlFilterConfig::default()
        })
        .unwrap();

        assert!(filter.should_crawl(&url("https://example.com/docs/page.html")));
        assert!(!filter.should_crawl(&url("https://example.com/docs/page.txt")));
        // Exclude wins over include
        assert!(!filter.should_crawl(&url("https://example.com/docs/draft/page.html")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = UrlFilter::new(UrlFilterConfig {
            include_patterns: vec!["[".to_string()],
            ..UrlFilterConfig::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_normalize_drops_fragment() {
        let filter = UrlFilter::new(UrlFilterConfig::default()).unwrap();
        let normalized = filter.normalize_url(&url("https://example.com/page?q=1#section"));
        assert_eq!(normalized.as_str(), "https://example.com/page?q=1");
    }
}
