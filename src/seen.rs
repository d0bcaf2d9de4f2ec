use std::collections::HashSet;

/// Every URL ever admitted to the frontier during a run.
///
/// The set itself carries no lock: it lives inside the frontier's shared
/// state, so `test_and_insert` is atomic with respect to the queue append
/// that follows it.
#[derive(Debug, Default)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url`, returning `true` only if it was not already present
    pub fn test_and_insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_insert_reports_first_insertion_only() {
        let mut seen = SeenSet::new();
        assert!(seen.is_empty());

        assert!(seen.test_and_insert("test.txt"));
        assert!(seen.contains("test.txt"));
        assert!(seen.test_and_insert("test2.txt"));
        assert!(!seen.test_and_insert("test2.txt"));
        assert!(!seen.test_and_insert("test.txt"));

        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn urls_compare_by_exact_string() {
        let mut seen = SeenSet::new();
        assert!(seen.test_and_insert("https://example.com/a"));
        // No normalization: trailing slash and fragment make distinct URLs
        assert!(seen.test_and_insert("https://example.com/a/"));
        assert!(seen.test_and_insert("https://example.com/a#top"));
        assert!(!seen.contains("https://EXAMPLE.com/a"));
        assert_eq!(seen.len(), 3);
    }
}
