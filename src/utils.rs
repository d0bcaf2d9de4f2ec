use std::time::Duration;

/// Timeout for loading a page, with extra allowance for longer URLs
pub fn calculate_timeout(base: Duration, url_length: usize) -> Duration {
    // Longer URLs tend to be query-heavy pages that render slower
    let additional_ms = (url_length / 20) as u64 * 100;
    base + Duration::from_millis(additional_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_timeout() {
        let base = Duration::from_secs(30);
        assert_eq!(calculate_timeout(base, 0), base);
        assert_eq!(calculate_timeout(base, 19), base);
        assert_eq!(calculate_timeout(base, 45), base + Duration::from_millis(200));
    }
}
