use scraper::{Html, Selector};

/// Returns the raw `href` of every anchor in the document, in document order
pub fn extract_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let link_selector = Selector::parse("a[href]").expect("static selector is valid");
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}
