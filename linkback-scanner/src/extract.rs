use regex::Regex;
use std::sync::LazyLock;

static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["'](.*?)["']"#).expect("href pattern is valid"));

/// Scan raw markup for `href="..."` / `href='...'` values.
///
/// This is a text scan, not an HTML parse: values are returned in the order
/// they appear, duplicates included, and malformed markup is never an error.
pub fn extract_hrefs(markup: &str) -> Vec<String> {
    HREF_PATTERN
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
