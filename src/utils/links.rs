//! URL helpers for the page assets handed in by the collector

use url::Url;

const LOG_URL_CHARS: usize = 70;

/// True when `raw` starts with an `http://` or `https://` scheme.
#[must_use]
pub fn is_http_url(raw: &str) -> bool {
    let head = raw
        .trim_start()
        .chars()
        .take(8)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

/// Lowercased host of `url`.
#[must_use]
pub fn host_of(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

/// Shorten a URL for log lines; `data:` URLs in particular can be megabytes.
#[must_use]
pub fn truncate_for_log(raw: &str) -> String {
    if raw.chars().count() <= LOG_URL_CHARS {
        return raw.to_string();
    }
    let head: String = raw.chars().take(LOG_URL_CHARS).collect();
    format!("{}...", head)
}
