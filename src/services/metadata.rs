//! Page metadata resolution.
//!
//! Best-effort title lookup for a submitted URL plus favicon derivation.
//! Nothing in here raises to the caller: a failed or odd response degrades to
//! the URL's hostname, and a URL with no hostname degrades to the raw URL.

use reqwest::Client;
use url::Url;

/// Resolves a display title for the page at `url`.
///
/// Order of preference: the page's `<title>`, the hostname, the raw URL.
pub async fn resolve_title(http: &Client, url: &Url) -> String {
    match fetch_title(http, url).await {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        _ => fallback_title(url),
    }
}

async fn fetch_title(http: &Client, url: &Url) -> Option<String> {
    let response = http.get(url.clone()).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let body = response.text().await.ok()?;
    extract_title(&body)
}

/// Scans an HTML document for its `<title>` element.
///
/// A deliberate non-parser: finds the first `<title...>` open tag and reads
/// up to the closing `</title`. Decoding entities is left to the
/// presentation layer.
pub fn extract_title(html: &str) -> Option<String> {
    // ASCII-only lowering keeps byte offsets aligned with the original
    let lower: String = html.chars().map(|c| c.to_ascii_lowercase()).collect();
    let open = lower.find("<title")?;
    let content_start = open + lower[open..].find('>')? + 1;
    let content_end = content_start + lower[content_start..].find("</title")?;
    Some(html[content_start..content_end].trim().to_string())
}

/// Hostname of the URL, or the raw URL string when there is no host.
pub fn fallback_title(url: &Url) -> String {
    match url.host_str() {
        Some(host) => host.to_string(),
        None => url.as_str().to_string(),
    }
}

/// Best-effort favicon location derived from the URL's scheme and hostname.
pub fn derive_favicon(url: &Url) -> Option<String> {
    url.host_str()
        .map(|host| format!("{}://{}/favicon.ico", url.scheme(), host))
}
