//! Summary resolution via the external summarization endpoint.
//!
//! The endpoint receives `{ "url": ... }` and answers `{ "summary": ... }`.
//! Any failure — transport, status, shape — degrades to a fixed placeholder;
//! this call can never block a save. Responses are capped to
//! [`SUMMARY_FETCH_LIMIT`] characters with a truncation marker, and capped
//! again to [`SUMMARY_STORAGE_LIMIT`] before persistence.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::warn;

/// Substitute summary when the endpoint fails or returns nothing usable.
pub const SUMMARY_PLACEHOLDER: &str = "No summary available.";

/// Character cap applied to the endpoint's response.
pub const SUMMARY_FETCH_LIMIT: usize = 500;

/// Character cap applied at persistence time.
pub const SUMMARY_STORAGE_LIMIT: usize = 1000;

/// Marker appended when a summary is cut at the fetch limit.
pub const TRUNCATION_MARKER: &str = "…";

/// Resolves a short natural-language summary for `url`. Never errors.
pub async fn resolve_summary(http: &Client, endpoint: &str, url: &str) -> String {
    match request_summary(http, endpoint, url).await {
        Some(summary) if !summary.trim().is_empty() => {
            truncate_with_marker(summary.trim(), SUMMARY_FETCH_LIMIT)
        }
        _ => SUMMARY_PLACEHOLDER.to_string(),
    }
}

async fn request_summary(http: &Client, endpoint: &str, url: &str) -> Option<String> {
    let response = http
        .post(endpoint)
        .json(&json!({ "url": url }))
        .send()
        .await
        .map_err(|e| warn!(error = %e, "summary endpoint unreachable"))
        .ok()?;
    if !response.status().is_success() {
        warn!(status = %response.status(), "summary endpoint returned an error");
        return None;
    }
    let body: Value = response.json().await.ok()?;
    body.get("summary")?.as_str().map(str::to_string)
}

/// Cuts `text` to at most `limit` characters, appending the truncation
/// marker when anything was removed. Counts characters, not bytes, so a cut
/// never lands inside a multi-byte sequence.
pub fn truncate_with_marker(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Persistence-time cap: at most [`SUMMARY_STORAGE_LIMIT`] characters.
pub fn cap_for_storage(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_STORAGE_LIMIT {
        summary.to_string()
    } else {
        summary.chars().take(SUMMARY_STORAGE_LIMIT).collect()
    }
}
