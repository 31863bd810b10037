//! Environment-driven configuration.

use std::env;

use tracing::info;

/// Runtime configuration for the store and summarization endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted store's table endpoint root.
    pub store_url: String,
    /// API key sent as `apikey` and bearer token on every store request.
    pub store_api_key: String,
    /// Summarization endpoint receiving `{ "url": ... }`.
    pub summary_endpoint: String,
}

impl Config {
    /// Loads configuration from the environment, logging defaults.
    pub fn load() -> Self {
        Self {
            store_url: var_or("LINKSTASH_STORE_URL", "http://localhost:54321/rest/v1"),
            store_api_key: var_or("LINKSTASH_STORE_API_KEY", ""),
            summary_endpoint: var_or(
                "LINKSTASH_SUMMARY_ENDPOINT",
                "http://localhost:54321/functions/v1/summarize",
            ),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
