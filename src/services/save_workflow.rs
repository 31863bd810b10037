//! Add-bookmark workflow.
//!
//! Validates the submitted URL, resolves title and summary best-effort,
//! derives the favicon location, and inserts the record through the remote
//! store. Metadata degradation never fails a save; only an invalid URL or a
//! failed insert does. The caller refreshes the collection afterwards, which
//! is how the new bookmark enters the working list.

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::services::{metadata, summary};
use crate::store::RemoteStore;
use crate::types::bookmark::NewBookmark;
use crate::types::errors::SaveError;

/// Workflow service holding the shared HTTP client and endpoint config.
pub struct SaveWorkflow {
    http: Client,
    summary_endpoint: String,
}

impl SaveWorkflow {
    pub fn new(http: Client, summary_endpoint: &str) -> Self {
        Self {
            http,
            summary_endpoint: summary_endpoint.to_string(),
        }
    }

    /// Saves a new bookmark for the owner. Returns the store-assigned id.
    ///
    /// `position` is the slot the new bookmark takes, normally one past the
    /// last working-list position (append at the end, tolerating gaps).
    pub async fn save(
        &self,
        store: &dyn RemoteStore,
        owner_id: &str,
        raw_url: &str,
        tags: Vec<String>,
        position: i32,
    ) -> Result<String, SaveError> {
        let url =
            Url::parse(raw_url).map_err(|_| SaveError::InvalidUrl(raw_url.to_string()))?;

        let title = metadata::resolve_title(&self.http, &url).await;
        let resolved = summary::resolve_summary(&self.http, &self.summary_endpoint, url.as_str())
            .await;
        let favicon_url = metadata::derive_favicon(&url);

        let bookmark = NewBookmark {
            url: url.to_string(),
            title,
            favicon_url,
            summary: Some(summary::cap_for_storage(&resolved)),
            tags,
            position,
        };

        let id = store.insert(owner_id, bookmark).await?;
        info!(%id, "bookmark saved");
        Ok(id)
    }
}
