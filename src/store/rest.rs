//! HTTP client for the hosted bookmark store.
//!
//! Speaks PostgREST-style conventions: row filters are query parameters
//! (`owner_id=eq.<owner>`), ordering is `order=position.asc.nullslast`, and
//! partial updates go out as `PATCH` bodies. Every mutating request carries
//! both the row id and the owner id filter so a stale or forged id can never
//! touch another owner's records — the server enforces the same predicate,
//! this client just never asks for anything broader.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;

use crate::config::Config;
use crate::types::bookmark::{BookmarkRecord, NewBookmark};
use crate::types::errors::StoreError;

use super::{BookmarkPatch, RemoteStore};

/// Remote store client backed by `reqwest`.
pub struct RestStore {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    owner_id: &'a str,
    #[serde(flatten)]
    bookmark: &'a NewBookmark,
}

impl RestStore {
    /// Creates a client from configuration. `base_url` must point at the
    /// table endpoint root (the `/bookmarks` path is appended here).
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            http,
            base_url: config.store_url.trim_end_matches('/').to_string(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn bookmarks_url(&self) -> String {
        format!("{}/bookmarks", self.base_url)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Maps a non-success HTTP status to the store error taxonomy.
    async fn reject(response: Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::Auth(format!("{}: {}", status, body))
            }
            _ => StoreError::Rejected(format!("{}: {}", status, body)),
        }
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<BookmarkRecord>, StoreError> {
        let response = self
            .authed(self.http.get(self.bookmarks_url()))
            .query(&[
                ("owner_id", format!("eq.{}", owner_id)),
                ("order", "position.asc.nullslast".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        response
            .json::<Vec<BookmarkRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn insert(&self, owner_id: &str, bookmark: NewBookmark) -> Result<String, StoreError> {
        let row = InsertRow {
            owner_id,
            bookmark: &bookmark,
        };
        let response = self
            .authed(self.http.post(self.bookmarks_url()))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        // PostgREST returns the inserted rows as an array
        let rows: Vec<BookmarkRecord> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        rows.into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn update(
        &self,
        id: &str,
        owner_id: &str,
        patch: BookmarkPatch,
    ) -> Result<(), StoreError> {
        let response = self
            .authed(self.http.patch(self.bookmarks_url()))
            .query(&[
                ("id", format!("eq.{}", id)),
                ("owner_id", format!("eq.{}", owner_id)),
            ])
            .json(&patch)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        let response = self
            .authed(self.http.delete(self.bookmarks_url()))
            .query(&[
                ("id", format!("eq.{}", id)),
                ("owner_id", format!("eq.{}", owner_id)),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }
}
