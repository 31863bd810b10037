//! LinkStash remote store layer.
//!
//! The hosted backend is reached through the [`RemoteStore`] trait. Every
//! call is scoped by the owner identity — the core never reads or writes
//! another owner's records. [`rest::RestStore`] talks to the real backend;
//! [`memory::MemoryStore`] backs the demo binary and the test suite.

use async_trait::async_trait;
use serde::Serialize;

use crate::types::bookmark::{BookmarkRecord, NewBookmark};
use crate::types::errors::StoreError;

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// Partial update payload for a bookmark row.
///
/// `position` is the only field the collection ever rewrites after creation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookmarkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl BookmarkPatch {
    /// Patch that moves a bookmark to the given position.
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
        }
    }
}

/// Trait defining the remote bookmark store operations.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lists the owner's bookmarks ordered ascending by position.
    async fn list(&self, owner_id: &str) -> Result<Vec<BookmarkRecord>, StoreError>;

    /// Inserts a bookmark for the owner. Returns the store-assigned id.
    async fn insert(&self, owner_id: &str, bookmark: NewBookmark) -> Result<String, StoreError>;

    /// Applies a partial update, scoped by both the bookmark id and the owner.
    async fn update(&self, id: &str, owner_id: &str, patch: BookmarkPatch)
        -> Result<(), StoreError>;

    /// Deletes a bookmark, scoped by both the bookmark id and the owner.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError>;
}
