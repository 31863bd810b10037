//! In-memory remote store.
//!
//! Backs the demo binary and the test suite in the role a hosted backend
//! plays in production. Rows are scoped by owner, listing sorts ascending by
//! position with nulls last (matching the REST client's `order` clause), and
//! update and list calls can be made to fail after N successes so rollback
//! and refresh-failure paths can be exercised deterministically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::bookmark::{BookmarkRecord, NewBookmark};
use crate::types::errors::StoreError;

use super::{BookmarkPatch, RemoteStore};

struct StoredRow {
    owner_id: String,
    record: BookmarkRecord,
}

/// In-memory implementation of [`RemoteStore`].
pub struct MemoryStore {
    rows: Mutex<Vec<StoredRow>>,
    update_calls: AtomicUsize,
    /// Remaining successful updates before an injected failure. `None`
    /// means updates always succeed.
    updates_until_failure: Mutex<Option<usize>>,
    /// Same, for list calls.
    lists_until_failure: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            update_calls: AtomicUsize::new(0),
            updates_until_failure: Mutex::new(None),
            lists_until_failure: Mutex::new(None),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Seeds a record as-is (id and position included) for the given owner.
    pub fn seed(&self, owner_id: &str, record: BookmarkRecord) {
        self.rows.lock().unwrap().push(StoredRow {
            owner_id: owner_id.to_string(),
            record,
        });
    }

    /// Arranges for update calls to fail once `successes` have gone through.
    pub fn fail_updates_after(&self, successes: usize) {
        *self.updates_until_failure.lock().unwrap() = Some(successes);
    }

    /// Arranges for list calls to fail once `successes` have gone through.
    pub fn fail_lists_after(&self, successes: usize) {
        *self.lists_until_failure.lock().unwrap() = Some(successes);
    }

    /// Number of update calls received so far, including failed ones.
    pub fn update_call_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of an owner's rows in raw insertion order, for assertions.
    pub fn rows_for(&self, owner_id: &str) -> Vec<BookmarkRecord> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .map(|row| row.record.clone())
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, owner_id: &str) -> Result<Vec<BookmarkRecord>, StoreError> {
        {
            let mut remaining = self.lists_until_failure.lock().unwrap();
            if let Some(n) = *remaining {
                if n == 0 {
                    return Err(StoreError::Network("injected list failure".to_string()));
                }
                *remaining = Some(n - 1);
            }
        }

        let rows = self.rows.lock().unwrap();
        let mut records: Vec<BookmarkRecord> = rows
            .iter()
            .filter(|row| row.owner_id == owner_id)
            .map(|row| row.record.clone())
            .collect();
        // Ascending by position, nulls last; stable so insertion order breaks ties
        records.sort_by(|a, b| match (a.position, b.position) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(records)
    }

    async fn insert(&self, owner_id: &str, bookmark: NewBookmark) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let record = BookmarkRecord {
            id: id.clone(),
            url: bookmark.url,
            title: bookmark.title,
            favicon_url: bookmark.favicon_url,
            summary: bookmark.summary,
            tags: bookmark.tags,
            created_at: Self::now(),
            position: Some(bookmark.position),
        };
        self.rows.lock().unwrap().push(StoredRow {
            owner_id: owner_id.to_string(),
            record,
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: &str,
        owner_id: &str,
        patch: BookmarkPatch,
    ) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        {
            let mut remaining = self.updates_until_failure.lock().unwrap();
            if let Some(n) = *remaining {
                if n == 0 {
                    return Err(StoreError::Network("injected update failure".to_string()));
                }
                *remaining = Some(n - 1);
            }
        }

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|row| row.record.id == id && row.owner_id == owner_id)
            .ok_or_else(|| StoreError::Rejected(format!("no row matches id {}", id)))?;
        if let Some(position) = patch.position {
            row.record.position = Some(position);
        }
        Ok(())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        // Deleting zero rows is a success, as with the REST backend
        self.rows
            .lock()
            .unwrap()
            .retain(|row| !(row.record.id == id && row.owner_id == owner_id));
        Ok(())
    }
}
