//! Unit tests for the collection view model.
//!
//! Exercises fetch-and-normalize, reorder-and-persist, rollback, and delete
//! against the in-memory store, plus a failing store double for the
//! fetch-failure path.

use std::sync::Arc;

use async_trait::async_trait;
use linkstash::managers::collection::{Collection, ReorderOutcome};
use linkstash::store::{BookmarkPatch, MemoryStore, RemoteStore};
use linkstash::types::bookmark::{BookmarkRecord, NewBookmark};
use linkstash::types::errors::StoreError;
use linkstash::types::notice::Severity;

const OWNER: &str = "owner-1";

fn record(id: &str, position: Option<i32>) -> BookmarkRecord {
    BookmarkRecord {
        id: id.to_string(),
        url: format!("https://example.com/{}", id),
        title: format!("Bookmark {}", id),
        favicon_url: None,
        summary: None,
        tags: Vec::new(),
        created_at: 0,
        position,
    }
}

/// Store double whose every call fails, for the fetch-failure path.
struct FailingStore;

#[async_trait]
impl RemoteStore for FailingStore {
    async fn list(&self, _owner_id: &str) -> Result<Vec<BookmarkRecord>, StoreError> {
        Err(StoreError::Network("unreachable".to_string()))
    }
    async fn insert(&self, _owner_id: &str, _bookmark: NewBookmark) -> Result<String, StoreError> {
        Err(StoreError::Network("unreachable".to_string()))
    }
    async fn update(
        &self,
        _id: &str,
        _owner_id: &str,
        _patch: BookmarkPatch,
    ) -> Result<(), StoreError> {
        Err(StoreError::Network("unreachable".to_string()))
    }
    async fn delete(&self, _id: &str, _owner_id: &str) -> Result<(), StoreError> {
        Err(StoreError::Network("unreachable".to_string()))
    }
}

async fn loaded_collection(store: Arc<MemoryStore>) -> Collection {
    let mut collection = Collection::new(store, OWNER);
    collection.refresh().await;
    collection
}

/// A fetch response with positions [null, 1, 0] normalizes to [0, 1, 2]
/// with the response order preserved (index-based fallback).
#[test]
fn test_normalize_missing_and_out_of_order_positions() {
    use linkstash::managers::collection::normalize;

    let records = vec![record("a", None), record("b", Some(1)), record("c", Some(0))];
    let normalized = normalize(records);
    let ids: Vec<&str> = normalized.iter().map(|b| b.id.as_str()).collect();
    let positions: Vec<i32> = normalized.iter().map(|b| b.position).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(positions, vec![0, 1, 2]);
}

/// End-to-end through the store: nulls list last, then get the index fallback.
#[tokio::test]
async fn test_fetch_assigns_index_to_missing_positions() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("a", None));
    store.seed(OWNER, record("b", Some(1)));
    store.seed(OWNER, record("c", Some(0)));

    let collection = loaded_collection(store).await;
    let ids: Vec<&str> = collection.working().iter().map(|b| b.id.as_str()).collect();
    let positions: Vec<i32> = collection.working().iter().map(|b| b.position).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(positions, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_fetch_preserves_position_gaps() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("a", Some(5)));
    store.seed(OWNER, record("b", Some(7)));
    store.seed(OWNER, record("c", Some(9)));

    let collection = loaded_collection(store).await;
    let positions: Vec<i32> = collection.working().iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![5, 7, 9]);
}

#[tokio::test]
async fn test_loading_flag_clears_after_first_fetch() {
    let store = Arc::new(MemoryStore::new());
    let mut collection = Collection::new(store, OWNER);
    assert!(collection.is_loading());
    collection.refresh().await;
    assert!(!collection.is_loading());
}

/// A refresh that fails after a successful first load keeps the previous
/// working list, view, and tag universe intact.
#[tokio::test]
async fn test_failed_refresh_keeps_previous_contents() {
    let store = Arc::new(MemoryStore::new());
    let mut a = record("a", Some(0));
    a.tags = vec!["work".to_string()];
    store.seed(OWNER, a);
    store.seed(OWNER, record("b", Some(1)));

    let mut collection = loaded_collection(store.clone()).await;
    collection.set_search_text("com/a");
    let view_before: Vec<String> = collection.filtered().iter().map(|b| b.id.clone()).collect();
    assert_eq!(view_before, vec!["a".to_string()]);

    store.fail_lists_after(0);
    collection.refresh().await;

    let ids: Vec<&str> = collection.working().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    let view_after: Vec<String> = collection.filtered().iter().map(|b| b.id.clone()).collect();
    assert_eq!(view_after, view_before);
    assert_eq!(collection.tag_universe(), &["work".to_string()]);

    let notices = collection.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[tokio::test]
async fn test_failed_fetch_leaves_list_empty_and_surfaces_notice() {
    let mut collection = Collection::new(Arc::new(FailingStore), OWNER);
    collection.refresh().await;

    assert!(!collection.is_loading());
    assert!(collection.working().is_empty());
    let notices = collection.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    // Drained notices do not reappear
    assert!(collection.take_notices().is_empty());
}

/// Scenario: [1@0, 2@1, 3@2]; moving id 1 into id 3's slot yields order
/// [2, 3, 1] with dense positions [0, 1, 2].
#[tokio::test]
async fn test_reorder_moves_item_and_renumbers_densely() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));
    store.seed(OWNER, record("2", Some(1)));
    store.seed(OWNER, record("3", Some(2)));

    let mut collection = loaded_collection(store.clone()).await;
    let outcome = collection.reorder("1", "3").await;
    assert!(matches!(outcome, ReorderOutcome::Applied { updated: 3 }));

    let ids: Vec<&str> = collection.filtered().iter().map(|b| b.id.as_str()).collect();
    let positions: Vec<i32> = collection.filtered().iter().map(|b| b.position).collect();
    assert_eq!(ids, vec!["2", "3", "1"]);
    assert_eq!(positions, vec![0, 1, 2]);

    // Persisted positions match the new order
    let mut stored: Vec<(String, Option<i32>)> = store
        .rows_for(OWNER)
        .into_iter()
        .map(|r| (r.id, r.position))
        .collect();
    stored.sort_by_key(|(_, p)| *p);
    assert_eq!(
        stored,
        vec![
            ("2".to_string(), Some(0)),
            ("3".to_string(), Some(1)),
            ("1".to_string(), Some(2)),
        ]
    );
}

#[tokio::test]
async fn test_reorder_same_slot_is_noop_with_zero_calls() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));
    store.seed(OWNER, record("2", Some(1)));

    let mut collection = loaded_collection(store.clone()).await;
    let outcome = collection.reorder("1", "1").await;
    assert!(matches!(outcome, ReorderOutcome::Noop));
    assert_eq!(store.update_call_count(), 0);

    let positions: Vec<i32> = collection.filtered().iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![0, 1]);
}

#[tokio::test]
async fn test_reorder_unknown_id_is_noop() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));

    let mut collection = loaded_collection(store.clone()).await;
    assert!(matches!(
        collection.reorder("ghost", "1").await,
        ReorderOutcome::Noop
    ));
    assert!(matches!(
        collection.reorder("1", "ghost").await,
        ReorderOutcome::Noop
    ));
    assert_eq!(store.update_call_count(), 0);
}

#[tokio::test]
async fn test_reorder_rolls_back_view_on_persistence_failure() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));
    store.seed(OWNER, record("2", Some(1)));
    store.seed(OWNER, record("3", Some(2)));

    let mut collection = loaded_collection(store.clone()).await;
    store.fail_updates_after(1);

    let outcome = collection.reorder("1", "3").await;
    match outcome {
        ReorderOutcome::RolledBack {
            succeeded_ids,
            failed_at,
            ..
        } => {
            assert_eq!(succeeded_ids, vec!["2".to_string()]);
            assert_eq!(failed_at, "3");
        }
        other => panic!("expected rollback, got {:?}", other),
    }

    // View reverted to the pre-move order
    let ids: Vec<&str> = collection.filtered().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    // Working positions untouched by the failed reorder
    let positions: Vec<i32> = collection.working().iter().map(|b| b.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    // The successful write is NOT rolled back server-side
    let stored = store.rows_for(OWNER);
    let row_2 = stored.iter().find(|r| r.id == "2").unwrap();
    assert_eq!(row_2.position, Some(0));

    let notices = collection.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

/// Reordering under an active filter renumbers the filtered subset only;
/// hidden bookmarks keep their old positions and stay interleaved by the
/// stable re-sort.
#[tokio::test]
async fn test_reorder_within_filtered_view() {
    let store = Arc::new(MemoryStore::new());
    let mut tagged = record("t1", Some(0));
    tagged.tags = vec!["work".to_string()];
    store.seed(OWNER, tagged);
    store.seed(OWNER, record("plain", Some(1)));
    let mut tagged = record("t2", Some(2));
    tagged.tags = vec!["work".to_string()];
    store.seed(OWNER, tagged);

    let mut collection = loaded_collection(store.clone()).await;
    collection.toggle_tag("work");
    let view: Vec<&str> = collection.filtered().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(view, vec!["t1", "t2"]);

    let outcome = collection.reorder("t1", "t2").await;
    assert!(matches!(outcome, ReorderOutcome::Applied { .. }));

    // Subset positions are zero-based over the subset
    let view: Vec<(&str, i32)> = collection
        .filtered()
        .iter()
        .map(|b| (b.id.as_str(), b.position))
        .collect();
    assert_eq!(view, vec![("t2", 0), ("t1", 1)]);

    // The hidden bookmark still holds its old position
    let plain = collection.working().iter().find(|b| b.id == "plain").unwrap();
    assert_eq!(plain.position, 1);
}

#[tokio::test]
async fn test_delete_removes_from_store_and_view() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));
    store.seed(OWNER, record("2", Some(1)));

    let mut collection = loaded_collection(store.clone()).await;
    collection.delete("1").await;

    assert_eq!(collection.len(), 1);
    assert_eq!(collection.filtered()[0].id, "2");
    assert_eq!(store.rows_for(OWNER).len(), 1);
    // No renumbering: the survivor keeps its gap
    assert_eq!(collection.working()[0].position, 1);
    assert!(collection.take_notices().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_id_is_silent_noop() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("1", Some(0)));

    let mut collection = loaded_collection(store.clone()).await;
    collection.delete("ghost").await;

    assert_eq!(collection.len(), 1);
    assert!(collection.take_notices().is_empty());
}

/// The append slot for a new bookmark sits past the highest position, so a
/// save after deletes cannot interleave with the survivors' gapped positions.
#[tokio::test]
async fn test_next_position_skips_past_gaps() {
    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("a", Some(5)));
    store.seed(OWNER, record("b", Some(7)));
    store.seed(OWNER, record("c", Some(9)));

    let collection = loaded_collection(store).await;
    assert_eq!(collection.next_position(), 10);

    let empty = loaded_collection(Arc::new(MemoryStore::new())).await;
    assert_eq!(empty.next_position(), 0);
}

#[tokio::test]
async fn test_tag_universe_is_sorted_and_distinct() {
    let store = Arc::new(MemoryStore::new());
    let mut a = record("a", Some(0));
    a.tags = vec!["work".to_string(), "rust".to_string()];
    let mut b = record("b", Some(1));
    b.tags = vec!["work".to_string(), "reading".to_string()];
    store.seed(OWNER, a);
    store.seed(OWNER, b);

    let collection = loaded_collection(store).await;
    assert_eq!(
        collection.tag_universe(),
        &["reading".to_string(), "rust".to_string(), "work".to_string()]
    );
}
