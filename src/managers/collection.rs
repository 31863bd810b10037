//! Collection view model — the core of LinkStash.
//!
//! Owns the authoritative in-memory list of one owner's bookmarks (the
//! working list), derives the filtered view from search text and selected
//! tag chips, and mediates drag-reorder: optimistic local move, sequential
//! per-item persistence, and an in-memory rollback when a write fails.
//!
//! All mutation goes through `&mut self`, so there is never more than one
//! logical writer; callers that multiplex intents (see `rpc_handler`) are
//! responsible for serializing them.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::store::{BookmarkPatch, RemoteStore};
use crate::types::bookmark::{Bookmark, BookmarkRecord};
use crate::types::errors::StoreError;
use crate::types::notice::{Notice, Severity};

/// Result of a reorder intent.
///
/// An explicit outcome rather than an error: partial persistence is a state
/// the caller may accept (the store keeps the already-written positions until
/// the next fetch), so it must be distinguishable from full success.
#[derive(Debug)]
pub enum ReorderOutcome {
    /// Source and target resolved to the same slot, or an id was unknown.
    /// No state changed and no persistence call was issued.
    Noop,
    /// The new order is applied locally and every changed position is stored.
    Applied { updated: usize },
    /// A persistence call failed. The filtered view has been reverted to its
    /// pre-move order; `succeeded_ids` were already written remotely and are
    /// NOT rolled back server-side.
    RolledBack {
        succeeded_ids: Vec<String>,
        failed_at: String,
        error: StoreError,
    },
}

/// View model for one owner's bookmark collection.
pub struct Collection {
    store: Arc<dyn RemoteStore>,
    owner_id: String,
    /// Unfiltered bookmarks, ascending by position.
    working: Vec<Bookmark>,
    /// Ids of the filtered view in display order. Materialized so an
    /// optimistic reorder can be shown (and reverted) independently of the
    /// working list's stored positions.
    view_order: Vec<String>,
    search_text: String,
    selected_tags: HashSet<String>,
    /// Distinct tags across the working list, sorted lexicographically.
    tag_universe: Vec<String>,
    /// True until the first fetch settles, success or failure.
    loading: bool,
    notices: Vec<Notice>,
}

impl Collection {
    /// Creates an empty collection for the owner. Call [`refresh`] to load.
    ///
    /// [`refresh`]: Collection::refresh
    pub fn new(store: Arc<dyn RemoteStore>, owner_id: &str) -> Self {
        Self {
            store,
            owner_id: owner_id.to_string(),
            working: Vec::new(),
            view_order: Vec::new(),
            search_text: String::new(),
            selected_tags: HashSet::new(),
            tag_universe: Vec::new(),
            loading: true,
            notices: Vec::new(),
        }
    }

    // ─── Read access ───

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// The filtered view in display order.
    pub fn filtered(&self) -> Vec<&Bookmark> {
        self.view_order
            .iter()
            .filter_map(|id| self.working.iter().find(|b| &b.id == id))
            .collect()
    }

    /// The unfiltered working list, ascending by position.
    pub fn working(&self) -> &[Bookmark] {
        &self.working
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn tag_universe(&self) -> &[String] {
        &self.tag_universe
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_tags(&self) -> &HashSet<String> {
        &self.selected_tags
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Position one past the end of the working list. Positions may hold
    /// gaps after deletes, so this is the last position + 1, not the length.
    pub fn next_position(&self) -> i32 {
        self.working.last().map_or(0, |b| b.position + 1)
    }

    /// Drains pending user-facing notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Intents ───

    /// Fetches the owner's bookmarks and rebuilds the working list, view,
    /// and tag universe. On failure the previous contents stay (empty on
    /// first load) and a non-fatal notice is queued; nothing retries.
    pub async fn refresh(&mut self) {
        match self.store.list(&self.owner_id).await {
            Ok(records) => {
                self.working = normalize(records);
                self.tag_universe = derive_tag_universe(&self.working);
                self.rebuild_view();
                info!(count = self.working.len(), "collection refreshed");
            }
            Err(err) => {
                warn!(error = %err, "collection refresh failed");
                self.push_notice(Severity::Error, format!("Could not load bookmarks: {}", err));
            }
        }
        self.loading = false;
    }

    /// Updates the search text and recomputes the filtered view.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        self.rebuild_view();
    }

    /// Toggles a tag chip and recomputes the filtered view.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
        self.rebuild_view();
    }

    /// Moves the bookmark `source_id` into the slot currently held by
    /// `target_id` within the filtered view, persisting the new order.
    ///
    /// The view reflects the move before any network call completes; if a
    /// persistence call fails the move is undone locally, but writes that
    /// already succeeded stay in the store until the next fetch.
    pub async fn reorder(&mut self, source_id: &str, target_id: &str) -> ReorderOutcome {
        let source_index = match self.view_order.iter().position(|id| id == source_id) {
            Some(i) => i,
            None => return ReorderOutcome::Noop,
        };
        let target_index = match self.view_order.iter().position(|id| id == target_id) {
            Some(i) => i,
            None => return ReorderOutcome::Noop,
        };
        if source_index == target_index {
            return ReorderOutcome::Noop;
        }

        // Optimistic single-element move; everything else keeps relative order
        let moved = self.view_order.remove(source_index);
        self.view_order.insert(target_index, moved);

        // New position = zero-based index over the (possibly filtered) view
        let desired: Vec<(String, i32)> = self
            .view_order
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index as i32))
            .collect();

        let mut succeeded_ids = Vec::new();
        let mut failure: Option<(String, StoreError)> = None;
        for (id, position) in &desired {
            let current = self
                .working
                .iter()
                .find(|b| &b.id == id)
                .map(|b| b.position);
            if current == Some(*position) {
                continue;
            }
            match self
                .store
                .update(id, &self.owner_id, BookmarkPatch::position(*position))
                .await
            {
                Ok(()) => succeeded_ids.push(id.clone()),
                Err(err) => {
                    failure = Some((id.clone(), err));
                    break;
                }
            }
        }

        if let Some((failed_at, error)) = failure {
            // Inverse of the optimistic move, applied to the reordered view
            let moved = self.view_order.remove(target_index);
            self.view_order.insert(source_index, moved);
            warn!(failed_at = %failed_at, error = %error, "reorder persistence failed, view reverted");
            self.push_notice(
                Severity::Error,
                format!("Could not save the new order: {}", error),
            );
            return ReorderOutcome::RolledBack {
                succeeded_ids,
                failed_at,
                error,
            };
        }

        // Reconcile: overwrite stored positions for the new order, then
        // re-sort the whole working list so bookmarks hidden by the current
        // filter stay interleaved. A filtered reorder can collide with their
        // old positions, so density is not assumed here; the stable sort
        // keeps ties in place and the next fetch renormalizes.
        for (id, position) in &desired {
            if let Some(bookmark) = self.working.iter_mut().find(|b| &b.id == id) {
                bookmark.position = *position;
            }
        }
        self.working.sort_by_key(|b| b.position);
        info!(updated = succeeded_ids.len(), "reorder persisted");
        ReorderOutcome::Applied {
            updated: succeeded_ids.len(),
        }
    }

    /// Deletes a bookmark. An id not present in the working list is a no-op.
    /// On store failure the list is left untouched and a notice is queued.
    /// Remaining positions are not renumbered; the next fetch tolerates gaps.
    pub async fn delete(&mut self, id: &str) {
        if !self.working.iter().any(|b| b.id == id) {
            return;
        }
        match self.store.delete(id, &self.owner_id).await {
            Ok(()) => {
                self.working.retain(|b| b.id != id);
                self.rebuild_view();
                info!(%id, "bookmark deleted");
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                self.push_notice(Severity::Error, format!("Could not delete bookmark: {}", err));
            }
        }
    }

    // ─── Internals ───

    fn rebuild_view(&mut self) {
        self.view_order = self
            .working
            .iter()
            .filter(|b| matches_filters(b, &self.search_text, &self.selected_tags))
            .map(|b| b.id.clone())
            .collect();
    }

    fn push_notice(&mut self, severity: Severity, message: String) {
        self.notices.push(Notice::new(severity, message));
    }
}

/// Normalizes fetched records into the working list, preserving store order.
///
/// Positions must come back ascending; a missing position, or one that does
/// not increase on its predecessor's, falls back to the record's index in
/// the response. Gaps (e.g. after deletes) survive untouched.
pub fn normalize(records: Vec<BookmarkRecord>) -> Vec<Bookmark> {
    let mut out: Vec<Bookmark> = Vec::with_capacity(records.len());
    let mut previous: Option<i32> = None;
    for (index, record) in records.into_iter().enumerate() {
        let position = match record.position {
            Some(p) if previous.map_or(true, |q| p > q) => p,
            _ => index as i32,
        };
        previous = Some(position);
        out.push(Bookmark::from_record(record, position));
    }
    out
}

/// The distinct tags across a list, sorted lexicographically.
pub fn derive_tag_universe(bookmarks: &[Bookmark]) -> Vec<String> {
    let set: BTreeSet<&String> = bookmarks.iter().flat_map(|b| b.tags.iter()).collect();
    set.into_iter().cloned().collect()
}

/// Filter predicate: case-insensitive substring search over title, url, and
/// summary (any one match passes), AND at least one selected tag in common.
/// An empty search or empty tag set passes its half unconditionally.
pub fn matches_filters(bookmark: &Bookmark, search: &str, selected_tags: &HashSet<String>) -> bool {
    let search_ok = if search.is_empty() {
        true
    } else {
        let needle = search.to_lowercase();
        bookmark.title.to_lowercase().contains(&needle)
            || bookmark.url.to_lowercase().contains(&needle)
            || bookmark
                .summary
                .as_deref()
                .map_or(false, |s| s.to_lowercase().contains(&needle))
    };
    let tags_ok =
        selected_tags.is_empty() || bookmark.tags.iter().any(|t| selected_tags.contains(t));
    search_ok && tags_ok
}

/// Pure filter derivation over a list, in list order.
pub fn apply_filters<'a>(
    bookmarks: &'a [Bookmark],
    search: &str,
    selected_tags: &HashSet<String>,
) -> Vec<&'a Bookmark> {
    bookmarks
        .iter()
        .filter(|b| matches_filters(b, search, selected_tags))
        .collect()
}
