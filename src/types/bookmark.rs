use serde::{Deserialize, Serialize};

/// A bookmark as the remote store returns it.
///
/// `position` is nullable on the wire: the backend may not have backfilled
/// the field for records created before ordering existed. Normalization into
/// a [`Bookmark`] happens in the collection view model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub favicon_url: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub position: Option<i32>,
}

/// A normalized in-memory bookmark. No field is mutated after creation
/// except `position`, which only the reorder protocol rewrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub favicon_url: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub position: i32,
}

impl Bookmark {
    /// Builds a normalized bookmark from a wire record and a resolved position.
    pub fn from_record(record: BookmarkRecord, position: i32) -> Self {
        Self {
            id: record.id,
            url: record.url,
            title: record.title,
            favicon_url: record.favicon_url,
            summary: record.summary,
            tags: record.tags,
            created_at: record.created_at,
            position,
        }
    }
}

/// Insert payload for a new bookmark. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub favicon_url: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub position: i32,
}
