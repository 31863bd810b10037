//! Intent dispatcher for the LinkStash presentation boundary.
//!
//! The UI process drives the core through JSON method calls. `handle_intent`
//! dispatches a method name and params to the [`App`], returning a JSON value
//! on success or an error message string. The app sits behind one async
//! mutex held across the awaited store calls, so intents — including two
//! overlapping reorder gestures — are serialized here, at the caller side of
//! the collection.

use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::app::App;
use crate::managers::collection::ReorderOutcome;
use crate::types::bookmark::Bookmark;

fn bookmark_json(bookmark: &Bookmark) -> Value {
    json!({
        "id": bookmark.id,
        "url": bookmark.url,
        "title": bookmark.title,
        "favicon_url": bookmark.favicon_url,
        "summary": bookmark.summary,
        "tags": bookmark.tags,
        "created_at": bookmark.created_at,
        "position": bookmark.position,
    })
}

/// Dispatch an intent to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_intent(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Session ───
        "session.sign_in" => {
            let owner_id = params
                .get("owner_id")
                .and_then(|v| v.as_str())
                .ok_or("missing owner_id")?;
            let mut a = app.lock().await;
            a.sign_in(owner_id).await;
            Ok(json!({"ok": true}))
        }
        "session.sign_out" => {
            let mut a = app.lock().await;
            a.sign_out();
            Ok(json!({"ok": true}))
        }

        // ─── Collection ───
        "collection.view" => {
            let a = app.lock().await;
            let collection = a.collection().ok_or("no owner signed in")?;
            let arr: Vec<Value> = collection.filtered().iter().map(|b| bookmark_json(b)).collect();
            Ok(json!({
                "loading": collection.is_loading(),
                "bookmarks": arr,
            }))
        }
        "collection.tags" => {
            let a = app.lock().await;
            let collection = a.collection().ok_or("no owner signed in")?;
            Ok(json!({
                "universe": collection.tag_universe(),
                "selected": collection.selected_tags().iter().collect::<Vec<_>>(),
            }))
        }
        "collection.search" => {
            let text = params
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or("missing text")?;
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            collection.set_search_text(text);
            Ok(json!({"count": collection.filtered().len()}))
        }
        "collection.toggle_tag" => {
            let tag = params
                .get("tag")
                .and_then(|v| v.as_str())
                .ok_or("missing tag")?;
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            collection.toggle_tag(tag);
            Ok(json!({"count": collection.filtered().len()}))
        }
        "collection.refresh" => {
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            collection.refresh().await;
            Ok(json!({"count": collection.len()}))
        }
        "collection.reorder" => {
            let source_id = params
                .get("source_id")
                .and_then(|v| v.as_str())
                .ok_or("missing source_id")?;
            let target_id = params
                .get("target_id")
                .and_then(|v| v.as_str())
                .ok_or("missing target_id")?;
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            let outcome = collection.reorder(source_id, target_id).await;
            let value = match outcome {
                ReorderOutcome::Noop => json!({"outcome": "noop"}),
                ReorderOutcome::Applied { updated } => {
                    json!({"outcome": "applied", "updated": updated})
                }
                ReorderOutcome::RolledBack {
                    succeeded_ids,
                    failed_at,
                    error,
                } => json!({
                    "outcome": "rolled_back",
                    "succeeded_ids": succeeded_ids,
                    "failed_at": failed_at,
                    "error": error.to_string(),
                }),
            };
            Ok(value)
        }
        "collection.delete" => {
            let id = params
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or("missing id")?;
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            collection.delete(id).await;
            Ok(json!({"count": collection.len()}))
        }
        "collection.notices" => {
            let mut a = app.lock().await;
            let collection = a.collection_mut().ok_or("no owner signed in")?;
            let notices = collection.take_notices();
            serde_json::to_value(notices).map_err(|e| e.to_string())
        }

        // ─── Bookmarks ───
        "bookmark.save" => {
            let url = params
                .get("url")
                .and_then(|v| v.as_str())
                .ok_or("missing url")?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("invalid url: must start with http:// or https://".to_string());
            }
            let tags: Vec<String> = params
                .get("tags")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let mut a = app.lock().await;
            let id = a.save_bookmark(url, tags).await.map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
