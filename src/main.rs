//! LinkStash — bookmark collection manager demo binary.
//!
//! Runs the collection view model against a seeded in-memory store and walks
//! through fetch, filter, reorder, rollback, and delete. Point the config at
//! a real backend (`LINKSTASH_STORE_URL`) to use `RestStore` instead.

use std::sync::Arc;

use linkstash::config::Config;
use linkstash::managers::collection::{Collection, ReorderOutcome};
use linkstash::store::{MemoryStore, RemoteStore, RestStore};
use linkstash::types::bookmark::BookmarkRecord;

const OWNER: &str = "demo-owner";

fn record(id: &str, url: &str, title: &str, tags: &[&str], position: Option<i32>) -> BookmarkRecord {
    BookmarkRecord {
        id: id.to_string(),
        url: url.to_string(),
        title: title.to_string(),
        favicon_url: None,
        summary: Some(format!("Saved page: {}", title)),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: 0,
        position,
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn print_view(collection: &Collection) {
    for bookmark in collection.filtered() {
        println!("  [{}] {} — {}", bookmark.position, bookmark.title, bookmark.url);
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkstash=info".into()),
        )
        .init();

    let config = Config::load();
    if !config.store_api_key.is_empty() {
        // An API key means a real backend is configured; list it and exit.
        let store: Arc<dyn RemoteStore> = Arc::new(RestStore::new(&config, reqwest::Client::new()));
        let owner = std::env::var("LINKSTASH_OWNER_ID").unwrap_or_else(|_| OWNER.to_string());
        let mut collection = Collection::new(store, &owner);
        collection.refresh().await;
        section("Hosted Store");
        println!("  {} bookmarks for {}", collection.len(), owner);
        print_view(&collection);
        for notice in collection.take_notices() {
            println!("  notice ({:?}): {}", notice.severity, notice.message);
        }
        return;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              LinkStash v{} — Demo Mode                    ║", env!("CARGO_PKG_VERSION"));
    println!("║     Searchable, tag-filterable, drag-reorderable grid        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let store = Arc::new(MemoryStore::new());
    store.seed(OWNER, record("a", "https://github.com/rust-lang/rust", "GitHub — rust-lang", &["work", "rust"], None));
    store.seed(OWNER, record("b", "https://docs.rs", "Docs.rs", &["rust"], Some(1)));
    store.seed(OWNER, record("c", "https://news.ycombinator.com", "Hacker News", &["reading"], Some(0)));

    section("Fetch & Normalize");
    let mut collection = Collection::new(store.clone(), OWNER);
    collection.refresh().await;
    println!("  Loaded {} bookmarks, tag universe: {:?}", collection.len(), collection.tag_universe());
    print_view(&collection);
    println!("  ✓ missing/out-of-order positions normalized to store order");
    println!();

    section("Filter Derivation");
    collection.set_search_text("github");
    println!("  search \"github\" → {} match(es)", collection.filtered().len());
    collection.set_search_text("");
    collection.toggle_tag("rust");
    println!("  tag chip \"rust\" → {} match(es)", collection.filtered().len());
    collection.toggle_tag("rust");
    println!("  ✓ clearing filters restores the full view ({} bookmarks)", collection.filtered().len());
    println!();

    section("Reorder & Persist");
    let first = collection.filtered()[0].id.clone();
    let last = collection.filtered()[2].id.clone();
    match collection.reorder(&first, &last).await {
        ReorderOutcome::Applied { updated } => println!("  moved first → last, {} positions persisted", updated),
        other => println!("  unexpected outcome: {:?}", other),
    }
    print_view(&collection);
    println!();

    section("Rollback on Persistence Failure");
    store.fail_updates_after(1);
    let first = collection.filtered()[0].id.clone();
    let last = collection.filtered()[2].id.clone();
    match collection.reorder(&first, &last).await {
        ReorderOutcome::RolledBack { succeeded_ids, failed_at, .. } => {
            println!("  write for {} failed after {} success(es) — view reverted", failed_at, succeeded_ids.len());
        }
        other => println!("  unexpected outcome: {:?}", other),
    }
    print_view(&collection);
    for notice in collection.take_notices() {
        println!("  notice ({:?}): {}", notice.severity, notice.message);
    }
    println!();

    section("Delete");
    let doomed = collection.filtered()[0].id.clone();
    collection.delete(&doomed).await;
    println!("  deleted {} → {} bookmarks remain (positions keep their gaps)", doomed, collection.len());
    print_view(&collection);
    println!();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Collection view model demonstrated successfully!");
    println!("═══════════════════════════════════════════════════════════════");
}
