//! App core for LinkStash.
//!
//! Central struct owning the configuration, the remote store handle, the
//! add-bookmark workflow, and — while an owner is signed in — their
//! collection view model. Sign-in creates and loads the collection; sign-out
//! tears it down, which is the explicit lifecycle boundary the shared state
//! lives inside.

use std::sync::Arc;

use crate::config::Config;
use crate::managers::collection::Collection;
use crate::services::save_workflow::SaveWorkflow;
use crate::store::RemoteStore;
use crate::types::errors::{SaveError, StoreError};

/// Central application struct.
pub struct App {
    pub config: Config,
    store: Arc<dyn RemoteStore>,
    save_workflow: SaveWorkflow,
    collection: Option<Collection>,
}

impl App {
    /// Creates a new App over the given store. No owner is signed in yet.
    pub fn new(config: Config, store: Arc<dyn RemoteStore>) -> Self {
        let http = reqwest::Client::new();
        let save_workflow = SaveWorkflow::new(http, &config.summary_endpoint);
        Self {
            config,
            store,
            save_workflow,
            collection: None,
        }
    }

    /// Signs an owner in: creates their collection and runs the first fetch.
    /// Signing in while already signed in replaces the previous collection.
    pub async fn sign_in(&mut self, owner_id: &str) {
        let mut collection = Collection::new(self.store.clone(), owner_id);
        collection.refresh().await;
        self.collection = Some(collection);
    }

    /// Signs the current owner out, discarding their in-memory state.
    pub fn sign_out(&mut self) {
        self.collection = None;
    }

    /// The signed-in owner's collection, if any.
    pub fn collection(&self) -> Option<&Collection> {
        self.collection.as_ref()
    }

    pub fn collection_mut(&mut self) -> Option<&mut Collection> {
        self.collection.as_mut()
    }

    /// Runs the add-bookmark workflow for the signed-in owner, then
    /// refreshes the collection (the external refresh signal).
    pub async fn save_bookmark(
        &mut self,
        raw_url: &str,
        tags: Vec<String>,
    ) -> Result<String, SaveError> {
        let collection = self
            .collection
            .as_mut()
            .ok_or_else(|| SaveError::Store(StoreError::Auth("no owner signed in".to_string())))?;
        let position = collection.next_position();
        let owner_id = collection.owner_id().to_string();
        let id = self
            .save_workflow
            .save(self.store.as_ref(), &owner_id, raw_url, tags, position)
            .await?;
        collection.refresh().await;
        Ok(id)
    }
}
