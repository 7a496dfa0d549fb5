//! # Trash Index
//!
//! In-memory [`TrashOracle`] built from one listing of the trash album.

use bridge_traits::{Album, PhotoIdentity, RemoteItem, RemoteStore, TrashOracle};
use std::collections::HashSet;
use tracing::debug;

use crate::error::Result;

/// Set of identities found in the trash album
#[derive(Debug, Clone, Default)]
pub struct TrashIndex {
    identities: HashSet<PhotoIdentity>,
}

impl TrashIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// List `trash_album` once and index every item it holds.
    ///
    /// An album that does not exist remotely yet yields an empty index.
    pub async fn load(store: &dyn RemoteStore, trash_album: &Album) -> Result<Self> {
        if !trash_album.exists_remotely() {
            return Ok(Self::new());
        }

        let items = store.list_items(trash_album).await?;
        let index = Self::from_items(store, &items);
        debug!(items = index.len(), "Loaded trash index");
        Ok(index)
    }

    pub fn from_items(store: &dyn RemoteStore, items: &[RemoteItem]) -> Self {
        Self {
            identities: items.iter().map(|item| store.item_identity(item)).collect(),
        }
    }

    pub fn insert(&mut self, identity: PhotoIdentity) {
        self.identities.insert(identity);
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl TrashOracle for TrashIndex {
    fn is_in_trash(&self, identity: &PhotoIdentity) -> bool {
        self.identities.contains(identity)
    }
}
