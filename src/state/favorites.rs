use std::collections::HashSet;

use super::preference::{PersistentPreference, PreferenceValue};
use crate::storage::KeyValueStore;

/// Storage key for the favorites set.
pub const FAVORITES_KEY: &str = "nexus.favorites";

/// Stored as a JSON array of ids. Written sorted so the stored text is
/// stable; read back into a set, which drops duplicates.
impl PreferenceValue for HashSet<String> {
    fn encode(&self) -> String {
        let mut ids: Vec<&str> = self.iter().map(String::as_str).collect();
        ids.sort_unstable();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<Vec<String>>(raw)
            .ok()
            .map(|ids| ids.into_iter().collect())
    }
}

/// The user's favorited item ids.
///
/// Ids are never reconciled against the catalog: an id whose item has been
/// removed simply matches nothing.
pub struct FavoritesStore<S> {
    pref: PersistentPreference<S, HashSet<String>>,
    ids: HashSet<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load the set from `store`; absent or malformed data yields an empty set.
    pub async fn load(store: S) -> Self {
        let pref = PersistentPreference::new(store, FAVORITES_KEY);
        let ids = pref.load(HashSet::new()).await;
        tracing::debug!(count = ids.len(), "Loaded favorites");
        Self { pref, ids }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Add `id` if absent, remove it if present, then persist the whole set.
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub async fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.pref.save(&self.ids).await;
        tracing::debug!(id = %id, favorite = now_favorite, "Toggled favorite");
        now_favorite
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
