//! Key-value storage seam used by the persisted preferences.
//!
//! Production code hands the SQLite-backed [`Database`] to the preference
//! types; tests hand them a [`MemoryStore`]. Both are cheap to clone and
//! share their backing data across clones, so a "reload" is simply building a
//! fresh preference object over a clone of the same store.

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema::Database;

/// A durable string-to-string store.
///
/// Writes must be visible to a subsequent `get` once the returned future
/// completes.
#[allow(async_fn_in_trait)] // Used through generics only, never as `dyn`.
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore> KeyValueStore for &S {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_preference(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_preference(key, value).await
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store for tests and for running without a database.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing any encoding.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.lock().insert(key.to_string(), value.to_string());
        self
    }

    /// Raw stored value for `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_shares_data_across_clones() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("nexus.theme", "dark").await.unwrap();
        assert_eq!(other.get("nexus.theme").await.unwrap(), Some("dark".into()));
    }

    #[tokio::test]
    async fn test_memory_store_with_entry_seeds_raw_value() {
        let store = MemoryStore::new().with_entry("nexus.favorites", "not json");
        assert_eq!(store.raw("nexus.favorites").as_deref(), Some("not json"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_database_implements_key_value_store() {
        let db = Database::open(":memory:").await.unwrap();
        KeyValueStore::set(&db, "nexus.theme", "light").await.unwrap();
        assert_eq!(
            KeyValueStore::get(&db, "nexus.theme").await.unwrap(),
            Some("light".to_string())
        );
        assert_eq!(
            db.get_preference("nexus.theme").await.unwrap(),
            Some("light".to_string())
        );
    }
}
