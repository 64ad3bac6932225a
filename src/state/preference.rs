use std::marker::PhantomData;

use crate::storage::KeyValueStore;

/// A value that can live in the key-value store as a string.
pub trait PreferenceValue: Sized {
    fn encode(&self) -> String;

    /// `None` means the stored text is malformed and must be treated as unset.
    fn decode(raw: &str) -> Option<Self>;
}

/// One typed key in a [`KeyValueStore`].
///
/// Reads never fail: a missing key, a malformed value, or a storage error all
/// yield the caller's fallback. Writes are best-effort; failures are logged
/// and otherwise ignored so the in-memory state stays authoritative.
pub struct PersistentPreference<S, T> {
    store: S,
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<S: KeyValueStore, T: PreferenceValue> PersistentPreference<S, T> {
    pub fn new(store: S, key: &'static str) -> Self {
        Self {
            store,
            key,
            _value: PhantomData,
        }
    }

    /// The stored value, or `None` if absent, malformed, or unreadable.
    pub async fn load_stored(&self) -> Option<T> {
        let raw = match self.store.get(self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read preference, using default");
                return None;
            }
        };

        let decoded = T::decode(&raw);
        if decoded.is_none() {
            tracing::warn!(key = %self.key, "Stored preference is malformed, treating as unset");
        }
        decoded
    }

    /// The stored value, or `fallback`.
    pub async fn load(&self, fallback: T) -> T {
        self.load_stored().await.unwrap_or(fallback)
    }

    /// Write `value`. Completes after the store has accepted (or refused) it.
    pub async fn save(&self, value: &T) {
        if let Err(e) = self.store.set(self.key, &value.encode()).await {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist preference");
        }
    }
}
