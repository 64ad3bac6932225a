//! View state and its persistence.
//!
//! - `preference` - typed wrapper over a [`KeyValueStore`](crate::storage::KeyValueStore)
//! - `favorites` - the persisted set of favorited item ids
//! - `theme` - the persisted dark/light preference and its host default
//! - `selection` - the active tab and scroll repositioning on tab change
//! - `projector` - pure derivation of the sections to render

mod favorites;
mod preference;
mod projector;
mod selection;
mod theme;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use preference::{PersistentPreference, PreferenceValue};
pub use projector::{empty_state, project, EmptyState, Section};
pub use selection::{
    reposition_target, Selection, Tab, ViewSelector, Viewport, FAVORITES_ID, HEADER_HEIGHT,
};
pub use theme::{HostAppearance, TerminalAppearance, ThemePreference, ThemePresenter, THEME_KEY};

#[cfg(test)]
pub(crate) mod test_support {
    use anyhow::{anyhow, Result};
    use std::cell::Cell;

    use crate::storage::KeyValueStore;

    /// A store whose reads and writes always fail.
    #[derive(Debug, Default)]
    pub struct FailingStore {
        pub writes_attempted: Cell<usize>,
    }

    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("storage unavailable"))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            self.writes_attempted.set(self.writes_attempted.get() + 1);
            Err(anyhow!("quota exceeded"))
        }
    }
}
