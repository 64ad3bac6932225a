use super::preference::{PersistentPreference, PreferenceValue};
use crate::storage::KeyValueStore;
use crate::theme::ThemeVariant;

/// Storage key for the theme preference.
pub const THEME_KEY: &str = "nexus.theme";

impl PreferenceValue for ThemeVariant {
    fn encode(&self) -> String {
        match self {
            ThemeVariant::Dark => "dark".to_string(),
            ThemeVariant::Light => "light".to_string(),
        }
    }

    fn decode(raw: &str) -> Option<Self> {
        ThemeVariant::from_str_name(raw.trim())
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// The host's "prefers dark" signal, if it exposes one.
pub trait HostAppearance {
    fn prefers_dark(&self) -> Option<bool>;
}

/// Applies a theme to the presentation layer.
pub trait ThemePresenter {
    fn apply(&mut self, variant: ThemeVariant);
}

/// Host signal for terminals: an explicit config choice, else `COLORFGBG`.
///
/// `COLORFGBG` is set by rxvt, Konsole, iTerm2 and others as `fg;bg` (or
/// `fg;default;bg`) using the 16-color ANSI indices.
#[derive(Debug, Clone, Default)]
pub struct TerminalAppearance {
    configured: Option<ThemeVariant>,
    colorfgbg: Option<String>,
}

impl TerminalAppearance {
    /// Read the environment. `configured` is the `theme` value from
    /// config.toml: `"dark"`, `"light"`, or `"auto"` to defer to the terminal.
    pub fn detect(configured: &str) -> Self {
        Self::from_parts(configured, std::env::var("COLORFGBG").ok())
    }

    pub fn from_parts(configured: &str, colorfgbg: Option<String>) -> Self {
        let configured = match configured.trim() {
            "" => None,
            s if s.eq_ignore_ascii_case("auto") => None,
            s => {
                let parsed = ThemeVariant::from_str_name(s);
                if parsed.is_none() {
                    tracing::warn!(theme = %s, "Unknown theme in config, falling back to auto");
                }
                parsed
            }
        };
        Self {
            configured,
            colorfgbg,
        }
    }
}

impl HostAppearance for TerminalAppearance {
    fn prefers_dark(&self) -> Option<bool> {
        if let Some(variant) = self.configured {
            return Some(variant.is_dark());
        }
        self.colorfgbg.as_deref().and_then(parse_colorfgbg)
    }
}

/// Background index 0-6 and 8 are dark colors; 7 and 9-15 are light.
fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(true),
        7 | 9..=15 => Some(false),
        _ => None,
    }
}

// ============================================================================
// ThemePreference
// ============================================================================

/// The persisted dark/light preference.
pub struct ThemePreference<S> {
    pref: PersistentPreference<S, ThemeVariant>,
    variant: ThemeVariant,
}

impl<S: KeyValueStore> ThemePreference<S> {
    /// Resolve the initial theme and apply it.
    ///
    /// Precedence: stored preference, then the host signal, then light.
    /// A value not taken from the store is written back to it.
    pub async fn initialize(
        store: S,
        host: &impl HostAppearance,
        presenter: &mut impl ThemePresenter,
    ) -> Self {
        let pref = PersistentPreference::new(store, THEME_KEY);
        let (variant, source) = match pref.load_stored().await {
            Some(stored) => (stored, "stored"),
            None => match host.prefers_dark() {
                Some(dark) => (ThemeVariant::from_dark(dark), "host"),
                None => (ThemeVariant::Light, "default"),
            },
        };
        tracing::debug!(theme = variant.name(), source, "Resolved initial theme");

        presenter.apply(variant);
        if source != "stored" {
            pref.save(&variant).await;
        }
        Self { pref, variant }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn is_dark(&self) -> bool {
        self.variant.is_dark()
    }

    /// Update, persist, then apply.
    pub async fn set_theme(&mut self, variant: ThemeVariant, presenter: &mut impl ThemePresenter) {
        self.variant = variant;
        self.pref.save(&variant).await;
        presenter.apply(variant);
    }

    /// Switch to the other variant and return it.
    pub async fn toggle(&mut self, presenter: &mut impl ThemePresenter) -> ThemeVariant {
        let next = self.variant.next();
        self.set_theme(next, presenter).await;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::FailingStore;
    use crate::storage::MemoryStore;

    struct FixedHost(Option<bool>);

    impl HostAppearance for FixedHost {
        fn prefers_dark(&self) -> Option<bool> {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        applied: Vec<ThemeVariant>,
    }

    impl ThemePresenter for RecordingPresenter {
        fn apply(&mut self, variant: ThemeVariant) {
            self.applied.push(variant);
        }
    }

    #[tokio::test]
    async fn test_stored_value_wins_over_host() {
        let store = MemoryStore::new().with_entry(THEME_KEY, "light");
        let mut presenter = RecordingPresenter::default();
        let theme = ThemePreference::initialize(store, &FixedHost(Some(true)), &mut presenter).await;
        assert_eq!(theme.variant(), ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_host_signal_used_when_nothing_stored() {
        let mut presenter = RecordingPresenter::default();
        let theme =
            ThemePreference::initialize(MemoryStore::new(), &FixedHost(Some(true)), &mut presenter)
                .await;
        assert!(theme.is_dark());
    }

    #[tokio::test]
    async fn test_defaults_to_light_without_signal() {
        let mut presenter = RecordingPresenter::default();
        let theme =
            ThemePreference::initialize(MemoryStore::new(), &FixedHost(None), &mut presenter).await;
        assert!(!theme.is_dark());
    }

    #[tokio::test]
    async fn test_malformed_stored_value_falls_through_to_host() {
        let store = MemoryStore::new().with_entry(THEME_KEY, "solarized");
        let mut presenter = RecordingPresenter::default();
        let theme = ThemePreference::initialize(store, &FixedHost(Some(true)), &mut presenter).await;
        assert_eq!(theme.variant(), ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_unreadable_store_falls_through_to_host() {
        let mut presenter = RecordingPresenter::default();
        let theme = ThemePreference::initialize(
            FailingStore::default(),
            &FixedHost(Some(false)),
            &mut presenter,
        )
        .await;
        assert_eq!(theme.variant(), ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_initialize_applies_resolved_theme() {
        let mut presenter = RecordingPresenter::default();
        ThemePreference::initialize(MemoryStore::new(), &FixedHost(Some(true)), &mut presenter)
            .await;
        assert_eq!(presenter.applied, vec![ThemeVariant::Dark]);
    }

    #[tokio::test]
    async fn test_initialize_persists_resolved_theme() {
        let store = MemoryStore::new();
        let mut presenter = RecordingPresenter::default();
        ThemePreference::initialize(store.clone(), &FixedHost(Some(true)), &mut presenter).await;
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("dark"));

        let other = MemoryStore::new();
        ThemePreference::initialize(other.clone(), &FixedHost(None), &mut presenter).await;
        assert_eq!(other.raw(THEME_KEY).as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_first_launch_theme_outlives_host_change() {
        let store = MemoryStore::new();
        let mut presenter = RecordingPresenter::default();
        ThemePreference::initialize(store.clone(), &FixedHost(Some(true)), &mut presenter).await;

        let theme =
            ThemePreference::initialize(store.clone(), &FixedHost(Some(false)), &mut presenter)
                .await;
        assert_eq!(theme.variant(), ThemeVariant::Dark);
        assert_eq!(presenter.applied, vec![ThemeVariant::Dark, ThemeVariant::Dark]);
    }

    #[tokio::test]
    async fn test_set_theme_persists_and_applies() {
        let store = MemoryStore::new();
        let mut presenter = RecordingPresenter::default();
        let mut theme =
            ThemePreference::initialize(store.clone(), &FixedHost(None), &mut presenter).await;

        theme.set_theme(ThemeVariant::Dark, &mut presenter).await;
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(presenter.applied, vec![ThemeVariant::Light, ThemeVariant::Dark]);
    }

    #[tokio::test]
    async fn test_set_theme_survives_reload() {
        let store = MemoryStore::new();
        let mut presenter = RecordingPresenter::default();
        let mut theme =
            ThemePreference::initialize(store.clone(), &FixedHost(None), &mut presenter).await;
        theme.set_theme(ThemeVariant::Dark, &mut presenter).await;
        drop(theme);

        // Host now says light; the stored choice must still win.
        let reloaded =
            ThemePreference::initialize(store, &FixedHost(Some(false)), &mut presenter).await;
        assert!(reloaded.is_dark());
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists() {
        let store = MemoryStore::new().with_entry(THEME_KEY, "dark");
        let mut presenter = RecordingPresenter::default();
        let mut theme =
            ThemePreference::initialize(store.clone(), &FixedHost(None), &mut presenter).await;

        assert_eq!(theme.toggle(&mut presenter).await, ThemeVariant::Light);
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(theme.toggle(&mut presenter).await, ThemeVariant::Dark);
        assert_eq!(store.raw(THEME_KEY).as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_write_failure_still_applies() {
        let mut presenter = RecordingPresenter::default();
        let mut theme =
            ThemePreference::initialize(FailingStore::default(), &FixedHost(None), &mut presenter)
                .await;
        theme.set_theme(ThemeVariant::Dark, &mut presenter).await;
        assert!(theme.is_dark());
        assert_eq!(presenter.applied.last(), Some(&ThemeVariant::Dark));
    }

    #[test]
    fn test_parse_colorfgbg() {
        assert_eq!(parse_colorfgbg("15;0"), Some(true));
        assert_eq!(parse_colorfgbg("0;15"), Some(false));
        assert_eq!(parse_colorfgbg("12;default;8"), Some(true));
        assert_eq!(parse_colorfgbg("0;7"), Some(false));
        assert_eq!(parse_colorfgbg("0;default"), None);
        assert_eq!(parse_colorfgbg("garbage"), None);
        assert_eq!(parse_colorfgbg("0;200"), None);
    }

    #[test]
    fn test_terminal_appearance_config_overrides_env() {
        let host = TerminalAppearance::from_parts("light", Some("15;0".into()));
        assert_eq!(host.prefers_dark(), Some(false));

        let host = TerminalAppearance::from_parts("auto", Some("15;0".into()));
        assert_eq!(host.prefers_dark(), Some(true));

        let host = TerminalAppearance::from_parts("AUTO", None);
        assert_eq!(host.prefers_dark(), None);

        // Unknown config values behave like auto
        let host = TerminalAppearance::from_parts("neon", Some("0;15".into()));
        assert_eq!(host.prefers_dark(), Some(false));
    }

    #[test]
    fn test_theme_encoding() {
        assert_eq!(ThemeVariant::Dark.encode(), "dark");
        assert_eq!(ThemeVariant::Light.encode(), "light");
        assert_eq!(ThemeVariant::decode(" Dark "), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::decode("purple"), None);
    }
}
