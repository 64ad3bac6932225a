//! Keybinding registry: maps key events to actions, with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    /// Zero-based tab index; bound to the digit keys 1-9.
    JumpToTab(u8),
    CursorDown,
    CursorUp,
    PageDown,
    PageUp,
    ScrollTop,
    ToggleFavorite,
    OpenItem,
    ToggleTheme,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    CycleEngine,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NextTab => "Next tab",
            Self::PrevTab => "Previous tab",
            Self::JumpToTab(_) => "Jump to tab",
            Self::CursorDown => "Next link",
            Self::CursorUp => "Previous link",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ScrollTop => "Scroll to top",
            Self::ToggleFavorite => "Toggle favorite",
            Self::OpenItem => "Open link in browser",
            Self::ToggleTheme => "Toggle dark/light theme",
            Self::EnterSearch => "Search the web",
            Self::ExitSearch => "Cancel search",
            Self::CommitSearch => "Run search in browser",
            Self::CycleEngine => "Switch search engine",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Search,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Backspace", "Space"
/// - Modifier combos: "Ctrl+d", "Ctrl+u"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s.strip_prefix('F').or_else(|| s.strip_prefix('f')) {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=12)
                .contains(&n)
                .then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use KeyCode::{Char, Down, Enter, Esc, Left, Right, Tab, Up};

        let global = [
            (KeySpec::plain(Char('q')), Action::Quit),
            (KeySpec::plain(Char('l')), Action::NextTab),
            (KeySpec::plain(Right), Action::NextTab),
            (KeySpec::plain(Char('h')), Action::PrevTab),
            (KeySpec::plain(Left), Action::PrevTab),
            (KeySpec::plain(Char('j')), Action::CursorDown),
            (KeySpec::plain(Down), Action::CursorDown),
            (KeySpec::plain(Char('k')), Action::CursorUp),
            (KeySpec::plain(Up), Action::CursorUp),
            (KeySpec::ctrl('d'), Action::PageDown),
            (KeySpec::ctrl('u'), Action::PageUp),
            (KeySpec::plain(Char('g')), Action::ScrollTop),
            (KeySpec::plain(Char('f')), Action::ToggleFavorite),
            (KeySpec::plain(Char(' ')), Action::ToggleFavorite),
            (KeySpec::plain(Char('o')), Action::OpenItem),
            (KeySpec::plain(Enter), Action::OpenItem),
            (KeySpec::plain(Char('T')), Action::ToggleTheme),
            (KeySpec::plain(Char('/')), Action::EnterSearch),
            (KeySpec::plain(Char('?')), Action::ShowHelp),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        for (index, digit) in ('1'..='9').enumerate() {
            self.bind(
                Context::Global,
                KeySpec::plain(Char(digit)),
                Action::JumpToTab(index as u8),
            );
        }

        self.bind(Context::Search, KeySpec::plain(Esc), Action::ExitSearch);
        self.bind(Context::Search, KeySpec::plain(Enter), Action::CommitSearch);
        self.bind(Context::Search, KeySpec::plain(Tab), Action::CycleEngine);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_tab").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            // Drop the action's old keys, and whatever else held the new key
            self.lookup.retain(|_, a| *a != action);
            self.bindings
                .retain(|(c, k, a)| *a != action && !(*k == key && contexts.contains(c)));

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first, then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.context_action(code, modifiers, context).or_else(|| {
            (context != Context::Global)
                .then(|| self.context_action(code, modifiers, Context::Global))
                .flatten()
        })
    }

    /// Look up the action bound in exactly `context`, without falling back.
    pub fn context_action(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        self.lookup
            .get(&(context, KeySpec::new(code, modifiers)))
            .copied()
    }

    /// All bindings for the help screen, with consecutive keys for the same
    /// action merged ("j / Down").
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        let mut rows: Vec<(Context, String, Action, &'static str)> = Vec::new();
        for (ctx, key, action) in &self.bindings {
            let is_jump = matches!(action, Action::JumpToTab(_));
            let merge = rows.last().is_some_and(|last| {
                last.0 == *ctx
                    && (last.2 == *action || (is_jump && matches!(last.2, Action::JumpToTab(_))))
            });
            match rows.last_mut() {
                Some(last) if merge => {
                    last.1 = if is_jump {
                        format!("1-{}", format_key(key))
                    } else {
                        format!("{} / {}", last.1, format_key(key))
                    };
                }
                _ => rows.push((*ctx, format_key(key), *action, action.describe())),
            }
        }
        rows
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "next_tab" | "nexttab" => Some(Action::NextTab),
        "prev_tab" | "prevtab" | "previous_tab" => Some(Action::PrevTab),
        "cursor_down" | "cursordown" | "down" => Some(Action::CursorDown),
        "cursor_up" | "cursorup" | "up" => Some(Action::CursorUp),
        "page_down" | "pagedown" => Some(Action::PageDown),
        "page_up" | "pageup" => Some(Action::PageUp),
        "scroll_top" | "scrolltop" | "top" => Some(Action::ScrollTop),
        "toggle_favorite" | "togglefavorite" | "favorite" => Some(Action::ToggleFavorite),
        "open_item" | "openitem" | "open" => Some(Action::OpenItem),
        "toggle_theme" | "toggletheme" | "theme" => Some(Action::ToggleTheme),
        "enter_search" | "entersearch" | "search" => Some(Action::EnterSearch),
        "exit_search" | "exitsearch" => Some(Action::ExitSearch),
        "commit_search" | "commitsearch" => Some(Action::CommitSearch),
        "cycle_engine" | "cycleengine" | "engine" => Some(Action::CycleEngine),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_default_tab_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('l'), KeyModifiers::NONE, Context::Global),
            Some(Action::NextTab)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Left, KeyModifiers::NONE, Context::Global),
            Some(Action::PrevTab)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('1'), KeyModifiers::NONE, Context::Global),
            Some(Action::JumpToTab(0))
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('9'), KeyModifiers::NONE, Context::Global),
            Some(Action::JumpToTab(8))
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('0'), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_favorite_has_two_keys() {
        let reg = KeybindingRegistry::new();
        for c in ['f', ' '] {
            assert_eq!(
                reg.action_for_key(KeyCode::Char(c), KeyModifiers::NONE, Context::Global),
                Some(Action::ToggleFavorite)
            );
        }
    }

    #[test]
    fn test_ctrl_modifiers() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::PageDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_search_context_does_not_fall_back_when_exact() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.context_action(KeyCode::Tab, KeyModifiers::NONE, Context::Search),
            Some(Action::CycleEngine)
        );
        // Typing 'q' in the search bar must not quit
        assert_eq!(
            reg.context_action(KeyCode::Char('q'), KeyModifiers::NONE, Context::Search),
            None
        );
        // ...though the falling-back lookup does reach Global
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Search),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_enter_differs_by_context() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Global),
            Some(Action::OpenItem)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Search),
            Some(Action::CommitSearch)
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+q".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_replaces_all_keys_for_action() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("favorite".to_string(), "s".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('s'), KeyModifiers::NONE, Context::Global),
            Some(Action::ToggleFavorite)
        );
        for c in ['f', ' '] {
            assert_eq!(
                reg.action_for_key(KeyCode::Char(c), KeyModifiers::NONE, Context::Global),
                None
            );
        }
    }

    #[test]
    fn test_override_keeps_search_context() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("engine".to_string(), "F2".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(
            reg.context_action(KeyCode::F(2), KeyModifiers::NONE, Context::Search),
            Some(Action::CycleEngine)
        );
        assert_eq!(
            reg.context_action(KeyCode::F(2), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_override_steals_key_from_other_action() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "g".to_string())]);
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('g'), KeyModifiers::NONE, Context::Global),
            Some(Action::Quit)
        );
        // The help table no longer lists 'g' for scrolling
        assert!(!reg
            .all_bindings()
            .iter()
            .any(|(_, _, action, _)| *action == Action::ScrollTop));
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("refresh_all".to_string(), "r".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string())]);

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
        assert_eq!(parse_key_string("F12"), Some(KeySpec::plain(KeyCode::F(12))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("f"), Some(KeySpec::plain(KeyCode::Char('f'))));
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("♥"), Some(KeySpec::plain(KeyCode::Char('♥'))));
        assert_eq!(parse_key_string("qq"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Space");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }

    #[test]
    fn test_all_bindings_merges_rows() {
        let reg = KeybindingRegistry::new();
        let rows = reg.all_bindings();

        let favorite = rows
            .iter()
            .find(|r| r.2 == Action::ToggleFavorite)
            .unwrap();
        assert_eq!(favorite.1, "f / Space");

        let jump = rows
            .iter()
            .find(|r| matches!(r.2, Action::JumpToTab(_)))
            .unwrap();
        assert_eq!(jump.1, "1-9");
        assert_eq!(
            rows.iter()
                .filter(|r| matches!(r.2, Action::JumpToTab(_)))
                .count(),
            1
        );
    }
}
