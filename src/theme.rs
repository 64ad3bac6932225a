//! Theme palettes for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// The other variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Page --
    pub page: Style,
    pub hero_title: Style,
    pub hero_subtitle: Style,

    // -- Tabs --
    pub tab_normal: Style,
    pub tab_active: Style,

    // -- Sections --
    pub section_title: Style,
    pub item_title: Style,
    pub item_selected: Style,
    pub item_description: Style,
    pub item_url: Style,
    pub favorite_marker: Style,
    pub empty_state: Style,

    // -- Chrome --
    pub navbar_logo: Style,
    pub search_input: Style,
    pub search_engine: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            page: Style::default().fg(Color::White).bg(Color::Black),
            hero_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            hero_subtitle: Style::default().fg(Color::Gray),

            tab_normal: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .bg(Color::White)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            section_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            item_title: Style::default().fg(Color::White),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_description: Style::default().fg(Color::Gray),
            item_url: Style::default().fg(Color::Cyan),
            favorite_marker: Style::default().fg(Color::LightRed),
            empty_state: Style::default().fg(Color::DarkGray),

            navbar_logo: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            search_input: Style::default().fg(Color::White),
            search_engine: Style::default().fg(Color::Yellow),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Magenta),
        }
    }

    fn light() -> Self {
        Self {
            page: Style::default().fg(Color::Black).bg(Color::White),
            hero_title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            hero_subtitle: Style::default().fg(Color::DarkGray),

            tab_normal: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .bg(Color::Black)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            section_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            item_title: Style::default().fg(Color::Black),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_description: Style::default().fg(Color::DarkGray),
            item_url: Style::default().fg(Color::Blue),
            favorite_marker: Style::default().fg(Color::Red),
            empty_state: Style::default().fg(Color::Gray),

            navbar_logo: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            search_input: Style::default().fg(Color::Black),
            search_engine: Style::default().fg(Color::Magenta),
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 18] = [
    "page",
    "hero_title",
    "hero_subtitle",
    "tab_normal",
    "tab_active",
    "section_title",
    "item_title",
    "item_selected",
    "item_description",
    "item_url",
    "favorite_marker",
    "empty_state",
    "navbar_logo",
    "search_input",
    "search_engine",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 18] = [
            p.page,
            p.hero_title,
            p.hero_subtitle,
            p.tab_normal,
            p.tab_active,
            p.section_title,
            p.item_title,
            p.item_selected,
            p.item_description,
            p.item_url,
            p.favorite_marker,
            p.empty_state,
            p.navbar_logo,
            p.search_input,
            p.search_engine,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
