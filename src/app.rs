use crate::catalog::{Catalog, Item};
use crate::config::Config;
use crate::keybindings::KeybindingRegistry;
use crate::search::{search_url, SearchEngine};
use crate::state::{
    empty_state, project, EmptyState, FavoritesStore, HostAppearance, Section, Selection,
    ThemePreference, ThemePresenter, ViewSelector, Viewport,
};
use crate::storage::Database;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;
use url::Url;

/// How long a status bar message stays up.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Page layout
// ============================================================================

/// Rows per item: title line, then description/url line.
pub const ITEM_HEIGHT: usize = 2;
/// Rows of the placeholder shown for an empty projection.
pub const EMPTY_STATE_HEIGHT: usize = 3;

/// Row positions of everything on the scrolling page.
///
/// The page is a hero banner half the viewport tall, followed by each section:
/// one title row, its items, and a blank spacer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub hero_height: usize,
    /// First row of each section's title.
    pub section_rows: Vec<usize>,
    /// First row of each item, in projection order.
    pub item_rows: Vec<usize>,
    pub total_height: usize,
}

impl PageLayout {
    pub fn compute(sections: &[Section<'_>], viewport_height: usize) -> Self {
        let hero_height = viewport_height / 2;
        let mut row = hero_height;
        let mut section_rows = Vec::with_capacity(sections.len());
        let mut item_rows = Vec::new();

        if sections.is_empty() {
            row += EMPTY_STATE_HEIGHT;
        } else {
            for section in sections {
                section_rows.push(row);
                row += 1;
                for _ in &section.items {
                    item_rows.push(row);
                    row += ITEM_HEIGHT;
                }
                row += 1;
            }
        }

        Self {
            hero_height,
            section_rows,
            item_rows,
            total_height: row,
        }
    }
}

/// Vertical scroll state of the page below the tab bar.
///
/// `height` and `content_height` are refreshed by every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageScroll {
    pub offset: usize,
    pub height: usize,
    pub content_height: usize,
}

impl PageScroll {
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.height)
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

impl Viewport for PageScroll {
    fn scroll_offset(&self) -> usize {
        self.offset
    }

    fn viewport_height(&self) -> usize {
        self.height
    }

    fn scroll_to(&mut self, offset: usize) {
        self.offset = offset;
    }
}

// ============================================================================
// Appearance
// ============================================================================

/// The active theme as seen by the renderer.
#[derive(Debug, Clone)]
pub struct Appearance {
    pub variant: ThemeVariant,
    pub styles: StyleMap,
}

impl Appearance {
    pub fn new(variant: ThemeVariant) -> Self {
        Self {
            variant,
            styles: StyleMap::from_palette(&variant.palette()),
        }
    }
}

impl ThemePresenter for Appearance {
    fn apply(&mut self, variant: ThemeVariant) {
        self.variant = variant;
        self.styles = StyleMap::from_palette(&variant.palette());
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub catalog: Catalog,
    pub favorites: FavoritesStore<Database>,
    pub theme: ThemePreference<Database>,
    pub appearance: Appearance,
    pub keybindings: KeybindingRegistry,

    // View
    pub selector: ViewSelector,
    pub page: PageScroll,
    /// Index of the highlighted item within the current projection.
    pub cursor: usize,

    // Search bar
    pub search_mode: bool,
    pub search_input: String,
    pub search_engine: SearchEngine,

    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    /// Load persisted preferences from `db` and build the initial view.
    pub async fn new(
        db: Database,
        catalog: Catalog,
        config: &Config,
        host: &impl HostAppearance,
    ) -> Self {
        let mut appearance = Appearance::new(ThemeVariant::Light);
        let theme = ThemePreference::initialize(db.clone(), host, &mut appearance).await;
        let favorites = FavoritesStore::load(db).await;

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Ignoring keybinding override");
        }

        let search_engine = SearchEngine::from_str_name(&config.search_engine).unwrap_or_else(|| {
            tracing::warn!(engine = %config.search_engine, "Unknown search engine, using Baidu");
            SearchEngine::Baidu
        });

        let selector = ViewSelector::new(&catalog);

        Self {
            catalog,
            favorites,
            theme,
            appearance,
            keybindings,
            selector,
            page: PageScroll::default(),
            cursor: 0,
            search_mode: false,
            search_input: String::new(),
            search_engine,
            show_help: false,
            help_scroll_offset: 0,
            status_message: warnings
                .into_iter()
                .next()
                .map(|w| (Cow::Owned(w), Instant::now())),
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.appearance.styles.resolve(role)
    }

    /// Sections for the active tab.
    pub fn sections(&self) -> Vec<Section<'_>> {
        project(&self.catalog, self.selector.active(), self.favorites.ids())
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        empty_state(self.selector.active(), &self.sections())
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout::compute(&self.sections(), self.page.height)
    }

    pub fn item_count(&self) -> usize {
        self.sections().iter().map(|s| s.items.len()).sum()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.sections()
            .into_iter()
            .flat_map(|s| s.items)
            .nth(self.cursor)
    }

    // ------------------------------------------------------------------------
    // Tabs
    // ------------------------------------------------------------------------

    pub fn select_tab(&mut self, selection: Selection) {
        self.selector.select(selection, &mut self.page);
        self.after_tab_change();
    }

    pub fn next_tab(&mut self) {
        self.selector.next(&self.catalog, &mut self.page);
        self.after_tab_change();
    }

    pub fn prev_tab(&mut self) {
        self.selector.previous(&self.catalog, &mut self.page);
        self.after_tab_change();
    }

    /// Returns false if there is no tab at `index`.
    pub fn jump_to_tab(&mut self, index: usize) -> bool {
        let moved = self
            .selector
            .select_index(&self.catalog, index, &mut self.page);
        if moved {
            self.after_tab_change();
        }
        moved
    }

    fn after_tab_change(&mut self) {
        self.cursor = 0;
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Cursor and scrolling
    // ------------------------------------------------------------------------

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.item_count() {
            self.cursor += 1;
            self.reveal_cursor();
        }
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.reveal_cursor();
        }
    }

    pub fn page_down(&mut self) {
        self.page.scroll_down((self.page.height / 2).max(1));
    }

    pub fn page_up(&mut self) {
        self.page.scroll_up((self.page.height / 2).max(1));
    }

    pub fn scroll_top(&mut self) {
        self.page.offset = 0;
        self.cursor = 0;
    }

    /// Keep the cursor inside the projection after it shrinks.
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.item_count().saturating_sub(1));
    }

    /// Scroll the page just enough to show the highlighted item.
    pub fn reveal_cursor(&mut self) {
        if self.page.height == 0 {
            return;
        }
        let layout = self.layout();
        let Some(&row) = layout.item_rows.get(self.cursor) else {
            return;
        };
        let bottom = row + ITEM_HEIGHT;
        if row < self.page.offset {
            self.page.offset = row;
        } else if bottom > self.page.offset + self.page.height {
            self.page.offset = bottom - self.page.height.min(bottom);
        }
    }

    // ------------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------------

    /// Toggle the highlighted item's favorite flag; the write completes before
    /// this returns.
    pub async fn toggle_selected_favorite(&mut self) {
        let Some(item) = self.selected_item() else {
            self.set_status("Nothing to favorite here");
            return;
        };
        let (id, title) = (item.id.clone(), item.title.clone());

        if self.favorites.toggle_favorite(&id).await {
            self.set_status(format!("Added {} to favorites", title));
        } else {
            self.set_status(format!("Removed {} from favorites", title));
        }
        self.clamp_cursor();
        self.needs_redraw = true;
    }

    /// Switch dark/light and persist the choice.
    pub async fn toggle_theme(&mut self) -> ThemeVariant {
        let variant = self.theme.toggle(&mut self.appearance).await;
        self.set_status(format!("Theme: {}", variant.name()));
        self.needs_redraw = true;
        variant
    }

    // ------------------------------------------------------------------------
    // Search bar
    // ------------------------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.search_mode = true;
    }

    pub fn exit_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
    }

    /// Append to the query. Returns false when the query is already at the
    /// length limit.
    pub fn push_search_char(&mut self, c: char) -> bool {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            return false;
        }
        self.search_input.push(c);
        true
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    pub fn cycle_search_engine(&mut self) {
        self.search_engine = self.search_engine.next();
    }

    /// The results URL for the current query. Leaves search mode on success;
    /// a blank query keeps the bar open.
    pub fn commit_search(&mut self) -> Option<Url> {
        let url = search_url(self.search_engine, &self.search_input)?;
        self.exit_search();
        Some(url)
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
