use crate::catalog::Catalog;

/// Id of the favorites pseudo-tab.
pub const FAVORITES_ID: &str = "favorites";

/// Rows occupied by the fixed header above the scrolling page.
pub const HEADER_HEIGHT: usize = 3;

const FAVORITES_TITLE: &str = "Favorites";

/// The view currently shown: the favorites aggregate or one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection {
    Favorites,
    Category(String),
}

impl Selection {
    /// `"favorites"` always maps to the favorites view, even if a category
    /// happens to use that id.
    pub fn from_id(id: &str) -> Self {
        if id == FAVORITES_ID {
            Self::Favorites
        } else {
            Self::Category(id.to_string())
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Favorites => FAVORITES_ID,
            Self::Category(id) => id,
        }
    }

    pub fn is_favorites(&self) -> bool {
        matches!(self, Self::Favorites)
    }
}

/// A scrollable region whose offset is adjusted when the tab changes.
pub trait Viewport {
    fn scroll_offset(&self) -> usize;
    fn viewport_height(&self) -> usize;
    fn scroll_to(&mut self, offset: usize);
}

/// Where to scroll after a tab change, or `None` to stay put.
///
/// Once the page has been scrolled past half the viewport, it is pulled back
/// so the tab bar sits just under the header.
pub fn reposition_target(
    offset: usize,
    viewport_height: usize,
    header_height: usize,
) -> Option<usize> {
    let threshold = viewport_height / 2;
    (offset > threshold).then(|| threshold.saturating_sub(header_height))
}

/// One entry in the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab<'a> {
    pub selection: Selection,
    pub title: &'a str,
}

/// Tracks the active tab. Not persisted; every launch starts on the first
/// category.
#[derive(Debug, Clone)]
pub struct ViewSelector {
    active: Selection,
}

impl ViewSelector {
    pub fn new(catalog: &Catalog) -> Self {
        let active = match catalog.first_category() {
            Some(category) => Selection::from_id(&category.id),
            None => Selection::Favorites,
        };
        Self { active }
    }

    pub fn active(&self) -> &Selection {
        &self.active
    }

    /// Switch to `selection`, then reposition `viewport`.
    pub fn select(&mut self, selection: Selection, viewport: &mut impl Viewport) {
        tracing::debug!(selection = %selection.id(), "Selected tab");
        self.active = selection;

        if let Some(target) = reposition_target(
            viewport.scroll_offset(),
            viewport.viewport_height(),
            HEADER_HEIGHT,
        ) {
            viewport.scroll_to(target);
        }
    }

    /// Favorites first, then every category in catalog order.
    pub fn tabs(catalog: &Catalog) -> Vec<Tab<'_>> {
        std::iter::once(Tab {
            selection: Selection::Favorites,
            title: FAVORITES_TITLE,
        })
        .chain(catalog.categories().iter().map(|c| Tab {
            selection: Selection::from_id(&c.id),
            title: c.title.as_str(),
        }))
        .collect()
    }

    /// Position of the active tab, or `None` if it names no known category.
    pub fn active_tab_index(&self, catalog: &Catalog) -> Option<usize> {
        Self::tabs(catalog)
            .iter()
            .position(|tab| tab.selection == self.active)
    }

    /// Select the tab at `index`. Returns false if out of range.
    pub fn select_index(
        &mut self,
        catalog: &Catalog,
        index: usize,
        viewport: &mut impl Viewport,
    ) -> bool {
        let Some(tab) = Self::tabs(catalog).into_iter().nth(index) else {
            return false;
        };
        self.select(tab.selection, viewport);
        true
    }

    pub fn next(&mut self, catalog: &Catalog, viewport: &mut impl Viewport) {
        let count = catalog.categories().len() + 1;
        let index = match self.active_tab_index(catalog) {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.select_index(catalog, index, viewport);
    }

    pub fn previous(&mut self, catalog: &Catalog, viewport: &mut impl Viewport) {
        let count = catalog.categories().len() + 1;
        let index = match self.active_tab_index(catalog) {
            Some(i) => (i + count - 1) % count,
            None => 0,
        };
        self.select_index(catalog, index, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, SubCategory};

    #[derive(Debug, Default)]
    struct FakeViewport {
        offset: usize,
        height: usize,
        scrolled_to: Vec<usize>,
    }

    impl FakeViewport {
        fn at(offset: usize, height: usize) -> Self {
            Self {
                offset,
                height,
                scrolled_to: Vec::new(),
            }
        }
    }

    impl Viewport for FakeViewport {
        fn scroll_offset(&self) -> usize {
            self.offset
        }

        fn viewport_height(&self) -> usize {
            self.height
        }

        fn scroll_to(&mut self, offset: usize) {
            self.offset = offset;
            self.scrolled_to.push(offset);
        }
    }

    fn category(id: &str, title: &str) -> Category {
        Category {
            id: id.to_string(),
            title: title.to_string(),
            sub_categories: vec![SubCategory {
                id: format!("{id}-main"),
                title: "Main".to_string(),
                items: vec![],
            }],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            category("dev", "Dev"),
            category("tools", "Tools"),
            category("design", "Design"),
        ])
    }

    #[test]
    fn test_reposition_target() {
        // At or below the threshold: stay.
        assert_eq!(reposition_target(0, 40, 3), None);
        assert_eq!(reposition_target(20, 40, 3), None);
        // Past it: threshold minus header.
        assert_eq!(reposition_target(21, 40, 3), Some(17));
        assert_eq!(reposition_target(500, 40, 3), Some(17));
        // Saturates instead of going negative.
        assert_eq!(reposition_target(5, 4, 3), Some(0));
        assert_eq!(reposition_target(1, 0, 3), Some(0));
    }

    #[test]
    fn test_default_selection_is_first_category() {
        let selector = ViewSelector::new(&catalog());
        assert_eq!(selector.active(), &Selection::Category("dev".into()));
    }

    #[test]
    fn test_default_selection_on_empty_catalog_is_favorites() {
        let selector = ViewSelector::new(&Catalog::default());
        assert_eq!(selector.active(), &Selection::Favorites);
    }

    #[test]
    fn test_select_scrolls_back_when_deep() {
        let mut selector = ViewSelector::new(&catalog());
        let mut viewport = FakeViewport::at(100, 40);

        selector.select(Selection::from_id("tools"), &mut viewport);
        assert_eq!(selector.active().id(), "tools");
        assert_eq!(viewport.scrolled_to, vec![17]);
    }

    #[test]
    fn test_select_leaves_shallow_scroll_alone() {
        let mut selector = ViewSelector::new(&catalog());
        let mut viewport = FakeViewport::at(10, 40);

        selector.select(Selection::Favorites, &mut viewport);
        assert!(selector.active().is_favorites());
        assert!(viewport.scrolled_to.is_empty());
        assert_eq!(viewport.offset, 10);
    }

    #[test]
    fn test_selection_from_id() {
        assert_eq!(Selection::from_id("favorites"), Selection::Favorites);
        assert_eq!(
            Selection::from_id("tools"),
            Selection::Category("tools".into())
        );
        assert_eq!(Selection::Favorites.id(), FAVORITES_ID);
        assert_eq!(Selection::Category("x".into()).id(), "x");
    }

    #[test]
    fn test_tabs_put_favorites_first() {
        let catalog = catalog();
        let titles: Vec<_> = ViewSelector::tabs(&catalog)
            .iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Favorites", "Dev", "Tools", "Design"]);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let catalog = catalog();
        let mut selector = ViewSelector::new(&catalog);
        let mut viewport = FakeViewport::at(0, 40);

        assert_eq!(selector.active_tab_index(&catalog), Some(1));
        selector.next(&catalog, &mut viewport);
        selector.next(&catalog, &mut viewport);
        assert_eq!(selector.active().id(), "design");
        selector.next(&catalog, &mut viewport);
        assert!(selector.active().is_favorites());

        selector.previous(&catalog, &mut viewport);
        assert_eq!(selector.active().id(), "design");
    }

    #[test]
    fn test_select_index_out_of_range() {
        let catalog = catalog();
        let mut selector = ViewSelector::new(&catalog);
        let mut viewport = FakeViewport::at(0, 40);

        assert!(!selector.select_index(&catalog, 9, &mut viewport));
        assert_eq!(selector.active().id(), "dev");
        assert!(selector.select_index(&catalog, 0, &mut viewport));
        assert!(selector.active().is_favorites());
    }

    #[test]
    fn test_unknown_selection_has_no_tab_and_next_recovers() {
        let catalog = catalog();
        let mut selector = ViewSelector::new(&catalog);
        let mut viewport = FakeViewport::at(0, 40);

        selector.select(Selection::from_id("gone"), &mut viewport);
        assert_eq!(selector.active_tab_index(&catalog), None);
        selector.next(&catalog, &mut viewport);
        assert!(selector.active().is_favorites());
    }
}
