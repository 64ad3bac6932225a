//! The scrolling page below the tab bar: hero banner, then one block per
//! section.
//!
//! Every row here must line up with [`PageLayout`], which the cursor and
//! scroll logic use without rendering.

use crate::app::{App, PageLayout, EMPTY_STATE_HEIGHT};
use crate::catalog::Item;
use crate::state::{EmptyState, Section};
use crate::util::{display_width, sanitize_line, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const MARKER_FAVORITE: &str = "♥ ";
const MARKER_NONE: &str = "  ";
const CURSOR: &str = "▸ ";
const INDENT: &str = "    ";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let lines = visible_lines(app, usize::from(area.width), usize::from(area.height));
    let paragraph = Paragraph::new(lines).style(app.style("page"));
    f.render_widget(paragraph, area);
}

/// Sanitize catalog text and fit it into `width` columns.
fn clip(s: &str, width: usize) -> String {
    truncate_to_width(&sanitize_line(s), width).into_owned()
}

/// The rows inside the viewport. Windowed here rather than with
/// `Paragraph::scroll`, whose offset is a `u16`.
fn visible_lines(app: &App, width: usize, height: usize) -> Vec<Line<'static>> {
    page_lines(app, width)
        .into_iter()
        .skip(app.page.offset)
        .take(height)
        .collect()
}

/// All rows of the page, top to bottom, before scrolling.
pub(super) fn page_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let sections = app.sections();
    let layout = PageLayout::compute(&sections, app.page.height);

    let mut lines = hero_lines(app, layout.hero_height, width);

    match app.empty_state() {
        Some(state) => lines.extend(empty_state_lines(app, state)),
        None => lines.extend(section_lines(app, &sections, width)),
    }
    lines
}

fn hero_lines(app: &App, height: usize, width: usize) -> Vec<Line<'static>> {
    let tab_title = view_title(app);
    let summary = format!(
        "{} links in {} categories",
        app.catalog.item_count(),
        app.catalog.categories().len()
    );

    let content = [
        Line::from(Span::styled("nexus", app.style("hero_title"))),
        Line::from(Span::styled(clip(&tab_title, width), app.style("hero_subtitle"))),
        Line::from(Span::styled(clip(&summary, width), app.style("item_description"))),
    ];

    let shown = content.len().min(height);
    let top = (height - shown) / 2;

    let mut lines = Vec::with_capacity(height);
    lines.resize(top, Line::default());
    lines.extend(
        content
            .into_iter()
            .take(shown)
            .map(|line| line.alignment(Alignment::Center)),
    );
    lines.resize(height, Line::default());
    lines
}

fn view_title(app: &App) -> String {
    let active = app.selector.active();
    if active.is_favorites() {
        return "Your favorites".to_owned();
    }
    app.catalog
        .category(active.id())
        .map(|c| c.title.clone())
        .unwrap_or_default()
}

fn empty_state_lines(app: &App, state: EmptyState) -> Vec<Line<'static>> {
    let style = app.style("empty_state");
    let mut lines = match state {
        EmptyState::NoFavorites => vec![
            Line::from(Span::styled("No favorites yet", style)),
            Line::from(Span::styled(
                "Press f on any link to pin it here",
                app.style("item_description"),
            )),
        ],
        EmptyState::NoContent => vec![Line::from(Span::styled("Nothing here yet", style))],
    };
    lines.resize(EMPTY_STATE_HEIGHT, Line::default());
    lines
        .into_iter()
        .map(|line| line.alignment(Alignment::Center))
        .collect()
}

fn section_lines(app: &App, sections: &[Section<'_>], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut index = 0;

    for section in sections {
        lines.push(Line::from(Span::styled(
            clip(&format!(" {}", section.title), width),
            app.style("section_title"),
        )));

        for item in &section.items {
            let selected = index == app.cursor;
            let favorite = app.favorites.is_favorite(&item.id);
            let [title, detail] = item_lines(app, item, selected, favorite, width);
            lines.push(title);
            lines.push(detail);
            index += 1;
        }

        lines.push(Line::default());
    }
    lines
}

fn item_lines(
    app: &App,
    item: &Item,
    selected: bool,
    favorite: bool,
    width: usize,
) -> [Line<'static>; 2] {
    let cursor = if selected { CURSOR } else { MARKER_NONE };
    let marker = if favorite { MARKER_FAVORITE } else { MARKER_NONE };
    let title_room = width.saturating_sub(display_width(cursor) + display_width(marker));

    let title = Line::from(vec![
        Span::raw(cursor),
        Span::styled(marker, app.style("favorite_marker")),
        Span::styled(clip(&item.title, title_room), app.style("item_title")),
    ]);

    let detail_room = width.saturating_sub(INDENT.len());
    let detail_text = match item.description.as_deref() {
        Some(desc) if !desc.trim().is_empty() => {
            Span::styled(clip(desc, detail_room), app.style("item_description"))
        }
        _ => Span::styled(clip(&item.url, detail_room), app.style("item_url")),
    };
    let detail = Line::from(vec![Span::raw(INDENT), detail_text]);

    if selected {
        let highlight: Style = app.style("item_selected");
        [title.style(highlight), detail.style(highlight)]
    } else {
        [title, detail]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, SubCategory};
    use crate::config::Config;
    use crate::state::{HostAppearance, Selection};
    use crate::storage::Database;

    struct NoSignal;

    impl HostAppearance for NoSignal {
        fn prefers_dark(&self) -> Option<bool> {
            None
        }
    }

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(db, Catalog::builtin(), &Config::default(), &NoSignal).await;
        app.page.height = 20;
        app
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| &*s.content).collect()
    }

    #[tokio::test]
    async fn test_rows_match_layout() {
        let app = test_app().await;
        let lines = page_lines(&app, 80);
        let layout = app.layout();

        assert_eq!(lines.len(), layout.total_height);
        for (row, section) in layout.section_rows.iter().zip(app.sections()) {
            assert!(text(&lines[*row]).contains(&*section.title));
        }
        for (row, item) in layout
            .item_rows
            .iter()
            .zip(app.sections().iter().flat_map(|s| s.items.clone()))
        {
            assert!(text(&lines[*row]).contains(&item.title));
        }
    }

    #[tokio::test]
    async fn test_empty_favorites_message() {
        let mut app = test_app().await;
        app.select_tab(Selection::Favorites);
        let lines = page_lines(&app, 80);

        assert_eq!(lines.len(), app.layout().total_height);
        let body: Vec<String> = lines.iter().map(text).collect();
        assert!(body.iter().any(|l| l == "No favorites yet"));
    }

    #[tokio::test]
    async fn test_cursor_line_is_marked() {
        let mut app = test_app().await;
        app.cursor_down();
        let lines = page_lines(&app, 80);
        let row = app.layout().item_rows[1];
        assert!(text(&lines[row]).starts_with(CURSOR));
    }

    #[tokio::test]
    async fn test_empty_subcategories_render_their_titles() {
        let catalog = Catalog::new(vec![Category {
            id: "x".into(),
            title: "X".into(),
            sub_categories: vec![SubCategory {
                id: "s".into(),
                title: "Soon".into(),
                items: vec![],
            }],
        }]);
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(db, catalog, &Config::default(), &NoSignal).await;
        app.page.height = 20;

        assert_eq!(app.empty_state(), None);
        let layout = app.layout();
        assert_eq!(layout.section_rows, vec![10]);
        assert!(layout.item_rows.is_empty());

        let lines = page_lines(&app, 80);
        assert_eq!(lines.len(), layout.total_height);
        assert!(text(&lines[10]).contains("Soon"));
        assert!(lines.iter().all(|l| text(l) != "Nothing here yet"));
    }

    #[tokio::test]
    async fn test_window_reaches_rows_past_u16_range() {
        let items = (0..40_000)
            .map(|n| Item {
                id: format!("i{n}"),
                title: format!("Link {n}"),
                url: format!("https://example.com/{n}"),
                description: None,
                icon: None,
            })
            .collect();
        let catalog = Catalog::new(vec![Category {
            id: "big".into(),
            title: "Big".into(),
            sub_categories: vec![SubCategory {
                id: "all".into(),
                title: "All".into(),
                items,
            }],
        }]);
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(db, catalog, &Config::default(), &NoSignal).await;
        app.page.height = 40;
        app.page.content_height = app.layout().total_height;
        app.cursor = 39_999;
        app.reveal_cursor();
        assert!(app.page.offset > usize::from(u16::MAX));

        let lines = visible_lines(&app, 80, 40);
        assert_eq!(lines.len(), 40);
        let row = app.layout().item_rows[39_999] - app.page.offset;
        assert!(text(&lines[row]).starts_with(CURSOR));
        assert!(text(&lines[row]).contains("Link 39999"));
    }

    #[tokio::test]
    async fn test_narrow_width_truncates_titles() {
        let app = test_app().await;
        for line in page_lines(&app, 12) {
            assert!(display_width(&text(&line)) <= 12);
        }
    }
}
