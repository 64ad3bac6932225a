//! Tab bar listing the favorites view and every catalog category.

use crate::app::App;
use crate::state::ViewSelector;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

const FAVORITES_MARKER: &str = "♥";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let titles: Vec<Line> = ViewSelector::tabs(&app.catalog)
        .into_iter()
        .enumerate()
        .map(|(i, tab)| {
            let label = if tab.selection.is_favorites() {
                format!("{} {}", FAVORITES_MARKER, tab.title)
            } else {
                tab.title.to_string()
            };
            // Digits 1-9 jump straight to a tab
            if i < 9 {
                Line::from(format!("{} {}", i + 1, label))
            } else {
                Line::from(label)
            }
        })
        .collect();

    let mut tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border")),
        )
        .style(app.style("tab_normal"))
        .highlight_style(app.style("tab_active"))
        .divider("│");

    if let Some(index) = app.selector.active_tab_index(&app.catalog) {
        tabs = tabs.select(index);
    }

    f.render_widget(tabs, area);
}
