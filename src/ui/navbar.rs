//! Top navigation bar: logo, web search box and theme indicator.

use crate::app::App;
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const LOGO: &str = " ◆ nexus";
const SEARCH_PLACEHOLDER: &str = "Press / to search the web";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let border_role = if app.search_mode {
        "panel_border_focused"
    } else {
        "panel_border"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style(border_role))
        .style(app.style("page"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(LOGO, app.style("navbar_logo"))),
        chunks[0],
    );
    render_search(f, app, chunks[1]);

    let indicator = if app.appearance.variant.is_dark() {
        "☾ Dark"
    } else {
        "☀ Light"
    };
    f.render_widget(
        Paragraph::new(Span::styled(indicator, app.style("hero_subtitle")))
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let engine = format!("[{}] ", app.search_engine.name());
    let engine_width = display_width(&engine) as u16;
    let room = usize::from(area.width.saturating_sub(engine_width + 1));

    let query: &str = if app.search_mode {
        visible_tail(&app.search_input, room)
    } else {
        SEARCH_PLACEHOLDER
    };
    let query_style = if app.search_mode {
        app.style("search_input")
    } else {
        app.style("item_description")
    };

    let line = Line::from(vec![
        Span::styled(engine, app.style("search_engine")),
        Span::styled(query, query_style),
    ]);
    f.render_widget(Paragraph::new(line), area);

    if app.search_mode {
        let x = area
            .x
            .saturating_add(engine_width)
            .saturating_add(display_width(query) as u16)
            .min(area.right().saturating_sub(1));
        f.set_cursor_position(Position::new(x, area.y));
    }
}

/// The longest suffix of `s` that fits in `max_width` columns, so the caret
/// end of a long query stays visible.
fn visible_tail(s: &str, max_width: usize) -> &str {
    let mut start = 0;
    while display_width(&s[start..]) > max_width {
        match s[start..].chars().next() {
            Some(c) => start += c.len_utf8(),
            None => break,
        }
    }
    &s[start..]
}
