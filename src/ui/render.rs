//! Render functions for the TUI.
//!
//! Splits the frame into navbar, tab bar, scrolling page and status bar,
//! then draws the help overlay on top when it is open.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{help, navbar, page, status, tabs};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

const NAVBAR_HEIGHT: u16 = 3;
const TAB_BAR_HEIGHT: u16 = 3;

/// Main render dispatch function.
///
/// Takes `&mut App` because the page viewport size is only known here; the
/// input handler scrolls against the size recorded by the last frame.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = split_frame(area);

    app.page.height = usize::from(chunks[2].height);
    app.page.content_height = app.layout().total_height;
    app.page.clamp();

    navbar::render(f, app, chunks[0]);
    tabs::render(f, app, chunks[1]);
    page::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.show_help {
        help::render(f, app);
    }
}

fn split_frame(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAVBAR_HEIGHT),
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}
