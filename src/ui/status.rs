use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.search_mode {
        Cow::Borrowed(" Type to search | Tab engine | Enter open | Esc cancel")
    } else if app.show_help {
        Cow::Borrowed(" j/k scroll | ? or Esc close")
    } else {
        Cow::Borrowed(" [h/l]tabs [j/k]move [f]avorite [o]pen [/]search [T]heme [?]help [q]uit")
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
