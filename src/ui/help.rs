//! Help overlay: scrollable keybinding table.
//!
//! Keys are listed per context, browsing first, with overridden keys shown
//! as configured.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const CONTEXT_ORDER: [(Context, &str); 2] = [
    (Context::Global, "Browsing"),
    (Context::Search, "Search bar"),
];

/// Draw the keybinding table centered over the page, user overrides included.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let overlay = centered_rect(70, 80, area);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows = binding_rows(app);
    let total_rows = rows.len();

    // Borders plus the header row and its margin
    let visible_height = usize::from(overlay.height.saturating_sub(4));
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(
            " Help ({}/{}) ",
            scroll.saturating_add(1),
            max_scroll.saturating_add(1)
        )
    } else {
        " Help (? to close) ".to_string()
    };

    let widths = [Constraint::Length(16), Constraint::Min(20)];

    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("page"));

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(vec![Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("item_description"),
        )]);
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

/// One header row per context, its bindings, and a blank row between groups.
fn binding_rows(app: &App) -> Vec<Row<'static>> {
    let bindings = app.keybindings.all_bindings();
    let mut rows = Vec::with_capacity(bindings.len() + CONTEXT_ORDER.len() * 2);

    for (ctx, label) in CONTEXT_ORDER {
        if !rows.is_empty() {
            rows.push(Row::new([Cell::default(), Cell::default()]));
        }
        rows.push(
            Row::new([
                Cell::from(Span::styled(
                    label,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::default(),
            ])
            .style(app.style("section_title")),
        );
        rows.extend(
            bindings
                .iter()
                .filter(|(c, _, _, _)| *c == ctx)
                .map(|(_, keys, _, description)| {
                    Row::new([Cell::from(format!("  {}", keys)), Cell::from(*description)])
                }),
        );
    }
    rows
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_stays_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let r = centered_rect(70, 80, parent);
        assert_eq!((r.width, r.height), (70, 32));
        assert_eq!((r.x, r.y), (15, 4));
    }

    #[test]
    fn test_every_context_has_a_label() {
        for ctx in [Context::Global, Context::Search] {
            assert!(CONTEXT_ORDER.iter().any(|(c, _)| *c == ctx));
        }
    }
}
