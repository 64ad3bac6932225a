//! Keyboard input handling.
//!
//! Routes each key press to the help overlay, the search bar, or the page,
//! in that order of precedence.

use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::{validate_link_url, MAX_SEARCH_QUERY_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    // Terminals report Shift on uppercase letters; bindings use the letter itself.
    let modifiers = match code {
        KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
        _ => modifiers,
    };

    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers);
    }

    handle_page_input(app, code, modifiers).await
}

/// Captures all keys while the help overlay is visible.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Search bar editing. Only keys bound in the search context act as
/// commands; everything printable goes into the query.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .context_action(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => app.exit_search(),
        Some(KbAction::CycleEngine) => app.cycle_search_engine(),
        Some(KbAction::CommitSearch) => match app.commit_search() {
            Some(url) => {
                tracing::info!(url = %url, "Opening web search");
                if let Err(e) = open::that(url.as_str()) {
                    app.set_status(format!("Failed to open browser: {}", e));
                } else {
                    app.set_status(format!("Searching {}...", app.search_engine.name()));
                }
            }
            None => app.set_status("Type something to search"),
        },
        _ => match code {
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if !app.push_search_char(c) {
                    app.set_status(format!(
                        "Search query at max length ({} chars)",
                        MAX_SEARCH_QUERY_LENGTH
                    ));
                }
            }
            _ => {}
        },
    }
    Action::Continue
}

async fn handle_page_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NextTab => app.next_tab(),
        KbAction::PrevTab => app.prev_tab(),
        KbAction::JumpToTab(index) => {
            app.jump_to_tab(usize::from(index));
        }
        KbAction::CursorDown => app.cursor_down(),
        KbAction::CursorUp => app.cursor_up(),
        KbAction::PageDown => app.page_down(),
        KbAction::PageUp => app.page_up(),
        KbAction::ScrollTop => app.scroll_top(),
        KbAction::ToggleFavorite => app.toggle_selected_favorite().await,
        KbAction::OpenItem => open_selected_item(app),
        KbAction::ToggleTheme => {
            app.toggle_theme().await;
        }
        KbAction::EnterSearch => app.enter_search(),
        KbAction::ShowHelp => app.show_help = true,
        // Search-context actions have no meaning on the page
        KbAction::ExitSearch | KbAction::CommitSearch | KbAction::CycleEngine => {}
    }
    Action::Continue
}

/// Validate the highlighted item's URL, then hand it to the system opener.
fn open_selected_item(app: &mut App) {
    let Some((title, checked)) = app
        .selected_item()
        .map(|item| (item.title.clone(), validate_link_url(&item.url)))
    else {
        app.set_status("No link selected");
        return;
    };

    match checked {
        Err(e) => {
            tracing::warn!(title = %title, error = %e, "Refusing to open catalog link");
            app.set_status(format!("Cannot open {}: {}", title, e));
        }
        Ok(url) => {
            tracing::info!(url = %url, "Opening link");
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status(format!("Opening {}...", title));
            }
        }
    }
}
