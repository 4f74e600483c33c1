use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Filter;
use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Clear any transient status message on keypress
    app.clear_status();

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.should_quit = true,

        // Filter tabs
        (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='5')) => {
            let idx = c as usize - '1' as usize;
            app.set_filter(Filter::choices()[idx]);
        }
        (_, KeyCode::Tab) => app.cycle_filter(true),
        (_, KeyCode::BackTab) => app.cycle_filter(false),

        // Movement
        (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => app.move_cursor(1),
        (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => app.move_cursor(-1),
        (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => app.cursor = 0,
        (KeyModifiers::SHIFT, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
            app.cursor = app.visible_count().saturating_sub(1);
        }
        (KeyModifiers::NONE, KeyCode::PageDown) => app.move_cursor(10),
        (KeyModifiers::NONE, KeyCode::PageUp) => app.move_cursor(-10),

        // Changes
        (KeyModifiers::NONE, KeyCode::Char('a')) => app.open_add(),
        (KeyModifiers::NONE, KeyCode::Char('e') | KeyCode::Enter) => app.open_edit(),
        (KeyModifiers::NONE, KeyCode::Char('d')) => app.request_delete(),

        _ => {}
    }
}
