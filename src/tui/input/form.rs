use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::DraftField;
use crate::tui::app::App;

pub(super) fn handle_form(app: &mut App, key: KeyEvent) {
    let on_category = app.form.focus == DraftField::Category;

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.clear_status();
            app.cancel_form();
        }
        (_, KeyCode::Enter) => app.submit_form(),

        // Field focus
        (_, KeyCode::Tab) | (_, KeyCode::Down) => app.focus_field(app.form.focus.next()),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => app.focus_field(app.form.focus.prev()),

        // Category field: arrows cycle the value
        (_, KeyCode::Left) if on_category => app.cycle_category(false),
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char(' ')) if on_category => {
            app.cycle_category(true)
        }

        // Text fields
        (_, KeyCode::Left) => app.cursor_left(),
        (_, KeyCode::Right) => app.cursor_right(),
        (_, KeyCode::Home) => app.cursor_home(),
        (_, KeyCode::End) => app.cursor_end(),
        (_, KeyCode::Backspace) => app.backspace(),
        (_, KeyCode::Delete) => app.delete_forward(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.insert_char(c),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Category, DraftField};
    use crate::tui::app::Mode;
    use crate::tui::input::handle_key;
    use crate::tui::input::test_keys::*;
    use crate::tui::render::test_helpers::app_with_resources;
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    #[test]
    fn add_through_the_form() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        handle_key(&mut app, ch('a'));
        type_str(&mut app, "Figma");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "https://figma.com");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "UI tool");
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.form.focus, DraftField::Category);
        handle_key(&mut app, key(KeyCode::Right));
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Navigate);
        let r = &app.store.resources()[0];
        assert_eq!(r.title(), "Figma");
        assert_eq!(r.link(), "https://figma.com");
        assert_eq!(r.description(), "UI tool");
        assert_eq!(r.category(), Category::Development);
    }

    #[test]
    fn letters_do_not_leak_into_category() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        handle_key(&mut app, ch('a'));
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.form.focus, DraftField::Category);
        type_str(&mut app, "xyz");
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.store.draft().category, Category::Inspiration);
        assert_eq!(app.store.draft().title, "");
    }

    #[test]
    fn edit_then_escape_leaves_resource_alone() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[("Old", "old.com", Category::Design)]);
        handle_key(&mut app, ch('e'));
        handle_key(&mut app, key(KeyCode::Backspace));
        type_str(&mut app, "x");
        assert_eq!(app.store.draft().title, "Olx");
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.resources()[0].title(), "Old");
        assert!(app.store.edit_cursor().is_none());
    }

    #[test]
    fn edit_submit_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(
            &tmp,
            &[("A", "a.com", Category::Design), ("B", "b.com", Category::Design)],
        );
        handle_key(&mut app, ch('j'));
        handle_key(&mut app, ch('e'));
        type_str(&mut app, "2");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.resources()[1].title(), "B2");
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn empty_submit_reports_error() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        handle_key(&mut app, ch('a'));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(
            app.status_message.as_deref(),
            Some("title and link must not be empty")
        );
        assert_eq!(app.form.focus, DraftField::Title);
    }
}
