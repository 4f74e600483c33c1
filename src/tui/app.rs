use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::hub_io::{discover_hub, load_hub};
use crate::io::storage::HubStorage;
use crate::io::watcher::{FileEvent, HubWatcher};
use crate::model::{DraftField, Filter, Resource, ResourceId, UiConfig};
use crate::ops::store::{ResourceStore, StoreError};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// The add/edit form is open over the list
    Form,
    /// Waiting for y/n on deleting `App::pending_delete`
    ConfirmDelete,
}

/// Focus and text cursor inside the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormState {
    pub focus: DraftField,
    /// Byte offset into the focused text field
    pub cursor: usize,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            focus: DraftField::Title,
            cursor: 0,
        }
    }
}

/// Main application state
pub struct App {
    pub hub_name: String,
    pub store: ResourceStore,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Cursor index into the filtered list
    pub cursor: usize,
    /// Scroll offset (first visible row), adjusted while rendering
    pub scroll_offset: usize,
    pub form: FormState,
    pub pending_delete: Option<ResourceId>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl App {
    pub fn new(hub_name: String, ui: &UiConfig, store: ResourceStore) -> Self {
        App {
            hub_name,
            store,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(ui),
            show_key_hints: ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            form: FormState::default(),
            pending_delete: None,
            status_message: None,
            status_is_error: false,
        }
    }

    // -----------------------------------------------------------------------
    // Status row
    // -----------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    // -----------------------------------------------------------------------
    // List and filter
    // -----------------------------------------------------------------------

    pub fn visible_count(&self) -> usize {
        self.store.view().count()
    }

    pub fn selected(&self) -> Option<&Resource> {
        self.store.view().nth(self.cursor)
    }

    pub fn selected_id(&self) -> Option<ResourceId> {
        self.selected().map(|r| r.id)
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.visible_count();
        self.cursor = if count == 0 { 0 } else { self.cursor.min(count - 1) };
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.visible_count();
        if count == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(count - 1);
    }

    /// Put the cursor on `id` if it is visible under the current filter
    pub fn select_id(&mut self, id: ResourceId) {
        if let Some(pos) = self.store.view().position(|r| r.id == id) {
            self.cursor = pos;
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.store.filter() != filter {
            self.store.set_filter(filter);
            self.cursor = 0;
            self.scroll_offset = 0;
        }
    }

    /// Step through the filter tabs, wrapping around
    pub fn cycle_filter(&mut self, forward: bool) {
        let choices = Filter::choices();
        let idx = choices
            .iter()
            .position(|f| *f == self.store.filter())
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % choices.len()
        } else {
            (idx + choices.len() - 1) % choices.len()
        };
        self.set_filter(choices[next]);
    }

    /// Pick up changes another process wrote to the stored record
    pub fn reload_from_disk(&mut self) {
        let selected = self.selected_id();
        match self.store.reload() {
            Ok(()) => {
                self.clamp_cursor();
                if let Some(id) = selected {
                    self.select_id(id);
                }
            }
            Err(e) => self.set_error(format!("reload failed: {}", e)),
        }
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    pub fn open_add(&mut self) {
        self.store.begin_add();
        self.form = FormState::default();
        self.mode = Mode::Form;
    }

    pub fn open_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.begin_edit(id) {
            Ok(()) => {
                self.form = FormState {
                    focus: DraftField::Title,
                    cursor: self.store.draft().title.len(),
                };
                self.mode = Mode::Form;
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn cancel_form(&mut self) {
        self.store.cancel_edit();
        self.mode = Mode::Navigate;
    }

    /// Submit the draft. The form stays open unless the collection changed.
    pub fn submit_form(&mut self) {
        let editing = self.store.edit_cursor().is_some();
        match self.store.submit() {
            Ok(id) => {
                self.mode = Mode::Navigate;
                self.select_id(id);
                let verb = if editing { "saved" } else { "added" };
                self.set_status(format!("{} {}", verb, id));
            }
            Err(StoreError::Persistence(e)) => {
                // Applied in memory; only the write failed
                self.mode = Mode::Navigate;
                self.clamp_cursor();
                self.set_error(format!("not saved to disk: {}", e));
            }
            Err(e) => {
                if let StoreError::Validation { fields } = &e
                    && let Some(first) = fields.first()
                {
                    self.focus_field(*first);
                }
                self.set_error(e.to_string());
            }
        }
    }

    /// Text of the focused field (empty for the category field)
    pub fn focused_text(&self) -> &str {
        let draft = self.store.draft();
        match self.form.focus {
            DraftField::Title => &draft.title,
            DraftField::Link => &draft.link,
            DraftField::Description => &draft.description,
            DraftField::Category => "",
        }
    }

    pub fn focus_field(&mut self, field: DraftField) {
        self.form.focus = field;
        self.form.cursor = self.focused_text().len();
    }

    fn set_focused_text(&mut self, text: &str) {
        if let Err(e) = self.store.update_draft_field(self.form.focus, text) {
            self.set_error(e.to_string());
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if self.form.focus == DraftField::Category {
            return;
        }
        let mut text = self.focused_text().to_string();
        let at = self.form.cursor.min(text.len());
        text.insert(at, c);
        self.set_focused_text(&text);
        self.form.cursor = at + c.len_utf8();
    }

    /// Delete the grapheme before the cursor
    pub fn backspace(&mut self) {
        let mut text = self.focused_text().to_string();
        let end = self.form.cursor.min(text.len());
        if let Some(start) = unicode::prev_grapheme_boundary(&text, end) {
            text.replace_range(start..end, "");
            self.set_focused_text(&text);
            self.form.cursor = start;
        }
    }

    /// Delete the grapheme under the cursor
    pub fn delete_forward(&mut self) {
        let mut text = self.focused_text().to_string();
        let start = self.form.cursor.min(text.len());
        if let Some(end) = unicode::next_grapheme_boundary(&text, start) {
            text.replace_range(start..end, "");
            self.set_focused_text(&text);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(pos) = unicode::prev_grapheme_boundary(self.focused_text(), self.form.cursor) {
            self.form.cursor = pos;
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(pos) = unicode::next_grapheme_boundary(self.focused_text(), self.form.cursor) {
            self.form.cursor = pos;
        }
    }

    pub fn cursor_home(&mut self) {
        self.form.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.form.cursor = self.focused_text().len();
    }

    /// Step the draft's category
    pub fn cycle_category(&mut self, forward: bool) {
        let mut draft = self.store.draft().clone();
        draft.category = if forward {
            draft.category.next()
        } else {
            draft.category.prev()
        };
        self.store.set_draft(draft);
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.store.delete(id) {
            Ok(removed) => {
                self.clamp_cursor();
                self.set_status(format!("deleted \"{}\"", removed.title()));
            }
            Err(StoreError::Persistence(e)) => {
                self.clamp_cursor();
                self.set_error(format!("not saved to disk: {}", e));
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }
}

/// Run the TUI application
pub fn run(hub_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    // Discover and load hub
    let start = match hub_dir {
        Some(d) => std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        None => std::env::current_dir()?,
    };
    let root = discover_hub(&start)?;
    let hub = load_hub(&root)?;

    let (store, warning) =
        ResourceStore::open(HubStorage::for_hub(&hub), hub.config.form.default_category);
    let mut app = App::new(hub.config.hub.name.clone(), &hub.config.ui, store);
    if let Some(e) = warning {
        app.set_error(format!("{} (see `rh recovery`)", e));
    }

    // Without a watcher the TUI still works, it just won't see outside writes
    let watcher = HubWatcher::start(&hub.hub_dir, &hub.storage_path()).ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&HubWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if let Some(watcher) = watcher
            && watcher
                .poll()
                .iter()
                .any(|e| matches!(e, FileEvent::RecordChanged))
        {
            app.reload_from_disk();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::tui::render::test_helpers::app_with_resources;
    use tempfile::TempDir;

    #[test]
    fn filter_resets_cursor_and_cycles() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(
            &tmp,
            &[
                ("A", "a.com", Category::Design),
                ("B", "b.com", Category::Development),
                ("C", "c.com", Category::Design),
            ],
        );
        app.cursor = 2;
        app.set_filter(Filter::Only(Category::Design));
        assert_eq!(app.cursor, 0);
        assert_eq!(app.visible_count(), 2);

        app.cycle_filter(false);
        assert_eq!(app.store.filter(), Filter::All);
        app.cycle_filter(false);
        assert_eq!(app.store.filter(), Filter::Only(Category::Inspiration));
    }

    #[test]
    fn move_cursor_clamps() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(
            &tmp,
            &[("A", "a.com", Category::Design), ("B", "b.com", Category::Design)],
        );
        app.move_cursor(-1);
        assert_eq!(app.cursor, 0);
        app.move_cursor(5);
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        app.open_add();
        for c in "cafe\u{301}".chars() {
            app.insert_char(c);
        }
        assert_eq!(app.store.draft().title, "cafe\u{301}");
        app.backspace();
        assert_eq!(app.store.draft().title, "caf");
        assert_eq!(app.form.cursor, 3);
    }

    #[test]
    fn insert_at_cursor() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        app.open_add();
        for c in "ac".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.insert_char('b');
        assert_eq!(app.store.draft().title, "abc");
        app.cursor_home();
        app.delete_forward();
        assert_eq!(app.store.draft().title, "bc");
    }

    #[test]
    fn invalid_submit_keeps_form_open() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[]);
        app.open_add();
        app.insert_char('x');
        app.submit_form();
        assert_eq!(app.mode, Mode::Form);
        assert!(app.status_is_error);
        assert_eq!(app.form.focus, DraftField::Link);
        assert_eq!(app.store.draft().title, "x");
        assert!(app.store.is_empty());
    }

    #[test]
    fn submit_selects_new_resource() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[("Old", "old.com", Category::Design)]);
        app.cursor = 0;
        app.open_add();
        for c in "New".chars() {
            app.insert_char(c);
        }
        app.focus_field(DraftField::Link);
        for c in "new.com".chars() {
            app.insert_char(c);
        }
        app.submit_form();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.selected().unwrap().title(), "New");
        assert_eq!(app.status_message.as_deref(), Some("added R-002"));
    }

    #[test]
    fn reload_keeps_selection_by_id() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(
            &tmp,
            &[("A", "a.com", Category::Design), ("B", "b.com", Category::Design)],
        );
        app.cursor = 1;
        let selected = app.selected_id().unwrap();

        // Another process adds a resource at the front
        let (mut other, _) = ResourceStore::open(app.store.storage().clone(), Category::Design);
        other.begin_add();
        other.update_draft_field(DraftField::Title, "C").unwrap();
        other.update_draft_field(DraftField::Link, "c.com").unwrap();
        other.submit().unwrap();

        app.reload_from_disk();
        assert_eq!(app.visible_count(), 3);
        assert_eq!(app.selected_id(), Some(selected));
    }

    #[test]
    fn delete_requires_confirmation() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_resources(&tmp, &[("A", "a.com", Category::Design)]);
        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.store.len(), 1);

        app.request_delete();
        app.confirm_delete();
        assert!(app.store.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("deleted \"A\""));
    }
}
