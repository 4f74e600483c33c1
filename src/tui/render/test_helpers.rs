use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::storage::{self, HubStorage};
use crate::model::{Category, Resource, ResourceFields, ResourceId, UiConfig};
use crate::ops::store::ResourceStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App over a hub in `dir` holding `items` in the given order,
/// with ids R-001, R-002, ...
pub fn app_with_resources(dir: &TempDir, items: &[(&str, &str, Category)]) -> App {
    let resources: Vec<Resource> = items
        .iter()
        .enumerate()
        .map(|(i, (title, link, category))| {
            Resource::new(
                ResourceId(i as u64 + 1),
                ResourceFields {
                    title: title.to_string(),
                    link: link.to_string(),
                    description: String::new(),
                    category: *category,
                },
            )
        })
        .collect();

    let storage = HubStorage::new(dir.path(), "resources.json");
    std::fs::write(
        storage.path(),
        storage::encode(&resources, resources.len() as u64 + 1),
    )
    .unwrap();

    let (store, warning) = ResourceStore::open(storage, Category::Design);
    assert!(warning.is_none());
    App::new("Test".into(), &UiConfig::default(), store)
}
