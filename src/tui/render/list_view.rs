use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Resource;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::spans_width;

/// Widest a title may grow before the link column starts
const MAX_TITLE_WIDTH: usize = 40;

/// Render the filtered resource list, one row per resource
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height as usize;
    let width = area.width as usize;
    let bg = app.theme.background;

    let count = app.visible_count();
    if count == 0 {
        let msg = if app.store.is_empty() {
            "No resources yet. Press a to add one.".to_string()
        } else {
            format!("No {} resources.", app.store.filter().label())
        };
        let line = Line::from(Span::styled(
            format!("  {}", msg),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    // Keep the cursor on screen
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    app.scroll_offset = app.scroll_offset.min(count.saturating_sub(height.max(1)));

    let lines: Vec<Line> = app
        .store
        .view()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(i, resource)| resource_line(app, resource, i == app.cursor, width))
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn resource_line<'a>(app: &App, resource: &'a Resource, selected: bool, width: usize) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = vec![
        if selected {
            Span::styled("\u{258C}", base.fg(theme.highlight))
        } else {
            Span::styled(" ", base)
        },
        Span::styled(
            format!("{} ", resource.id),
            base.fg(if selected { theme.selection_id } else { theme.dim }),
        ),
        Span::styled(
            "\u{25CF} ",
            base.fg(theme.category_color(resource.category())),
        ),
    ];

    let title_style = if selected {
        base.fg(theme.text_bright).add_modifier(Modifier::BOLD)
    } else {
        base.fg(theme.text)
    };
    let room = width.saturating_sub(spans_width(&spans));
    let title = truncate_to_width(resource.title(), room.min(MAX_TITLE_WIDTH));
    spans.push(Span::styled(title, title_style));

    // Link, then description, while there is room
    for (text, style) in [
        (resource.link(), base.fg(theme.dim).add_modifier(Modifier::UNDERLINED)),
        (resource.description(), base.fg(theme.dim)),
    ] {
        let room = width.saturating_sub(spans_width(&spans) + 2);
        if text.is_empty() || room < 4 {
            continue;
        }
        let first_line = text.lines().next().unwrap_or("");
        spans.push(Span::styled("  ", base));
        spans.push(Span::styled(truncate_to_width(first_line, room), style));
    }

    // Fill the rest of the row so the selection background spans it
    let used = spans_width(&spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
