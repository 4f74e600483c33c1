use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::DraftField;
use crate::tui::app::App;
use crate::util::unicode::{display_width, tail_to_width, truncate_to_width};

/// Label column width inside the form
const LABEL_WIDTH: usize = 14;
const MAX_FORM_WIDTH: u16 = 72;

/// Render the add/edit form as a popup centered over `area`
pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);

    let width = area.width.saturating_sub(4).min(MAX_FORM_WIDTH);
    let height = (DraftField::ALL.len() as u16 + 4).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let title = match app.store.edit_cursor() {
        Some(id) => format!(" Edit {} ", id),
        None => " Add resource ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(theme.background))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(bg);

    let inner_width = popup.width.saturating_sub(2) as usize;
    let field_width = inner_width.saturating_sub(LABEL_WIDTH + 1);

    let mut lines: Vec<Line> = vec![Line::from("")];
    for field in DraftField::ALL {
        lines.push(field_line(app, field, field_width));
    }
    lines.push(Line::from(""));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block).style(bg), popup);
}

fn field_line(app: &App, field: DraftField, field_width: usize) -> Line<'static> {
    let theme = &app.theme;
    let focused = app.form.focus == field;
    let draft = app.store.draft();

    let label_style = if focused {
        Style::default()
            .fg(theme.highlight)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(theme.background)
    };
    let label = format!(" {:<width$}", field_label(field), width = LABEL_WIDTH);
    let mut spans = vec![Span::styled(label, label_style)];

    let text_style = Style::default().fg(theme.text_bright).bg(theme.background);
    let cursor_style = Style::default().fg(theme.highlight).bg(theme.background);

    match field {
        DraftField::Category => {
            let category = draft.category;
            let arrow_style = if focused { cursor_style } else { label_style };
            spans.push(Span::styled("\u{25C0} ", arrow_style));
            spans.push(Span::styled(
                category.label().to_string(),
                Style::default()
                    .fg(theme.category_color(category))
                    .bg(theme.background),
            ));
            spans.push(Span::styled(" \u{25B6}", arrow_style));
        }
        _ => {
            let text = match field {
                DraftField::Title => &draft.title,
                DraftField::Link => &draft.link,
                _ => &draft.description,
            };
            if focused {
                let (before, after) = text.split_at(app.form.cursor.min(text.len()));
                let before = tail_to_width(before, field_width.saturating_sub(1));
                let room = field_width.saturating_sub(display_width(before) + 1);
                spans.push(Span::styled(before.to_string(), text_style));
                spans.push(Span::styled("\u{258C}", cursor_style)); // ▌ cursor
                spans.push(Span::styled(truncate_to_width(after, room), text_style));
            } else {
                spans.push(Span::styled(truncate_to_width(text, field_width), text_style));
            }
        }
    }
    Line::from(spans)
}

fn field_label(field: DraftField) -> &'static str {
    match field {
        DraftField::Title => "Title",
        DraftField::Link => "Link",
        DraftField::Description => "Description",
        DraftField::Category => "Category",
    }
}
