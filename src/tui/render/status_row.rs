use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

use super::helpers::push_right_aligned;

const NAVIGATE_HINTS: &str = "a add  e edit  d delete  1-5 filter  q quit";
const FORM_HINTS: &str = "Tab next field  Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = Style::default().bg(app.theme.background);
    let dim = Style::default().fg(app.theme.dim).bg(app.theme.background);
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    match app.mode {
        Mode::ConfirmDelete => {
            let title = app
                .pending_delete
                .and_then(|id| app.store.get(id))
                .map(|r| r.title().to_string())
                .unwrap_or_default();
            spans.push(Span::styled(
                format!(" delete \"{}\"? ", title),
                Style::default().fg(app.theme.red).bg(app.theme.background),
            ));
            spans.push(Span::styled("y/n", dim));
        }
        Mode::Navigate | Mode::Form => {
            if let Some(msg) = &app.status_message {
                let color = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.green
                };
                spans.push(Span::styled(
                    format!(" {}", msg),
                    Style::default().fg(color).bg(app.theme.background),
                ));
            }
            if app.show_key_hints {
                let hints = if app.mode == Mode::Form {
                    FORM_HINTS
                } else {
                    NAVIGATE_HINTS
                };
                push_right_aligned(&mut spans, hints, dim, bg, width);
            }
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(bg);
    frame.render_widget(paragraph, area);
}
