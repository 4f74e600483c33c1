use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Filter;
use crate::tui::app::App;

use super::helpers::spans_width;

/// Render the tab bar: one tab per category filter, with separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Split into tab row and separator row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let bg_style = Style::default().bg(app.theme.background);
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );

    // Leading icon
    spans.push(Span::styled(" ", bg_style));
    spans.push(Span::styled(
        "\u{25B6}",
        Style::default().fg(app.theme.purple).bg(app.theme.background),
    ));
    spans.push(Span::styled(" ", bg_style));

    let current = app.store.filter();
    for (filter, count) in app.store.category_counts() {
        let is_current = filter == current;
        let style = tab_style(app, is_current);
        let tab_bg = if is_current {
            app.theme.selection_bg
        } else {
            app.theme.background
        };

        // Category tabs carry a colored marker
        if let Filter::Only(category) = filter {
            spans.push(Span::styled(" ", style));
            spans.push(Span::styled(
                "\u{25CF}",
                Style::default()
                    .fg(app.theme.category_color(category))
                    .bg(tab_bg),
            ));
        }
        spans.push(Span::styled(format!(" {} ", filter.label()), style));
        spans.push(Span::styled(
            format!("{} ", count),
            Style::default().fg(app.theme.dim).bg(tab_bg),
        ));
        sep_cols.push(spans_width(&spans));
        spans.push(sep.clone());
    }

    // Hub name, right-aligned when it fits
    let width = area.width as usize;
    let name = format!("{} ", app.hub_name);
    let used = spans_width(&spans);
    if used + name.chars().count() < width {
        spans.push(Span::styled(
            " ".repeat(width - used - name.chars().count()),
            bg_style,
        ));
        spans.push(Span::styled(name, Style::default().fg(app.theme.dim).bg(app.theme.background)));
    }

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(bg_style);
    frame.render_widget(tabs, area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let mut line: String = String::with_capacity(width * 3);
    for col in 0..width {
        if sep_cols.contains(&col) {
            line.push('\u{2534}');
        } else {
            line.push('\u{2500}');
        }
    }
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn tabs_show_counts() {
        let tmp = TempDir::new().unwrap();
        let app = app_with_resources(
            &tmp,
            &[
                ("A", "a.com", Category::Design),
                ("B", "b.com", Category::Design),
                ("C", "c.com", Category::Inspiration),
            ],
        );
        let out = render_to_string(100, 2, |frame, area| render_tab_bar(frame, &app, area));
        let first = out.lines().next().unwrap();
        assert!(first.starts_with(" \u{25B6}  All 3 \u{2502}"));
        assert!(first.contains("Design 2"));
        assert!(first.contains("Development 0"));
        assert!(first.contains("Inspiration 1"));
        assert!(first.ends_with("Test"));
    }

    #[test]
    fn separator_joins_tab_dividers() {
        let tmp = TempDir::new().unwrap();
        let app = app_with_resources(&tmp, &[]);
        let out = render_to_string(100, 2, |frame, area| render_tab_bar(frame, &app, area));
        let lines: Vec<&str> = out.lines().collect();
        let divider_col = lines[0].chars().position(|c| c == '\u{2502}').unwrap();
        assert_eq!(lines[1].chars().nth(divider_col), Some('\u{2534}'));
    }
}
