use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Right-align `hint` after `spans` when it fits in `width` columns
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    hint: &'a str,
    style: Style,
    bg: Style,
    width: usize,
) {
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), bg));
        spans.push(Span::styled(hint, style));
    }
}
