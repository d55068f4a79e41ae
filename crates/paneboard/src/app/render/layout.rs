use std::borrow::Cow;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

/// Render the hotkey legend centered on one reverse-video row.
pub(super) fn render_hotkey_bar(frame: &mut ratatui::Frame, area: Rect, legend: &str) {
    let (text, _) = truncate_to_width(legend, area.width as usize);
    let bar = Paragraph::new(Line::raw(text.to_string()))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(bar, area);
}

/// Longest prefix of `text` that fits in `width` terminal columns.
///
/// Returns the prefix and the columns it occupies.
pub(super) fn truncate_to_width(text: &str, width: usize) -> (&str, usize) {
    let mut used = 0usize;
    for (idx, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            return (&text[..idx], used);
        }
        used += ch_width;
    }
    (text, used)
}

const TAB_WIDTH: usize = 8;

/// Replace tabs with spaces up to the next tab stop and drop other
/// control characters, so the text measures what the terminal shows.
///
/// `column` is where `text` starts on its row.
pub(super) fn expand_tabs(text: &str, column: usize) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + TAB_WIDTH);
    let mut col = column;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - col % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else if !ch.is_control() {
            out.push(ch);
            col += ch.width().unwrap_or(0);
        }
    }
    Cow::Owned(out)
}
