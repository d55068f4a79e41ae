use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::layout::truncate_to_width;

/// Render the bordered job list, keeping the selected row in view.
pub(super) fn render_job_list(frame: &mut ratatui::Frame, area: Rect, names: &[&str], selected: usize) {
    let block = Block::default().borders(Borders::ALL).title(" Jobs ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let width = inner.width as usize;
    if height == 0 || width == 0 {
        return;
    }
    let offset = selected.saturating_sub(height - 1);

    let lines: Vec<Line<'_>> = names
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, name)| {
            let (text, used) = truncate_to_width(name, width);
            if idx == selected {
                let padded = format!("{text}{}", " ".repeat(width - used));
                Line::from(Span::styled(
                    padded,
                    Style::default().add_modifier(Modifier::REVERSED),
                ))
            } else {
                Line::raw(text.to_string())
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
