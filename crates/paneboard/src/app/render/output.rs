use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ansi::{segment_capture, ColorTag, Segments};
use crate::tmux::session_name;

use super::layout::{expand_tabs, truncate_to_width};
use super::DashboardView;

const NO_JOBS_HINT: &str = "No jobs configured. Add [[jobs]] entries to the job document.";

/// Render the output pane.
///
/// A pending message is shown in full above the capture for the frame
/// that carries it; the capture's newest lines fill the remaining rows.
pub(super) fn render_output(frame: &mut ratatui::Frame, area: Rect, view: &DashboardView<'_>) {
    let title = match view.job_names.get(view.selected) {
        Some(name) => {
            let session = session_name(name);
            if session == *name {
                format!(" Output: {name} ")
            } else {
                format!(" Output: {name} [{session}] ")
            }
        }
        None => " Output ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let height = inner.height as usize;
    if width == 0 || height == 0 {
        return;
    }

    let mut lines = match view.message {
        Some(message) => message_lines(message, width, height),
        None => Vec::new(),
    };
    let remaining = height - lines.len();
    if !view.capture.is_empty() {
        lines.extend(capture_lines(view.capture, width, remaining));
    } else if lines.is_empty() && view.job_names.is_empty() {
        lines = plain_lines(NO_JOBS_HINT, width, height);
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Styled lines for a capture, newest output kept when it overflows.
///
/// Trailing blank rows (an idle pane's unused lines) are dropped first.
pub(super) fn capture_lines(capture: &str, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Segments<'_>> = segment_capture(capture).collect();
    while lines.last().is_some_and(is_blank) {
        lines.pop();
    }
    let start = lines.len().saturating_sub(height);
    lines
        .drain(start..)
        .map(|segments| styled_line(segments, width))
        .collect()
}

fn styled_line(segments: Segments<'_>, width: usize) -> Line<'static> {
    let mut spans = Vec::new();
    let mut remaining = width;
    for segment in segments {
        if remaining == 0 {
            break;
        }
        let expanded = expand_tabs(segment.text, width - remaining);
        let (text, used) = truncate_to_width(&expanded, remaining);
        remaining -= used;
        if !text.is_empty() {
            spans.push(Span::styled(text.to_string(), style_for(segment.style)));
        }
    }
    Line::from(spans)
}

fn plain_lines(text: &str, width: usize, height: usize) -> Vec<Line<'static>> {
    text.lines()
        .take(height)
        .map(|line| {
            let expanded = expand_tabs(line, 0);
            Line::raw(truncate_to_width(&expanded, width).0.to_string())
        })
        .collect()
}

fn message_lines(message: &str, width: usize, height: usize) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    plain_lines(message, width, height)
        .into_iter()
        .map(|line| line.style(bold))
        .collect()
}

fn is_blank(segments: &Segments<'_>) -> bool {
    segments
        .clone()
        .all(|segment| segment.text.trim().is_empty())
}

pub(super) fn style_for(tag: ColorTag) -> Style {
    let color = match tag {
        ColorTag::Default => return Style::default(),
        ColorTag::Black => Color::Black,
        ColorTag::Red => Color::Red,
        ColorTag::Green => Color::Green,
        ColorTag::Yellow => Color::Yellow,
        ColorTag::Blue => Color::Blue,
        ColorTag::Magenta => Color::Magenta,
        ColorTag::Cyan => Color::Cyan,
        // SGR 37 is the non-bright white, which ratatui calls gray.
        ColorTag::White => Color::Gray,
    };
    Style::default().fg(color)
}
