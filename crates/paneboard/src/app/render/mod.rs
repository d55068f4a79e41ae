//! UI rendering.
//!
//! A pure function of the job names, the selection, the message being
//! shown and the current capture. Layout:
//! - job list (left third, bordered, selection in reverse video)
//! - output pane (rest of the width, bordered, ANSI colors preserved)
//! - hotkey legend (bottom row, centered, reverse video)
//!
//! ratatui clips every widget to its area, so a resize racing a draw
//! can never write past the terminal bounds.

mod jobs;
mod layout;
mod output;

#[cfg(test)]
mod tests;

use ratatui::layout::{Constraint, Direction, Layout};

use crate::config::KeymapConfig;

use super::state::App;

/// Everything one frame depends on.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub job_names: Vec<&'a str>,
    pub selected: usize,
    pub message: Option<&'a str>,
    pub capture: &'a str,
    pub legend: &'a str,
}

impl App {
    pub fn dashboard_view<'a>(&'a self, capture: &'a str, legend: &'a str) -> DashboardView<'a> {
        DashboardView {
            job_names: self.jobs.iter().map(|job| job.name.as_str()).collect(),
            selected: self.view.selected,
            message: self.view.pending_message.as_deref(),
            capture,
            legend,
        }
    }
}

/// Draw a full frame.
pub fn render(frame: &mut ratatui::Frame, view: &DashboardView<'_>) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(area.width / 3), Constraint::Min(1)])
        .split(rows[0]);

    jobs::render_job_list(frame, columns[0], &view.job_names, view.selected);
    output::render_output(frame, columns[1], view);
    layout::render_hotkey_bar(frame, rows[1], view.legend);
}

/// Legend for the bottom row, built from the first chord of each action.
pub fn hotkey_legend(keymap: &KeymapConfig) -> String {
    let entries = [
        (&keymap.start, "Start"),
        (&keymap.restart, "Restart"),
        (&keymap.close, "Close"),
        (&keymap.attach, "Attach"),
        (&keymap.quit, "Quit"),
    ];
    let items: Vec<String> = entries
        .iter()
        .filter_map(|(chords, label)| {
            let key = chords.first()?.trim();
            (!key.is_empty()).then(|| format!("[{key}] {label}"))
        })
        .collect();
    format!(" {} ", items.join("  "))
}
