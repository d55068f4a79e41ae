//! Application state types.
//!
//! `ViewState` is the only mutable state of the refresh loop. It owns
//! the selection, the last capture that made it to the screen, and the
//! one-shot action message. The redraw gate lives here so it can be
//! exercised without a terminal.

use std::time::Duration;

use crate::config::{Config, JobDescriptor, KeymapConfig};
use crate::keymap::Keymap;
use crate::tmux::SessionDriver;

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub selected: usize,
    pub last_rendered_capture: String,
    pub pending_message: Option<String>,
    last_rendered_selection: Option<usize>,
    force_redraw: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down, clamped to the last of `len` entries.
    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        let trimmed = message.trim();
        self.pending_message = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Redraw on the next iteration even if nothing changed (e.g. resize).
    pub fn request_redraw(&mut self) {
        self.force_redraw = true;
    }

    /// Whether `capture` warrants drawing a new frame.
    ///
    /// True when the capture differs from what is on screen, the
    /// selection moved, a message is waiting, or a redraw was requested.
    pub fn needs_redraw(&self, capture: &str) -> bool {
        self.force_redraw
            || self.pending_message.is_some()
            || self.last_rendered_selection != Some(self.selected)
            || self.last_rendered_capture != capture
    }

    /// Record a successful draw. The pending message has now been shown
    /// and is dropped.
    pub fn mark_rendered(&mut self, capture: &str) {
        if self.last_rendered_capture != capture {
            self.last_rendered_capture = capture.to_string();
        }
        self.last_rendered_selection = Some(self.selected);
        self.pending_message = None;
        self.force_redraw = false;
    }
}

/// Everything the refresh loop works with.
pub struct App {
    pub jobs: Vec<JobDescriptor>,
    pub driver: SessionDriver,
    pub keymap: Keymap,
    pub keymap_config: KeymapConfig,
    pub refresh: Duration,
    pub view: ViewState,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            jobs: config.jobs,
            driver: SessionDriver::new(config.tmux),
            keymap: Keymap::from_config(&config.keymap),
            keymap_config: config.keymap,
            refresh: config.ui.refresh,
            view: ViewState::new(),
        }
    }

    pub fn selected_job(&self) -> Option<&JobDescriptor> {
        self.jobs.get(self.view.selected)
    }
}
