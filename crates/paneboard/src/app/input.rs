//! Key handling.
//!
//! Maps key presses to actions and runs lifecycle operations against
//! the selected job. Every lifecycle result becomes the pending message;
//! the loop re-captures and redraws right after this returns.

use crossterm::event::KeyEvent;
use tracing::{info, warn};

use crate::keymap::Action;
use crate::tmux::{ActionResult, Capture};

use super::state::App;

/// What the loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Tear down the screen and attach to the named job's session.
    Attach(String),
}

impl App {
    pub fn handle_key(&mut self, event: KeyEvent) -> Flow {
        match self.keymap.action_for(event) {
            Some(action) => self.handle_action(action),
            None => Flow::Continue,
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Flow {
        if action == Action::Quit {
            return Flow::Quit;
        }
        let Some(job) = self.selected_job().cloned() else {
            return Flow::Continue;
        };
        match action {
            Action::Up => self.view.select_previous(),
            Action::Down => self.view.select_next(self.jobs.len()),
            Action::Start => {
                let result = self.driver.start(&job);
                self.report(action, &job.name, result);
            }
            Action::Restart => {
                let result = self.driver.restart(&job);
                self.report(action, &job.name, result);
            }
            Action::Close => {
                let result = self.driver.close(&job);
                self.report(action, &job.name, result);
            }
            // Ends the loop either way; the runner reports a missing session
            // once the screen is torn down.
            Action::Attach => return Flow::Attach(job.name),
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Capture the selected job's pane, or `None` when there are no jobs.
    pub fn poll(&self) -> Option<Capture> {
        let job = self.selected_job()?;
        Some(self.driver.capture(&job.name))
    }

    fn report(&mut self, action: Action, job: &str, result: ActionResult) {
        if result.is_error() {
            warn!(job, ?action, message = result.message.as_str(), "lifecycle action failed");
        } else {
            info!(job, ?action, kind = ?result.kind, "lifecycle action finished");
        }
        self.view.set_message(result.message);
    }
}
