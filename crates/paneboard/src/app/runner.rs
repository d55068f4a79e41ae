//! Terminal setup/teardown and the refresh loop.
//!
//! One thread owns both the terminal and the session driver. The
//! periodic tick is a bounded wait on keyboard input: if no key arrives
//! within the refresh interval the loop simply polls again.

use std::io;
use std::path::Path;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tracing::{info, warn};

use crate::config::load_or_default;
use crate::tmux::ActionKind;

use super::input::Flow;
use super::render::{hotkey_legend, render};
use super::state::App;

/// How the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Attach(String),
}

/// Entry point: load jobs, run the dashboard, attach if asked to.
pub fn run(config_path: &Path) -> io::Result<()> {
    let config = load_or_default(config_path);
    let mut app = App::new(config);

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut app);
    let restored = restore_terminal(&mut terminal);
    let exit = result?;
    restored?;

    match exit {
        Exit::Quit => info!("quit"),
        Exit::Attach(name) => {
            // The screen is already torn down, so tmux can take the terminal.
            let result = app.driver.attach(&name);
            info!(job = name.as_str(), kind = ?result.kind, "attach returned");
            if result.kind != ActionKind::Success {
                eprintln!("{}", result.message);
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.backend_mut().execute(Show)?;
    terminal.show_cursor()
}

/// Main loop: poll, redraw if needed, wait for a key or the next tick.
fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<Exit> {
    let legend = hotkey_legend(&app.keymap_config);
    loop {
        refresh(terminal, app, &legend);

        if !event::poll(app.refresh)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match app.handle_key(key) {
                Flow::Continue => {}
                Flow::Quit => return Ok(Exit::Quit),
                Flow::Attach(name) => return Ok(Exit::Attach(name)),
            },
            Event::Resize(..) => app.view.request_redraw(),
            _ => {}
        }
    }
}

/// One poll: capture the selected job and draw only if something changed.
///
/// Returns whether a frame was drawn. Draw failures are logged and
/// retried on the next iteration instead of ending the loop.
pub(super) fn refresh<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, legend: &str) -> bool {
    let capture = app.poll();
    let capture_text = capture.as_ref().map(|capture| capture.text()).unwrap_or("");
    if !app.view.needs_redraw(capture_text) {
        return false;
    }

    let view = app.dashboard_view(capture_text, legend);
    if let Err(err) = terminal.draw(|frame| render(frame, &view)) {
        warn!("draw failed: {err}");
        return false;
    }
    app.view.mark_rendered(capture_text);
    true
}
