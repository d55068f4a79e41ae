//! Application orchestration and the refresh loop.
//!
//! The app is a single `App` struct driven by one control loop on one
//! thread. Each iteration captures the selected job's pane, redraws
//! only when something visible changed, then waits for a key or the
//! next tick.
//!
//! Submodules:
//! - state: App struct, ViewState and the redraw gate
//! - runner: terminal setup/teardown and the loop itself
//! - input: key handling and lifecycle dispatch
//! - render: frame drawing

mod input;
mod render;
mod runner;
mod state;

pub use runner::run;
