//! Session driver for a tmux-compatible multiplexer.
//!
//! Every job runs in its own detached session named after the job.
//! The driver keeps no state of its own: whether a job is running is
//! always answered by asking the multiplexer.
//!
//! Lifecycle calls are idempotent from the caller's point of view.
//! Starting a running job reports `AlreadyExists`, closing an absent
//! one reports `NotFound`, and only genuine multiplexer failures come
//! back as `ExecutionError` carrying the raw diagnostics.

use std::env;
use std::process::{Command, Output, Stdio};

use tracing::{debug, info, warn};

use crate::config::{JobDescriptor, TmuxConfig};


const DEFAULT_TMUX_COMMAND: &str = "tmux";

/// Placeholder shown when the selected job has no session.
pub const NO_SESSION_TEXT: &str = "No active session.";
const NO_OUTPUT_TEXT: &str = "No output available.";

/// Keeps the pane inspectable after the job command exits.
const KEEP_ALIVE: &str = "exec \"${SHELL:-/bin/sh}\"";

/// Diagnostics that mean "the session is not there".
const MISSING_SESSION_MARKERS: &[&str] = &[
    "can't find session",
    "no such session",
    "session not found",
    "no server running",
    "error connecting to",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Success,
    AlreadyExists,
    NotFound,
    ExecutionError,
}

/// Outcome of one lifecycle operation, shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub kind: ActionKind,
    pub message: String,
}

impl ActionResult {
    fn new(kind: ActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ActionKind::ExecutionError
    }
}

/// Result of capturing a session's pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Rendered pane text, including color escapes.
    Content(String),
    /// No session exists for the job.
    NoSession,
    /// The capture call itself failed.
    Failed(String),
}

impl Capture {
    pub fn text(&self) -> &str {
        match self {
            Self::Content(text) | Self::Failed(text) => text,
            Self::NoSession => NO_SESSION_TEXT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionDriver {
    config: TmuxConfig,
}

impl SessionDriver {
    pub fn new(config: TmuxConfig) -> Self {
        Self { config }
    }

    /// Whether a session exists for the job named `name`.
    pub fn exists(&self, name: &str) -> bool {
        let target = session_target(&session_name(name));
        match self.run(&["has-session", "-t", &target]) {
            Ok(output) => output.status.success(),
            Err(err) => {
                warn!(job = name, "has-session failed: {err}");
                false
            }
        }
    }

    pub fn start(&self, job: &JobDescriptor) -> ActionResult {
        if self.exists(&job.name) {
            return ActionResult::new(ActionKind::AlreadyExists, "Session already exists.");
        }
        self.create(job, "started")
    }

    /// Kill any session for the job, then create a fresh one.
    pub fn restart(&self, job: &JobDescriptor) -> ActionResult {
        let session = session_name(&job.name);
        match self.run(&["kill-session", "-t", &session_target(&session)]) {
            Ok(output) if output.status.success() => debug!(session, "killed for restart"),
            Ok(output) => {
                let details = diagnostics(&output);
                if !is_missing_session(&details) {
                    warn!(session, "kill before restart reported: {details}");
                }
            }
            Err(err) => warn!(session, "kill before restart failed: {err}"),
        }
        self.create(job, "restarted")
    }

    pub fn close(&self, job: &JobDescriptor) -> ActionResult {
        let session = session_name(&job.name);
        let output = match self.run(&["kill-session", "-t", &session_target(&session)]) {
            Ok(output) => output,
            Err(err) => return execution_error("kill-session", &err),
        };
        let details = diagnostics(&output);
        if is_missing_session(&details) {
            return ActionResult::new(ActionKind::NotFound, "Session does not exist.");
        }
        if !output.status.success() || !details.is_empty() {
            return execution_error("kill-session", &details);
        }
        info!(session, "session closed");
        ActionResult::new(ActionKind::Success, "Session closed successfully.")
    }

    pub fn capture(&self, name: &str) -> Capture {
        if !self.exists(name) {
            return Capture::NoSession;
        }
        let target = pane_target(&session_name(name));
        let output = match self.run(&["capture-pane", "-p", "-e", "-t", &target]) {
            Ok(output) => output,
            Err(err) => return Capture::Failed(format!("Error capturing output: {err}")),
        };
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            let details = diagnostics(&output);
            // Closed between the existence check and the capture.
            if is_missing_session(&details) {
                return Capture::NoSession;
            }
            let details = if details.is_empty() {
                exit_description(&output)
            } else {
                details
            };
            return Capture::Failed(format!("Error capturing output: {details}"));
        }
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            Capture::Content(NO_OUTPUT_TEXT.to_string())
        } else {
            Capture::Content(text)
        }
    }

    /// Hand the real terminal to the multiplexer until the user detaches.
    ///
    /// The caller must have restored the terminal before calling this.
    pub fn attach(&self, name: &str) -> ActionResult {
        if !self.exists(name) {
            return ActionResult::new(ActionKind::NotFound, "Session does not exist.");
        }
        let session = session_name(name);
        // Inside tmux a nested attach is refused; move this client instead.
        let subcommand = if env::var_os("TMUX").is_some_and(|value| !value.is_empty()) {
            "switch-client"
        } else {
            "attach-session"
        };
        info!(session, subcommand, "handing terminal to tmux");
        let status = Command::new(resolve_command(&self.config))
            .args(&self.config.args)
            .args([subcommand, "-t", &session_target(&session)])
            .status();
        match status {
            Ok(status) if status.success() => ActionResult::new(
                ActionKind::Success,
                format!("Detached from session '{session}'."),
            ),
            Ok(status) => execution_error(subcommand, &format!("exited with {status}")),
            Err(err) => execution_error(subcommand, &err.to_string()),
        }
    }

    fn create(&self, job: &JobDescriptor, verb: &str) -> ActionResult {
        let session = session_name(&job.name);
        let command = exec_command(job);
        let output = match self.run(&["new-session", "-d", "-s", &session, &command]) {
            Ok(output) => output,
            Err(err) => return execution_error("new-session", &err),
        };
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            let details = diagnostics(&output);
            let details = if details.is_empty() {
                exit_description(&output)
            } else {
                details
            };
            return execution_error("new-session", &details);
        }
        // tmux can report success for a session whose command dies during startup.
        if !self.exists(&job.name) {
            return execution_error(
                "new-session",
                &format!("session '{session}' was not running after creation"),
            );
        }
        info!(session, verb, "session created");
        ActionResult::new(ActionKind::Success, format!("Session {verb} successfully."))
    }

    fn run(&self, args: &[&str]) -> Result<Output, String> {
        let mut cmd = Command::new(resolve_command(&self.config));
        cmd.args(&self.config.args);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        debug!(?args, "tmux");
        cmd.output().map_err(|err| err.to_string())
    }
}

/// Session name for a job: tmux-reserved characters become dashes.
pub fn session_name(job_name: &str) -> String {
    let mut out = String::with_capacity(job_name.len());
    for ch in job_name.trim().chars() {
        if ch == '.' || ch == ':' || ch.is_whitespace() {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() {
        "job".to_string()
    } else {
        out
    }
}

/// Shell command run inside a new session.
///
/// Changes into the working directory when one is set, runs the job,
/// then replaces itself with the user's shell so the pane stays open
/// after the job exits or crashes.
pub fn exec_command(job: &JobDescriptor) -> String {
    let mut script = String::new();
    if let Some(dir) = job.working_directory.as_deref() {
        script.push_str("cd ");
        script.push_str(&shell_words::quote(dir));
        script.push_str(" && ");
    }
    let command = job.command.trim();
    script.push_str("{\n");
    script.push_str(if command.is_empty() { ":" } else { command });
    script.push_str("\n}\n");
    script.push_str(KEEP_ALIVE);
    script
}

// `=` asks tmux for an exact match instead of a prefix match.
fn session_target(session: &str) -> String {
    format!("={session}")
}

fn pane_target(session: &str) -> String {
    format!("={session}:")
}

fn is_missing_session(details: &str) -> bool {
    let lower = details.to_ascii_lowercase();
    MISSING_SESSION_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

fn execution_error(subcommand: &str, details: &str) -> ActionResult {
    warn!(subcommand, "tmux failed: {details}");
    let message = if details.is_empty() {
        format!("tmux {subcommand} failed.")
    } else {
        details.to_string()
    };
    ActionResult::new(ActionKind::ExecutionError, message)
}

fn resolve_command(config: &TmuxConfig) -> String {
    config
        .command
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_TMUX_COMMAND)
        .to_string()
}

fn exit_description(output: &Output) -> String {
    match output.status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn diagnostics(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut parts = Vec::new();
    if !stdout.trim().is_empty() {
        parts.push(stdout.trim().to_string());
    }
    if !stderr.trim().is_empty() {
        parts.push(stderr.trim().to_string());
    }
    parts.join("\n")
}
