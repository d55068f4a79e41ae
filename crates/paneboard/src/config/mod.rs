//! Job document loading.
//!
//! The dashboard reads a single TOML document (default `paneboard.toml`
//! in the working directory) holding the ordered job list plus a few
//! optional settings:
//!
//! ```toml
//! [tmux]
//! command = "tmux"
//! args = ["-L", "jobs"]
//!
//! [ui]
//! refresh_ms = 1000
//!
//! [keymap]
//! attach = ["o", "a"]
//!
//! [[jobs]]
//! name = "build"
//! command = "make"
//! working_directory = "/tmp"
//! ```
//!
//! The document is created from a commented template when missing and
//! is never written afterwards. Any failure to read or parse it falls
//! back to an empty job list so the dashboard still starts.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::tmux::session_name;


pub const DEFAULT_CONFIG_FILE: &str = "paneboard.toml";
const DEFAULT_TMUX_COMMAND: &str = "tmux";
const DEFAULT_REFRESH_MS: u64 = 1000;
const MIN_REFRESH_MS: u64 = 50;

const TEMPLATE: &str = r#"# paneboard job list.
#
# Each job runs in its own tmux session named after the job.
#
# [[jobs]]
# name = "build"
# command = "make"
# working_directory = "/tmp"
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub name: String,
    pub command: String,
    pub working_directory: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jobs: Vec<JobDescriptor>,
    pub tmux: TmuxConfig,
    pub ui: UiConfig,
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone)]
pub struct TmuxConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub refresh: Duration,
}

/// Key chords per dashboard action, in `keymap::parse_key_chord` syntax.
#[derive(Debug, Clone)]
pub struct KeymapConfig {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub start: Vec<String>,
    pub restart: Vec<String>,
    pub close: Vec<String>,
    pub attach: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        resolve(RawConfig::default())
    }
}

impl Default for KeymapConfig {
    fn default() -> Self {
        resolve_keymap(None)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(alias = "items")]
    jobs: Option<Vec<RawJob>>,
    tmux: Option<RawTmux>,
    ui: Option<RawUi>,
    keymap: Option<RawKeymap>,
}

#[derive(Debug, Default, Deserialize)]
struct RawJob {
    name: Option<String>,
    command: Option<String>,
    #[serde(alias = "directory", alias = "workingDirectory")]
    working_directory: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTmux {
    command: Option<String>,
    args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUi {
    #[serde(alias = "refreshMs")]
    refresh_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKeymap {
    up: Option<Vec<String>>,
    down: Option<Vec<String>>,
    start: Option<Vec<String>>,
    restart: Option<Vec<String>>,
    close: Option<Vec<String>>,
    attach: Option<Vec<String>>,
    quit: Option<Vec<String>>,
}

/// Write the template document if `path` does not exist yet.
///
/// Returns `true` when a new file was created.
pub fn ensure_config(path: &Path) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, TEMPLATE)?;
    Ok(true)
}

/// Read and resolve the document at `path`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let raw = toml::from_str::<RawConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(resolve(raw))
}

/// Create the document if needed, then load it; never fails.
///
/// Any error is logged and replaced by an empty job list with default
/// settings.
pub fn load_or_default(path: &Path) -> Config {
    let loaded = ensure_config(path)
        .map_err(|source| ConfigError::Create {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|created| {
            if created {
                info!(path = %path.display(), "created job document");
            }
            load_config(path)
        });
    match loaded {
        Ok(config) => {
            info!(path = %path.display(), jobs = config.jobs.len(), "loaded job document");
            config
        }
        Err(err) => {
            warn!("job document unavailable, starting with no jobs: {err}");
            Config::default()
        }
    }
}

fn resolve(raw: RawConfig) -> Config {
    let jobs = resolve_jobs(raw.jobs.unwrap_or_default());

    let tmux_command = raw
        .tmux
        .as_ref()
        .and_then(|t| t.command.clone())
        .filter(|command| !command.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TMUX_COMMAND.to_string());
    let tmux_args = raw
        .tmux
        .as_ref()
        .and_then(|t| t.args.clone())
        .unwrap_or_default();

    let refresh_ms = raw
        .ui
        .as_ref()
        .and_then(|ui| ui.refresh_ms)
        .unwrap_or(DEFAULT_REFRESH_MS)
        .max(MIN_REFRESH_MS);

    Config {
        jobs,
        tmux: TmuxConfig {
            command: Some(tmux_command),
            args: tmux_args,
        },
        ui: UiConfig {
            refresh: Duration::from_millis(refresh_ms),
        },
        keymap: resolve_keymap(raw.keymap),
    }
}

fn resolve_jobs(raw_jobs: Vec<RawJob>) -> Vec<JobDescriptor> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(raw_jobs.len());
    for (index, raw) in raw_jobs.into_iter().enumerate() {
        let name = raw.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            warn!(index, "skipping job without a name");
            continue;
        }
        // Names are session identifiers, so compare them the way tmux sees them.
        let session = session_name(name);
        if !seen.insert(session.clone()) {
            warn!(job = name, session, "skipping job whose session name is already taken");
            continue;
        }
        let working_directory = raw
            .working_directory
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(expand_home);
        jobs.push(JobDescriptor {
            name: name.to_string(),
            command: raw.command.unwrap_or_default(),
            working_directory,
        });
    }
    jobs
}

fn resolve_keymap(raw: Option<RawKeymap>) -> KeymapConfig {
    let raw = raw.unwrap_or_default();
    let pick = |value: Option<Vec<String>>, defaults: &[&str]| {
        value.unwrap_or_else(|| defaults.iter().map(|key| key.to_string()).collect())
    };
    KeymapConfig {
        up: pick(raw.up, &["up", "k"]),
        down: pick(raw.down, &["down", "j"]),
        start: pick(raw.start, &["s", "enter"]),
        restart: pick(raw.restart, &["r"]),
        close: pick(raw.close, &["c"]),
        attach: pick(raw.attach, &["o"]),
        quit: pick(raw.quit, &["q", "ctrl+c"]),
    }
}

fn expand_home(dir: &str) -> String {
    let rest = match dir.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return dir.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{rest}", home.to_string_lossy()),
        None => dir.to_string(),
    }
}
