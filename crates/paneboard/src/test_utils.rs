//! Shared helpers for unit tests.
//!
//! `write_tmux_stub` installs a shell script that mimics the subset of
//! tmux the session driver uses. Sessions are plain files under
//! `<dir>/sessions`, and every invocation is appended to
//! `<dir>/calls.log`. Session names steer failure modes:
//! `fail*` cannot be created, `vanish*` disappears right after
//! creation, `broken*` cannot be captured, `quiet*` captures nothing.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::config::TmuxConfig;

const TMUX_STUB: &str = r##"#!/bin/sh
state='@STATE@'
printf '%s\n' "$*" >> "$state/calls.log"
while [ $# -gt 0 ]; do
  case "$1" in
    -L|-S|-f) shift 2 ;;
    *) break ;;
  esac
done
cmd="$1"
shift
target=""
body=""
while [ $# -gt 0 ]; do
  case "$1" in
    -t|-s) target="$2"; shift 2 ;;
    -d|-p|-e) shift ;;
    *) body="$1"; shift ;;
  esac
done
target="${target#=}"
target="${target%:}"
session="$state/sessions/$target"
case "$cmd" in
  has-session)
    [ -f "$session" ] || { echo "can't find session: $target" >&2; exit 1; }
    ;;
  new-session)
    case "$target" in
      fail*) echo "create failed: $target" >&2; exit 1 ;;
      vanish*) exit 0 ;;
    esac
    if [ -f "$session" ]; then echo "duplicate session: $target" >&2; exit 1; fi
    printf '%s' "$body" > "$session"
    ;;
  kill-session)
    [ -f "$session" ] || { echo "can't find session: $target" >&2; exit 1; }
    rm -f "$session"
    ;;
  capture-pane)
    [ -f "$session" ] || { echo "can't find session: $target" >&2; exit 1; }
    case "$target" in
      broken*) echo "capture exploded" >&2; exit 1 ;;
      quiet*) exit 0 ;;
    esac
    printf '\033[32m%s\033[0m running\n' "$target"
    ;;
  attach-session|switch-client)
    [ -f "$session" ] || { echo "can't find session: $target" >&2; exit 1; }
    ;;
  *)
    echo "unknown command: $cmd" >&2
    exit 1
    ;;
esac
"##;

/// Install the stub under `dir` and return a config pointing at it.
#[cfg(unix)]
pub fn write_tmux_stub(dir: &Path) -> TmuxConfig {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(dir.join("sessions")).expect("create sessions dir");
    let script = dir.join("tmux_stub.sh");
    let contents = TMUX_STUB.replace("@STATE@", &dir.to_string_lossy());
    fs::write(&script, contents).expect("write tmux stub");
    let mut perms = fs::metadata(&script).expect("stat tmux stub").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod tmux stub");
    TmuxConfig {
        command: Some(script.to_string_lossy().to_string()),
        args: Vec::new(),
    }
}

/// Path of the file recording the command a stub session was created with.
pub fn stub_session_path(dir: &Path, session: &str) -> PathBuf {
    dir.join("sessions").join(session)
}

/// Every stub invocation so far, one line each.
pub fn stub_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct EnvVarGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvVarGuard {
    pub fn remove(key: &'static str) -> Self {
        let original = env::var(key).ok();
        env::remove_var(key);
        Self { key, original }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(value) = &self.original {
            env::set_var(self.key, value);
        } else {
            env::remove_var(self.key);
        }
    }
}
