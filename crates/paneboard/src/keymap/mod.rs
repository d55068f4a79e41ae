//! Key chord parsing and action bindings.
//!
//! Parses key chord strings like "ctrl+c", "k" or "up" from config
//! and matches them against crossterm KeyEvents at runtime.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::config::KeymapConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// Everything a key press can ask the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Start,
    Restart,
    Close,
    Attach,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyChord, Action)>,
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let groups = [
            (&config.up, Action::Up),
            (&config.down, Action::Down),
            (&config.start, Action::Start),
            (&config.restart, Action::Restart),
            (&config.close, Action::Close),
            (&config.attach, Action::Attach),
            (&config.quit, Action::Quit),
        ];
        let mut bindings = Vec::new();
        for (chords, action) in groups {
            for chord in chords {
                match parse_key_chord(chord) {
                    Some(parsed) => bindings.push((parsed, action)),
                    None => warn!(chord = chord.as_str(), ?action, "ignoring unparseable key chord"),
                }
            }
        }
        Self { bindings }
    }

    /// Action bound to a key press, if any. Key releases never match.
    pub fn action_for(&self, event: KeyEvent) -> Option<Action> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        self.bindings
            .iter()
            .find(|(chord, _)| matches_chord(event, chord))
            .map(|(_, action)| *action)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }

    let mut chord = KeyChord {
        key: KeyCode::Null,
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    for part in parts {
        match part {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            "meta" | "cmd" | "super" => chord.meta = true,
            key => {
                if chord.key != KeyCode::Null {
                    return None;
                }
                chord.key = parse_key(key)?;
            }
        }
    }

    if chord.key == KeyCode::Null {
        return None;
    }

    Some(chord)
}

fn parse_key(key: &str) -> Option<KeyCode> {
    match key {
        "esc" | "escape" => Some(KeyCode::Esc),
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "space" | "spacebar" => Some(KeyCode::Char(' ')),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        _ => {
            let mut chars = key.chars();
            let first = chars.next()?;
            if chars.next().is_none() {
                Some(KeyCode::Char(first))
            } else {
                None
            }
        }
    }
}

pub fn matches_chord(event: KeyEvent, chord: &KeyChord) -> bool {
    let modifiers = event.modifiers;
    let code = match event.code {
        // Terminals report shifted letters as uppercase; chords are lowercase.
        KeyCode::Char(ch) if !chord.ctrl && !chord.alt => KeyCode::Char(ch.to_ascii_lowercase()),
        code => code,
    };
    if code != chord.key {
        return false;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let meta = modifiers.contains(KeyModifiers::SUPER) || modifiers.contains(KeyModifiers::META);
    let shift = modifiers.contains(KeyModifiers::SHIFT)
        || matches!(event.code, KeyCode::Char(ch) if ch.is_ascii_uppercase());

    ctrl == chord.ctrl && alt == chord.alt && shift == chord.shift && meta == chord.meta
}
