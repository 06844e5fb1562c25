//! Keystrokes understood by overlays.
//!
//! Provides:
//! - The keys overlays react to (escape, tab, arrows, enter, characters)
//! - Modifier combinations
//! - Parsing of shortcut strings like `cmd+k` or `shift+tab`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Space,
    Up,
    Down,
    Home,
    End,
    Backspace,
    /// A printable character, as typed.
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Escape => f.write_str("Esc"),
            Key::Tab => f.write_str("Tab"),
            Key::Enter => f.write_str("Enter"),
            Key::Space => f.write_str("Space"),
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

/// Modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Modifiers {
    /// Command/Super key (Cmd on macOS, Win on Windows).
    pub cmd: bool,
    /// Control key.
    pub ctrl: bool,
    /// Alt/Option key.
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Command modifier only.
    pub fn cmd() -> Self {
        Self {
            cmd: true,
            ..Default::default()
        }
    }

    /// Shift modifier only.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Default::default()
        }
    }

    /// Returns true if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.cmd || self.ctrl || self.alt || self.shift
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.cmd {
            parts.push("Cmd");
        }
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A single keystroke (key + modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keystroke {
    /// The key pressed.
    pub key: Key,
    /// Active modifiers.
    pub modifiers: Modifiers,
}

impl Keystroke {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a keystroke with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }

    /// Creates a Shift+key keystroke.
    pub fn shift(key: Key) -> Self {
        Self::new(key, Modifiers::shift())
    }

    /// A plain character keystroke.
    pub fn char(c: char) -> Self {
        Self::key(Key::Char(c))
    }

    /// Shortcut comparison: same modifiers, and character keys compare
    /// without regard to case.
    pub fn matches(&self, shortcut: &Keystroke) -> bool {
        if self.modifiers != shortcut.modifiers {
            return false;
        }
        match (self.key, shortcut.key) {
            (Key::Char(a), Key::Char(b)) => a.to_lowercase().eq(b.to_lowercase()),
            (a, b) => a == b,
        }
    }

    /// The default command palette shortcut.
    pub fn command_k() -> Self {
        Self::new(Key::Char('k'), Modifiers::cmd())
    }

    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape
    }

    /// Tab or Shift+Tab; returns whether it moves backwards.
    pub fn tab_direction(&self) -> Option<bool> {
        (self.key == Key::Tab).then_some(self.modifiers.shift)
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.any() {
            write!(f, "{}+{}", self.modifiers, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

/// A shortcut string that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeystrokeParseError {
    #[error("shortcut has no key")]
    MissingKey,

    #[error("unknown key `{0}`")]
    UnknownKey(String),

    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
}

impl FromStr for Keystroke {
    type Err = KeystrokeParseError;

    /// Parses `+`-separated shortcuts such as `cmd+k` or `Shift+Tab`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let mut parts: Vec<&str> = lower.split('+').map(str::trim).collect();
        let key_name = parts.pop().filter(|k| !k.is_empty()).ok_or(KeystrokeParseError::MissingKey)?;

        let mut modifiers = Modifiers::none();
        for part in parts {
            match part {
                "cmd" | "command" | "super" | "meta" => modifiers.cmd = true,
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                other => return Err(KeystrokeParseError::UnknownModifier(other.to_string())),
            }
        }

        let key = match key_name {
            "esc" | "escape" => Key::Escape,
            "tab" => Key::Tab,
            "enter" | "return" => Key::Enter,
            "space" => Key::Space,
            "up" => Key::Up,
            "down" => Key::Down,
            "home" => Key::Home,
            "end" => Key::End,
            "backspace" => Key::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(KeystrokeParseError::UnknownKey(other.to_string())),
                }
            }
        };

        Ok(Self::new(key, modifiers))
    }
}
