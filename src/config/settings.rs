//! Overlay settings and their persistence.
//!
//! Settings are persisted to `~/.config/stratum/settings.json` (or the
//! platform equivalent) and every field has a default, so a partial or
//! missing file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ToastPosition, DEFAULT_TOAST_DURATION_MS};
use crate::ui::keybindings::Keystroke;

/// Settings I/O failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hover-intent delays for hover cards.
    pub hover: HoverSettings,
    pub tooltip: TooltipSettings,
    pub toasts: ToastSettings,
    pub dialogs: DialogSettings,
    pub command_palette: CommandPaletteSettings,
    /// Async timer driver.
    pub driver: DriverSettings,
}

/// Hover-intent delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverSettings {
    pub open_delay_ms: u64,
    pub close_delay_ms: u64,
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            open_delay_ms: 150,
            close_delay_ms: 150,
        }
    }
}

impl HoverSettings {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipSettings {
    /// Delay before a tooltip shows.
    pub delay_ms: u64,
    /// Gap between trigger and tooltip.
    pub offset: f32,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            delay_ms: 150,
            offset: 8.0,
        }
    }
}

/// Toast queue settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastSettings {
    /// Used when a toast does not set its own duration.
    pub default_duration_ms: u64,
    pub position: ToastPosition,
    /// Oldest toasts beyond this count are dropped. `None` and `0` mean
    /// no limit.
    pub max_visible: Option<usize>,
}

impl ToastSettings {
    /// The effective cap on visible toasts.
    pub fn visible_limit(&self) -> Option<usize> {
        self.max_visible.filter(|&max| max > 0)
    }
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_TOAST_DURATION_MS,
            position: ToastPosition::default(),
            max_visible: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogSettings {
    /// Whether clicking the backdrop closes dialogs and drawers.
    pub close_on_overlay_click: bool,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            close_on_overlay_click: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPaletteSettings {
    /// Keystroke that toggles the palette, e.g. `cmd+k`.
    pub shortcut: String,
}

impl Default for CommandPaletteSettings {
    fn default() -> Self {
        Self {
            shortcut: "cmd+k".to_string(),
        }
    }
}

impl CommandPaletteSettings {
    /// Parsed shortcut, falling back to `cmd+k` when unparseable.
    pub fn keystroke(&self) -> Keystroke {
        self.shortcut.parse().unwrap_or_else(|err| {
            tracing::warn!(shortcut = %self.shortcut, %err, "invalid palette shortcut, using cmd+k");
            Keystroke::command_k()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Longest the driver sleeps when no timer is pending.
    pub idle_tick_ms: u64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self { idle_tick_ms: 50 }
    }
}

/// Shortest idle tick the driver accepts.
pub const MIN_IDLE_TICK_MS: u64 = 1;

impl DriverSettings {
    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms.max(MIN_IDLE_TICK_MS))
    }
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("dev", "stratum", "stratum")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads settings, returning defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }
}
