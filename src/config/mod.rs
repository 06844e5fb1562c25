//! Configuration and settings management.
//!
//! Settings are stored in the user's config directory as JSON.

mod settings;

pub use settings::{
    CommandPaletteSettings, ConfigError, DialogSettings, DriverSettings, HoverSettings, Settings,
    ToastSettings, TooltipSettings, MIN_IDLE_TICK_MS,
};
