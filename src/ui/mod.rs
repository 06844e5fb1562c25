//! Overlay components and keyboard input.
//!
//! - `components`: builders for each overlay variant
//! - `keybindings`: keystrokes as hosts report them

pub mod components;
pub mod keybindings;

pub use keybindings::{Key, Keystroke, KeystrokeParseError, Modifiers};
