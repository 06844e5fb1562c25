//! Domain types for overlays, toasts and commands.
//!
//! This module contains the core data types used throughout the crate.
//! Types here are pure data structures with no rendering dependencies.

mod command;
mod geometry;
mod toast;
mod types;

pub use command::{CommandEntry, CommandGroup};
pub use geometry::{Align, Placement, Point, Rect, Side, Size, SurfaceSize, Viewport};
pub use toast::{
    ToastAction, ToastActionHandler, ToastItem, ToastOptions, ToastPosition, ToastVariant,
    DEFAULT_TOAST_DURATION_MS,
};
pub use types::{ElementId, OverlayId, ToastId};
